//! Travel-mode categories understood by the trainlog leaderboard.

use std::fmt;

/// One leaderboard segment.
///
/// The [`name`](Category::name) is what users configure and what appears in
/// console output and the export file. The [`path`](Category::path) is the
/// segment appended to the leaderboard URL; they only differ for
/// [`Category::Airplane`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Train,
    Bus,
    Airplane,
    Ferry,
    Aerialway,
    Metro,
    Tram,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::All,
        Category::Train,
        Category::Bus,
        Category::Airplane,
        Category::Ferry,
        Category::Aerialway,
        Category::Metro,
        Category::Tram,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Train => "train",
            Category::Bus => "bus",
            Category::Airplane => "airplane",
            Category::Ferry => "ferry",
            Category::Aerialway => "aerialway",
            Category::Metro => "metro",
            Category::Tram => "tram",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Category::Airplane => "air",
            other => other.name(),
        }
    }

    /// Looks up a category by its configured name (already lowercased).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes a comma-separated category list.
///
/// Unknown names are dropped, order and duplicates are kept. Never returns an
/// empty list: input with nothing recognizable yields `[Category::All]`.
pub fn parse_types(raw: &str) -> Vec<Category> {
    let parts: Vec<String> = raw
        .split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect();

    let valid: Vec<Category> = parts
        .iter()
        .filter_map(|p| Category::from_name(p))
        .collect();

    if valid.is_empty() {
        vec![Category::All]
    } else {
        valid
    }
}
