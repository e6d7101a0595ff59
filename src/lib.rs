pub mod category;
pub mod config;
pub mod fetch;
pub mod leaderboard;
pub mod output;
pub mod payload;
pub mod pipeline;
pub mod stats;
