pub mod consolidate;
pub mod game;

pub use consolidate::Consolidator;
pub use game::{AggregateStats, ConsolidatedGame, GameRecord};
