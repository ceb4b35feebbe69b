//! Models Module
//!
//! API record types, typed request options, and relay response DTOs.

pub mod options;
pub mod records;
pub mod responses;

pub use options::{
    BuildFilter, BuildOrder, BuildsOptions, HeroStatsOptions, LeaderboardFilter,
    LeaderboardOptions, MatchFeedOptions, MatchFilter, MatchesOptions,
};
pub use records::{Build, Hero, Item, LeaderboardPage, Match, MatchPlayer, MatchesPage, Player};
pub use responses::{ErrorResponse, HealthResponse};
