//! Cache Key Generators
//!
//! Composite keys for each cached entity: entity type, id, and optional
//! modifiers such as page or time frame. Keeping key construction in one
//! place guarantees readers and writers agree on the layout. The set covers
//! the full key space; generators for per-player and per-match data exist
//! for cache consumers outside this crate (only the hero and item lists are
//! cached in-crate).

/// Key for a single player record.
pub fn player(id: &str) -> String {
    format!("player_{}", id)
}

/// Key for one page of a player's match history.
pub fn player_matches(id: &str, page: Option<u32>) -> String {
    format!("player_matches_{}_{}", id, page.unwrap_or(1))
}

/// Key for a player's statistics over a time frame.
pub fn player_stats(id: &str, time_frame: Option<&str>) -> String {
    format!("player_stats_{}_{}", id, time_frame.unwrap_or("all"))
}

/// Key for a player's per-hero statistics.
pub fn player_hero_stats(id: &str) -> String {
    format!("player_hero_stats_{}", id)
}

/// Key for a single match record.
pub fn match_record(id: &str) -> String {
    format!("match_{}", id)
}

/// Key for the full hero list.
pub fn heroes() -> String {
    "heroes".to_string()
}

/// Key for a single hero record.
pub fn hero(name: &str) -> String {
    format!("hero_{}", name)
}

/// Key for the full item list.
pub fn items() -> String {
    "items".to_string()
}

/// Key for a single item record.
pub fn item(name: &str) -> String {
    format!("item_{}", name)
}

/// Key for a filtered builds listing.
pub fn builds(hero_id: Option<u32>, role: Option<&str>) -> String {
    format!(
        "builds_{}_{}",
        hero_id.map(|id| id.to_string()).unwrap_or_else(|| "all".to_string()),
        role.unwrap_or("all")
    )
}
