//! Request Option Types
//!
//! Typed filter/pagination options for each endpoint. Options serialize to
//! flat query pairs: absent values are omitted entirely (never sent as
//! empty strings), and nested filters flatten to `filter[<name>]=<value>`.

// == Query Pair Helpers ==
fn push<T: ToString>(pairs: &mut Vec<(String, String)>, name: &str, value: &Option<T>) {
    if let Some(value) = value {
        pairs.push((name.to_string(), value.to_string()));
    }
}

fn push_filter<T: ToString>(pairs: &mut Vec<(String, String)>, name: &str, value: &Option<T>) {
    if let Some(value) = value {
        pairs.push((format!("filter[{}]", name), value.to_string()));
    }
}

// == Player Match History ==
/// Options for a player's match history listing.
#[derive(Debug, Clone, Default)]
pub struct MatchesOptions {
    /// Time window, e.g. `1M` or `3M`
    pub time_frame: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub filter: Option<MatchFilter>,
}

/// Nested match filters, flattened to `filter[...]` parameters.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub hero_id: Option<u32>,
    pub role: Option<String>,
    pub player_name: Option<String>,
    pub game_mode: Option<String>,
}

impl MatchesOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "time_frame", &self.time_frame);
        push(&mut pairs, "page", &self.page);
        push(&mut pairs, "per_page", &self.per_page);
        if let Some(filter) = &self.filter {
            push_filter(&mut pairs, "hero_id", &filter.hero_id);
            push_filter(&mut pairs, "role", &filter.role);
            push_filter(&mut pairs, "player_name", &filter.player_name);
            push_filter(&mut pairs, "game_mode", &filter.game_mode);
        }
        pairs
    }
}

// == Global Match Feed ==
/// Options for the global match feed.
#[derive(Debug, Clone, Default)]
pub struct MatchFeedOptions {
    /// Unix timestamp to page backwards from
    pub timestamp: Option<u64>,
    pub cursor: Option<String>,
    pub per_page: Option<u32>,
}

impl MatchFeedOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "timestamp", &self.timestamp);
        push(&mut pairs, "cursor", &self.cursor);
        push(&mut pairs, "per_page", &self.per_page);
        pairs
    }
}

// == Per-Hero Statistics ==
/// Options for a player's per-hero statistics.
#[derive(Debug, Clone, Default)]
pub struct HeroStatsOptions {
    pub hero_ids: Vec<u32>,
    pub time_frame: Option<String>,
    pub role: Option<String>,
}

impl HeroStatsOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.hero_ids.is_empty() {
            let ids = self
                .hero_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("hero_ids".to_string(), ids));
        }
        push(&mut pairs, "time_frame", &self.time_frame);
        push_filter(&mut pairs, "role", &self.role);
        pairs
    }
}

// == Builds ==
/// Sort orders the builds listing accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOrder {
    Latest,
    Trending,
    Popular,
}

impl std::fmt::Display for BuildOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildOrder::Latest => "latest",
            BuildOrder::Trending => "trending",
            BuildOrder::Popular => "popular",
        };
        f.write_str(s)
    }
}

/// Options for the community builds listing.
#[derive(Debug, Clone, Default)]
pub struct BuildsOptions {
    pub page: Option<u32>,
    pub filter: Option<BuildFilter>,
}

/// Nested build filters, flattened to `filter[...]` parameters.
#[derive(Debug, Clone, Default)]
pub struct BuildFilter {
    pub player_id: Option<String>,
    pub hero_id: Option<u32>,
    pub role: Option<String>,
    pub name: Option<String>,
    /// Restrict to builds for the current game version
    pub current_version: Option<bool>,
    pub order: Option<BuildOrder>,
}

impl BuildsOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "page", &self.page);
        if let Some(filter) = &self.filter {
            push_filter(&mut pairs, "player_id", &filter.player_id);
            push_filter(&mut pairs, "hero_id", &filter.hero_id);
            push_filter(&mut pairs, "role", &filter.role);
            push_filter(&mut pairs, "name", &filter.name);
            push_filter(&mut pairs, "current_version", &filter.current_version);
            push_filter(&mut pairs, "order", &filter.order);
        }
        pairs
    }
}

// == Leaderboard ==
/// Options for the ranked leaderboard.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardOptions {
    pub page: Option<u32>,
    pub filter: Option<LeaderboardFilter>,
}

/// Nested leaderboard filters. The include flags serialize as `0`/`1`,
/// matching the upstream contract.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardFilter {
    pub name: Option<String>,
    pub include_inactive: Option<bool>,
    pub include_unranked: Option<bool>,
}

impl LeaderboardOptions {
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "page", &self.page);
        if let Some(filter) = &self.filter {
            push_filter(&mut pairs, "name", &filter.name);
            push_filter(
                &mut pairs,
                "include_inactive",
                &filter.include_inactive.map(|b| b as u8),
            );
            push_filter(
                &mut pairs,
                "include_unranked",
                &filter.include_unranked.map(|b| b as u8),
            );
        }
        pairs
    }
}
