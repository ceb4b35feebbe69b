//! API Record Types
//!
//! Value records returned by the external stats API. These are immutable
//! snapshots: the core caches and looks them up but never mutates them.
//! Fields default leniently because the upstream omits fields freely.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Player ==
/// A ranked player profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub rank_title: String,
    #[serde(default)]
    pub mmr: f64,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub winrate: f64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub avatar_id: u32,
    #[serde(default)]
    pub last_match_ended_at: Option<DateTime<Utc>>,
}

// == Match ==
/// A completed or in-progress match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub id: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub game_region: String,
    /// Duration in seconds
    #[serde(default)]
    pub game_duration: u32,
    #[serde(default)]
    pub winning_team: String,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Absent while the match is still being played
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub players: Vec<MatchPlayer>,
}

// == Match Player ==
/// One player's performance line within a match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchPlayer {
    pub player_id: String,
    #[serde(default)]
    pub player_name: String,
    /// Links to `Hero::id`
    #[serde(default)]
    pub hero_id: u32,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub minions_killed: u32,
    #[serde(default)]
    pub gold_earned: u32,
    #[serde(default)]
    pub damage_dealt_to_heroes: u32,
    #[serde(default)]
    pub damage_taken: u32,
    #[serde(default)]
    pub wards_placed: u32,
}

// == Hero ==
/// A hero reference record.
///
/// `image_url` may arrive as a host-relative path; the game data service
/// qualifies it against the external host. `image` is a legacy alias some
/// API versions use instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hero {
    pub id: u32,
    /// Internal name, e.g. `Sparrow`
    pub name: String,
    /// Player-facing name, e.g. `Sparrow the Archer`
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub abilities: Vec<Value>,
    #[serde(default)]
    pub stats: Value,
}

impl Hero {
    /// Preferred image path, falling back to the legacy `image` field.
    pub fn image_path(&self) -> Option<&str> {
        self.image_url.as_deref().or(self.image.as_deref())
    }
}

// == Item ==
/// An item reference record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: u32,
    #[serde(default)]
    pub stats: Value,
}

impl Item {
    /// Preferred image path, falling back to the legacy `image` field.
    pub fn image_path(&self) -> Option<&str> {
        self.image_url.as_deref().or(self.image.as_deref())
    }
}

// == Build ==
/// A community item build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Build {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_player_id: Option<String>,
    #[serde(default)]
    pub hero_id: u32,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub crest_id: Option<u32>,
    #[serde(default)]
    pub item_ids: Vec<u32>,
    #[serde(default)]
    pub skill_order: Vec<u32>,
    #[serde(default)]
    pub current_version: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// == Page Wrappers ==
/// One page of a match listing, with the cursor for the next page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchesPage {
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub cursor: Option<String>,
}

/// One page of the ranked leaderboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardPage {
    #[serde(default)]
    pub players: Vec<Player>,
}
