//! Remote Data Client
//!
//! Read-only GET client for the external stats API. Endpoint methods take
//! typed options, route either directly or through the configured relay,
//! unwrap relay envelopes transparently, and bound every request with a
//! fixed wall-clock timeout.

use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::transport::{decode_payload, request_url, TransportMode};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    Build, BuildsOptions, Hero, HeroStatsOptions, Item, LeaderboardOptions, LeaderboardPage,
    Match, MatchFeedOptions, MatchesOptions, MatchesPage, Player,
};

/// A match whose recorded end time is at most this old is reported as the
/// (possibly still-live) current match.
pub const CURRENT_MATCH_WINDOW: Duration = Duration::from_secs(5 * 60);

// == API Client ==
/// GET-only client for the external stats API.
pub struct ApiClient {
    http: Client,
    base_url: String,
    relay_url: Option<String>,
    mode: TransportMode,
}

impl ApiClient {
    // == Constructor ==
    /// Creates a client from configuration. The transport mode is fixed at
    /// construction; there is no per-request routing decision.
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            relay_url: config.relay_url.clone(),
            mode: config.transport_mode(),
        })
    }

    /// The external API host this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == Fetch ==
    /// Issues one GET request and decodes the response.
    ///
    /// Non-2xx statuses are hard failures carrying the status code and
    /// text; they are never retried here.
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        pairs: &[(String, String)],
    ) -> Result<T> {
        let url = request_url(
            self.mode,
            &self.base_url,
            self.relay_url.as_deref(),
            path,
            pairs,
        )?;
        debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                text: status.canonical_reason().unwrap_or("unknown status").to_string(),
            });
        }

        // Parse failures surface as decode errors, not transport errors
        let raw = response.text().await?;
        let body: Value = serde_json::from_str(&raw)?;
        decode_payload(body)
    }

    // == Player Endpoints ==
    pub async fn get_player(&self, player_id: &str) -> Result<Player> {
        self.fetch(&format!("/players/{}.json", player_id), &[]).await
    }

    pub async fn get_player_matches(
        &self,
        player_id: &str,
        options: &MatchesOptions,
    ) -> Result<MatchesPage> {
        self.fetch(
            &format!("/players/{}/matches.json", player_id),
            &options.query_pairs(),
        )
        .await
    }

    /// Player statistics arrive unversioned from upstream; callers get the
    /// raw JSON document.
    pub async fn get_player_statistics(
        &self,
        player_id: &str,
        time_frame: Option<&str>,
    ) -> Result<Value> {
        let mut pairs = Vec::new();
        if let Some(time_frame) = time_frame {
            pairs.push(("time_frame".to_string(), time_frame.to_string()));
        }
        self.fetch(&format!("/players/{}/statistics.json", player_id), &pairs)
            .await
    }

    pub async fn get_player_hero_statistics(
        &self,
        player_id: &str,
        options: &HeroStatsOptions,
    ) -> Result<Value> {
        self.fetch(
            &format!("/players/{}/hero_statistics.json", player_id),
            &options.query_pairs(),
        )
        .await
    }

    // == Match Endpoints ==
    pub async fn get_match(&self, match_id: &str) -> Result<Match> {
        self.fetch(&format!("/matches/{}.json", match_id), &[]).await
    }

    pub async fn get_matches(&self, options: &MatchFeedOptions) -> Result<MatchesPage> {
        self.fetch("/matches.json", &options.query_pairs()).await
    }

    // == Hero Endpoints ==
    pub async fn get_heroes(&self) -> Result<Vec<Hero>> {
        self.fetch("/heroes.json", &[]).await
    }

    pub async fn get_hero(&self, hero_name: &str) -> Result<Hero> {
        self.fetch(&format!("/heroes/{}.json", hero_name), &[]).await
    }

    // == Item Endpoints ==
    pub async fn get_items(&self) -> Result<Vec<Item>> {
        self.fetch("/items.json", &[]).await
    }

    pub async fn get_item(&self, item_name: &str) -> Result<Item> {
        self.fetch(&format!("/items/{}.json", item_name), &[]).await
    }

    // == Build Endpoints ==
    pub async fn get_builds(&self, options: &BuildsOptions) -> Result<Vec<Build>> {
        self.fetch("/builds.json", &options.query_pairs()).await
    }

    pub async fn get_build(&self, build_id: u64) -> Result<Build> {
        self.fetch(&format!("/builds/{}.json", build_id), &[]).await
    }

    // == Leaderboard ==
    pub async fn get_leaderboard(&self, options: &LeaderboardOptions) -> Result<LeaderboardPage> {
        self.fetch("/players.json", &options.query_pairs()).await
    }

    // == Current Match ==
    /// Best-effort lookup of a player's current match.
    ///
    /// There is no live-match endpoint upstream, so this is a heuristic:
    /// the player's single most recent match is treated as current when its
    /// recorded end time is absent or less than five minutes in the past.
    /// A recently finished match can therefore be reported as current.
    pub async fn get_current_match(&self, player_id: &str) -> Result<Option<Match>> {
        let options = MatchesOptions {
            per_page: Some(1),
            ..MatchesOptions::default()
        };
        let page = self.get_player_matches(player_id, &options).await?;

        let Some(latest) = page.matches.into_iter().next() else {
            return Ok(None);
        };

        let current = match latest.ended_at {
            None => true,
            Some(ended_at) => {
                let age = Utc::now().signed_duration_since(ended_at);
                age.num_seconds() < CURRENT_MATCH_WINDOW.as_secs() as i64
            }
        };

        Ok(if current { Some(latest) } else { None })
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
