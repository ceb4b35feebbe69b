//! Game Data Service
//!
//! Cache-backed accessor for the two reference collections (heroes, items).
//! Each collection is fetched at most once per TTL window, decorated with
//! absolute image URLs, cached, and kept as an in-memory snapshot for
//! id/name lookups.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::{keys, TtlCache, HERO_CACHE_TTL, ITEM_CACHE_TTL};
use crate::client::ApiClient;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Hero, Item};

// == Game Data Service ==
/// In-memory + cache-backed hero and item lookups.
///
/// Two overlapping fetches of the same collection both go to the network
/// and both write the cache; last writer wins, which is harmless because
/// cached values are idempotent snapshots.
pub struct GameDataService {
    api: Arc<ApiClient>,
    cache: Arc<TtlCache>,
    /// Host used to qualify relative image paths
    image_base: String,
    heroes: RwLock<Option<Vec<Hero>>>,
    items: RwLock<Option<Vec<Item>>>,
}

impl GameDataService {
    // == Constructor ==
    pub fn new(api: Arc<ApiClient>, cache: Arc<TtlCache>) -> Self {
        let image_base = api.base_url().to_string();
        Self {
            api,
            cache,
            image_base,
            heroes: RwLock::new(None),
            items: RwLock::new(None),
        }
    }

    /// Builds the service and both collaborators from configuration: the
    /// client per the configured transport, the cache file-backed under
    /// `cache_dir` or in-memory when none is set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config)?);
        let cache = Arc::new(TtlCache::from_config(config));
        Ok(Self::new(api, cache))
    }

    fn read<T>(lock: &RwLock<Option<Vec<T>>>) -> RwLockReadGuard<'_, Option<Vec<T>>> {
        lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write<T>(lock: &RwLock<Option<Vec<T>>>) -> RwLockWriteGuard<'_, Option<Vec<T>>> {
        lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // == Heroes ==
    /// Returns the hero list, from cache when possible.
    ///
    /// On a cache miss the list is fetched, every record is decorated with
    /// an absolute image URL, and the decorated collection is cached for
    /// 24 hours and kept as the in-memory snapshot.
    pub async fn get_heroes(&self) -> Result<Vec<Hero>> {
        if let Some(cached) = self.cache.get::<Vec<Hero>>(&keys::heroes()) {
            *Self::write(&self.heroes) = Some(cached.clone());
            return Ok(cached);
        }

        let mut heroes = self.api.get_heroes().await?;
        for hero in &mut heroes {
            hero.image_url = hero
                .image_path()
                .map(|path| resolve_image_url(&self.image_base, path));
        }

        self.cache.set(&keys::heroes(), &heroes, HERO_CACHE_TTL);
        *Self::write(&self.heroes) = Some(heroes.clone());
        Ok(heroes)
    }

    // == Items ==
    /// Returns the item list, from cache when possible. Same contract as
    /// [`get_heroes`](Self::get_heroes).
    pub async fn get_items(&self) -> Result<Vec<Item>> {
        if let Some(cached) = self.cache.get::<Vec<Item>>(&keys::items()) {
            *Self::write(&self.items) = Some(cached.clone());
            return Ok(cached);
        }

        let mut items = self.api.get_items().await?;
        for item in &mut items {
            item.image_url = item
                .image_path()
                .map(|path| resolve_image_url(&self.image_base, path));
        }

        self.cache.set(&keys::items(), &items, ITEM_CACHE_TTL);
        *Self::write(&self.items) = Some(items.clone());
        Ok(items)
    }

    // == Lookups ==
    /// Linear scan over the loaded snapshot; absent if not yet loaded.
    pub fn get_hero_by_id(&self, id: u32) -> Option<Hero> {
        Self::read(&self.heroes)
            .as_ref()?
            .iter()
            .find(|h| h.id == id)
            .cloned()
    }

    /// Matches either the internal name or the display name.
    pub fn get_hero_by_name(&self, name: &str) -> Option<Hero> {
        Self::read(&self.heroes)
            .as_ref()?
            .iter()
            .find(|h| h.name == name || h.display_name == name)
            .cloned()
    }

    pub fn get_item_by_id(&self, id: u32) -> Option<Item> {
        Self::read(&self.items)
            .as_ref()?
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Matches either the internal name or the display name.
    pub fn get_item_by_name(&self, name: &str) -> Option<Item> {
        Self::read(&self.items)
            .as_ref()?
            .iter()
            .find(|i| i.name == name || i.display_name == name)
            .cloned()
    }

    // == Preload ==
    /// Fetches both collections concurrently; resolves when both complete,
    /// or fails with the first error. A failure does not roll back caching
    /// the collection that already succeeded.
    pub async fn preload_all(&self) -> Result<()> {
        tokio::try_join!(self.get_heroes(), self.get_items())?;
        Ok(())
    }
}

/// Qualifies a relative image path against the external host; absolute
/// URLs pass through unchanged.
fn resolve_image_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
