use crate::api::DataProvider;
use crate::domain::{HeroId, HeroMetaStat, HeroRecord, ItemCatalog};
use crate::error::AppError;
use std::cell::OnceCell;
use std::collections::HashMap;
use tracing::info;

/// Hero list with id lookup.
#[derive(Debug, Clone, Default)]
pub struct HeroIndex {
    heroes: Vec<HeroRecord>,
    by_id: HashMap<HeroId, usize>,
}

impl HeroIndex {
    pub fn new(heroes: Vec<HeroRecord>) -> Self {
        let by_id = heroes.iter().enumerate().map(|(idx, h)| (h.id, idx)).collect();
        HeroIndex { heroes, by_id }
    }

    pub fn get(&self, id: HeroId) -> Option<&HeroRecord> {
        self.by_id.get(&id).map(|idx| &self.heroes[*idx])
    }

    pub fn all(&self) -> &[HeroRecord] {
        &self.heroes
    }

    pub fn name(&self, id: HeroId) -> String {
        self.get(id)
            .map(|h| h.localized_name.clone())
            .unwrap_or_else(|| format!("Hero ID {}", id))
    }

    pub fn is_empty(&self) -> bool {
        self.heroes.is_empty()
    }
}

/// Meta statistics keyed by hero.
#[derive(Debug, Clone, Default)]
pub struct MetaIndex {
    by_hero: HashMap<HeroId, HeroMetaStat>,
}

impl MetaIndex {
    pub fn new(stats: Vec<HeroMetaStat>) -> Self {
        MetaIndex {
            by_hero: stats.into_iter().map(|s| (s.hero_id, s)).collect(),
        }
    }

    pub fn get(&self, hero_id: HeroId) -> Option<&HeroMetaStat> {
        self.by_hero.get(&hero_id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_hero.is_empty()
    }
}

/// Static reference data, fetched on first use and read-only afterwards.
///
/// A failed fetch leaves the slot empty so the next caller tries again.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    heroes: OnceCell<HeroIndex>,
    meta: OnceCell<MetaIndex>,
    items: OnceCell<ItemCatalog>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heroes(&self, provider: &impl DataProvider) -> Result<&HeroIndex, AppError> {
        if let Some(index) = self.heroes.get() {
            return Ok(index);
        }
        let heroes = provider.fetch_heroes()?;
        info!(count = heroes.len(), "Loaded hero list");
        Ok(self.heroes.get_or_init(|| HeroIndex::new(heroes)))
    }

    pub fn meta(&self, provider: &impl DataProvider) -> Result<&MetaIndex, AppError> {
        if let Some(index) = self.meta.get() {
            return Ok(index);
        }
        let stats = provider.fetch_hero_meta_stats()?;
        info!(count = stats.len(), "Loaded hero meta stats");
        Ok(self.meta.get_or_init(|| MetaIndex::new(stats)))
    }

    pub fn items(&self, provider: &impl DataProvider) -> Result<&ItemCatalog, AppError> {
        if let Some(catalog) = self.items.get() {
            return Ok(catalog);
        }
        let catalog = provider.fetch_item_catalog()?;
        info!(count = catalog.len(), "Loaded item catalog");
        Ok(self.items.get_or_init(|| catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeProvider;

    #[test]
    fn fetches_reference_data_once() {
        let provider = FakeProvider::default()
            .with_heroes(vec![FakeProvider::hero(1, "Anti-Mage", &["Carry"])]);
        let cache = ReferenceCache::new();

        let first = cache.heroes(&provider).unwrap().all().len();
        let second = cache.heroes(&provider).unwrap().all().len();

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(provider.calls("heroes"), 1);
    }

    #[test]
    fn failed_fetch_is_not_cached() {
        let provider = FakeProvider::default().failing("items");
        let cache = ReferenceCache::new();

        assert!(cache.items(&provider).is_err());
        assert!(cache.items(&provider).is_err());
        assert_eq!(provider.calls("items"), 2);
    }

    #[test]
    fn hero_lookup_falls_back_to_id() {
        let index = HeroIndex::new(vec![FakeProvider::hero(1, "Anti-Mage", &["Carry"])]);
        assert_eq!(index.name(1), "Anti-Mage");
        assert_eq!(index.name(2), "Hero ID 2");
    }
}
