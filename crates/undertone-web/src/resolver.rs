//! Catalog-backed asset resolution.
//!
//! Lookups are synchronous, but outcomes are still delivered through a
//! spawned task so they land after the tick that requested them.

use undertone_core::{AmbientTag, AssetResolver, EntityKey};
use wasm_bindgen_futures::spawn_local;

use crate::catalog;
use crate::{Settlement, SettlementSink};

pub struct CatalogResolver {
    sink: SettlementSink,
}

impl CatalogResolver {
    pub fn new(sink: SettlementSink) -> Self {
        Self { sink }
    }
}

impl AssetResolver for CatalogResolver {
    fn resolve_ambient(&self, paragraph: usize, tag: &AmbientTag) {
        let sink = self.sink.clone();
        let (age, sense) = (tag.age.clone(), tag.sense.clone());
        spawn_local(async move {
            let url = catalog::ambient_url(&sense).map(str::to_string);
            let hit = if url.is_some() { "hit" } else { "none" };
            log::debug!("[resolve] ambient {age}/{sense} -> {hit}");
            sink.dispatch(Settlement::Ambient { index: paragraph, url });
        });
    }

    fn resolve_entity(&self, key: EntityKey, kind: &str) {
        let sink = self.sink.clone();
        let kind = kind.to_string();
        spawn_local(async move {
            let url = catalog::entity_url(&kind).map(str::to_string);
            let hit = if url.is_some() { "hit" } else { "none" };
            log::debug!("[resolve] entity {key} ({kind}) -> {hit}");
            sink.dispatch(Settlement::Entity { key, url });
        });
    }
}
