use std::collections::BTreeMap;

use crate::diagnostics;
use crate::steps::{RouteNode, route_key};

/// Keeps detached step UI handles alive for reattachment, keyed by route
/// key. The key set is bounded by the fixed wizard step count, so entries
/// are never evicted.
#[derive(Debug, Default)]
pub struct StepCache<H> {
    entries: BTreeMap<String, H>,
}

impl<H> StepCache<H> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn should_detach(&self, route: &RouteNode) -> bool {
        diagnostics::record(format!("cache: detach eligible key={}", route_key(route)));
        true
    }

    pub fn store(&mut self, route: &RouteNode, handle: H) {
        let key = route_key(route);
        diagnostics::record(format!("cache: store key={key}"));
        self.entries.insert(key, handle);
    }

    pub fn should_attach(&self, route: &RouteNode) -> bool {
        self.entries.contains_key(&route_key(route))
    }

    pub fn retrieve(&self, route: &RouteNode) -> Option<&H> {
        self.entries.get(&route_key(route))
    }

    pub fn take(&mut self, route: &RouteNode) -> Option<H> {
        let key = route_key(route);
        let handle = self.entries.remove(&key);
        diagnostics::record(format!(
            "cache: attach key={key} hit={}",
            handle.is_some()
        ));
        handle
    }

    pub fn should_reuse(&self, future: &RouteNode, current: &RouteNode) -> bool {
        future == current
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepId;

    #[test]
    fn every_route_is_eligible_for_detach() {
        let cache = StepCache::<u32>::new();
        for step in crate::steps::WIZARD_STEPS {
            assert!(cache.should_detach(&RouteNode::for_step(step)));
        }
    }

    #[test]
    fn store_then_retrieve_round_trips() {
        let mut cache = StepCache::new();
        let auth = RouteNode::for_step(StepId::Auth);

        cache.store(&auth, "auth screen");
        assert!(cache.should_attach(&auth));
        assert_eq!(cache.retrieve(&auth), Some(&"auth screen"));
    }

    #[test]
    fn unstored_routes_report_nothing_to_attach() {
        let cache = StepCache::<&str>::new();
        let config = RouteNode::for_step(StepId::Config);

        assert!(!cache.should_attach(&config));
        assert_eq!(cache.retrieve(&config), None);
    }

    #[test]
    fn store_overwrites_the_prior_entry_for_a_key() {
        let mut cache = StepCache::new();
        let upload = RouteNode::for_step(StepId::Upload);

        cache.store(&upload, 1);
        cache.store(&upload, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.retrieve(&upload), Some(&2));
    }

    #[test]
    fn take_transfers_ownership_for_reattachment() {
        let mut cache = StepCache::new();
        let migrate = RouteNode::for_step(StepId::Migrate);

        cache.store(&migrate, "migrate screen");
        assert_eq!(cache.take(&migrate), Some("migrate screen"));
        assert!(!cache.should_attach(&migrate));
        assert_eq!(cache.take(&migrate), None);
    }

    #[test]
    fn reuse_follows_structural_route_equality() {
        let cache = StepCache::<()>::new();
        let a = RouteNode::for_step(StepId::Auth);
        let b = RouteNode::for_step(StepId::Auth);
        let c = RouteNode::for_step(StepId::Config);

        assert!(cache.should_reuse(&a, &b));
        assert!(!cache.should_reuse(&a, &c));
    }
}
