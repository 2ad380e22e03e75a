use crate::environment::Environment;
use crate::matcher::Verdict;
use crate::util::{arc_address, BoundedFifo};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

type CacheKey = (String, usize);

/// Verdicts already computed, per module and environment
///
/// Environments are only referenced weakly and identified by address. The stored `Weak` keeps
/// the address from being reused while the entry exists, and entries of dropped environments are
/// never returned. They are removed when looked up, when evicted, or by [`VerdictCache::sweep`].
///
/// The cache holds at most `capacity` verdicts, evicting the oldest insertion first.
pub struct VerdictCache {
    state: Mutex<CacheState>,
}

struct CacheState {
    entries: HashMap<CacheKey, (Weak<Environment>, Verdict)>,

    /// Keys in insertion order
    order: BoundedFifo<CacheKey>,
}

impl VerdictCache {
    pub fn new(capacity: usize) -> VerdictCache {
        VerdictCache {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: BoundedFifo::new(capacity),
            }),
        }
    }

    pub fn get(&self, module: &str, environment: &Arc<Environment>) -> Option<Verdict> {
        let key = (module.to_owned(), arc_address(environment));
        let mut state = self.state.lock();
        let (weak, verdict) = state.entries.get(&key)?;
        if weak.strong_count() > 0 {
            return Some(verdict.clone());
        }
        state.entries.remove(&key);
        state.order.retain(|queued| queued != &key);
        None
    }

    /// Store a verdict, replacing any verdict already there for the same pair
    pub fn put(&self, module: &str, environment: &Arc<Environment>, verdict: Verdict) {
        let key = (module.to_owned(), arc_address(environment));
        let mut state = self.state.lock();
        if let Some(entry) = state.entries.get_mut(&key) {
            *entry = (Arc::downgrade(environment), verdict);
            return;
        }
        if state.order.capacity() == 0 {
            return;
        }
        if let Some(evicted) = state.order.push(key.clone()) {
            state.entries.remove(&evicted);
        }
        state
            .entries
            .insert(key, (Arc::downgrade(environment), verdict));
    }

    /// Remove the verdicts of environments which are gone, returning how many were removed
    pub fn sweep(&self) -> usize {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        let CacheState { entries, order } = &mut *state;
        order.retain(|key| entries.contains_key(key));
        before - entries.len()
    }

    /// Number of cached verdicts (including those of dropped environments not yet removed)
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().order.capacity()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::environment::StaticProvider;
    use crate::jvm::Version;
    use crate::matcher::MismatchReason;

    fn environment(name: &str) -> Arc<Environment> {
        Arc::new(Environment::new(name, StaticProvider::new(Version::JAVA8)))
    }

    #[test]
    fn keyed_by_module_and_environment() {
        let cache = VerdictCache::new(8);
        let first = environment("first");
        let second = environment("second");
        let rejected = Verdict::failed(MismatchReason::CheckFailed(String::from("boom")));

        cache.put("acme", &first, Verdict::Compatible);
        cache.put("acme", &second, rejected.clone());
        assert_eq!(cache.get("acme", &first), Some(Verdict::Compatible));
        assert_eq!(cache.get("acme", &second), Some(rejected));
        assert_eq!(cache.get("other", &first), None);

        // Last writer wins
        cache.put("acme", &first, Verdict::Incompatible(vec![]));
        assert_eq!(cache.get("acme", &first), Some(Verdict::Incompatible(vec![])));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn oldest_verdicts_are_evicted() {
        let cache = VerdictCache::new(2);
        let environment = environment("app");
        for module in ["a", "b", "c"] {
            cache.put(module, &environment, Verdict::Compatible);
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a", &environment), None);
        assert!(cache.get("b", &environment).is_some());
        assert!(cache.get("c", &environment).is_some());

        let disabled = VerdictCache::new(0);
        disabled.put("a", &environment, Verdict::Compatible);
        assert!(disabled.is_empty());
    }

    #[test]
    fn dropped_environments_are_not_retained() {
        let cache = VerdictCache::new(8);
        let kept = environment("kept");
        let dropped = environment("dropped");
        cache.put("acme", &kept, Verdict::Compatible);
        cache.put("acme", &dropped, Verdict::Compatible);

        let weak = Arc::downgrade(&dropped);
        drop(dropped);
        assert!(weak.upgrade().is_none());

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.sweep(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("acme", &kept), Some(Verdict::Compatible));
    }
}
