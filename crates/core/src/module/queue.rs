//! Deferred removal of dynamic modules.
//!
//! Modules declared by a route outlive it by one navigation, so moving back
//! and forth between two routes does not thrash registrations. Every
//! navigation drains the queue once: each pending name is either handed out
//! for unregistration or kept for the next cycle because a route involved in
//! the navigation still declares it.

use std::collections::HashSet;

use super::depth;

/// What to do with one name popped from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Still declared by the arriving or departing route; keep it queued.
    Retain(String),
    /// No longer referenced; unregister it if the store still has it.
    Unregister(String),
}

impl Removal {
    pub fn name(&self) -> &str {
        match self {
            Removal::Retain(name) | Removal::Unregister(name) => name,
        }
    }
}

/// Pending module removals, popped from the tail.
///
/// Names are pushed shallowest first, so popping yields the deepest module
/// first and children are torn down before their parents. A name is never
/// queued twice.
#[derive(Debug, Clone, Default)]
pub struct RemovalQueue {
    names: Vec<String>,
}

impl RemovalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops every pending name, tail first.
    pub fn drain(&mut self, active: &HashSet<String>) -> Vec<Removal> {
        let mut removals = Vec::with_capacity(self.names.len());
        while let Some(name) = self.names.pop() {
            if active.contains(&name) {
                removals.push(Removal::Retain(name));
            } else {
                removals.push(Removal::Unregister(name));
            }
        }
        removals
    }

    /// Queues names for the next drain.
    ///
    /// Duplicates (within `names` or already pending) are dropped, keeping the
    /// first occurrence; the rest are stably sorted by depth, shallowest first.
    pub fn enqueue<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: HashSet<String> = self.names.iter().cloned().collect();
        let mut incoming: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.insert(name.clone()))
            .collect();

        incoming.sort_by_key(|name| depth(name));
        self.names.extend(incoming);
    }

    /// Runs one navigation cycle: drains the queue, then re-queues the retained
    /// names together with the names declared by the departing route.
    pub fn cycle<I, S>(&mut self, active: &HashSet<String>, departing: I) -> Vec<Removal>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let removals = self.drain(active);

        let retained = removals.iter().filter_map(|removal| match removal {
            Removal::Retain(name) => Some(name.clone()),
            Removal::Unregister(_) => None,
        });
        let candidates: Vec<String> = retained
            .chain(departing.into_iter().map(Into::into))
            .collect();
        self.enqueue(candidates);

        removals
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Pending names, bottom of the queue first.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_drain_pops_deepest_first() {
        let mut queue = RemovalQueue::new();
        queue.enqueue(["a/b", "a", "a/b/c"]);
        assert_eq!(queue.names(), ["a", "a/b", "a/b/c"]);

        let removals = queue.drain(&HashSet::new());
        let order: Vec<&str> = removals.iter().map(Removal::name).collect();
        assert_eq!(order, vec!["a/b/c", "a/b", "a"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_depth_keeps_insertion_order() {
        let mut queue = RemovalQueue::new();
        queue.enqueue(["cart/1", "cart/2"]);
        assert_eq!(queue.names(), ["cart/1", "cart/2"]);
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let mut queue = RemovalQueue::new();
        queue.enqueue(["x", "y", "x"]);
        queue.enqueue(["y", "z"]);
        assert_eq!(queue.names(), ["x", "y", "z"]);
    }

    #[test]
    fn test_drain_retains_active() {
        let mut queue = RemovalQueue::new();
        queue.enqueue(["x", "y"]);

        let removals = queue.drain(&active(&["x"]));
        assert_eq!(
            removals,
            vec![
                Removal::Unregister("y".to_string()),
                Removal::Retain("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_cycle_requeues_retained_and_departing() {
        let mut queue = RemovalQueue::new();
        queue.enqueue(["x", "gone"]);

        let removals = queue.cycle(&active(&["x"]), ["page/1", "x"]);

        assert!(removals.contains(&Removal::Unregister("gone".to_string())));
        assert!(removals.contains(&Removal::Retain("x".to_string())));
        assert_eq!(queue.names(), ["x", "page/1"]);
    }

    #[test]
    fn test_module_outlives_one_navigation() {
        let mut queue = RemovalQueue::new();

        // A -> B: A's module is queued but not yet drained.
        let removals = queue.cycle(&active(&["x"]), ["x"]);
        assert!(removals.is_empty());
        assert!(queue.contains("x"));

        // B -> C: neither route declares x any more.
        let removals = queue.cycle(&HashSet::new(), Vec::<String>::new());
        assert_eq!(removals, vec![Removal::Unregister("x".to_string())]);
        assert!(queue.is_empty());
    }
}
