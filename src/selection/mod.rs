//! Keyed reconciliation of rendered elements against new data.
//!
//! `reconcile` computes which keys enter, update and exit; `KeyedScene::apply`
//! turns that plan into the next element set. Nothing here touches a
//! document: elements are whatever the caller renders per datum.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

/// A datum matched to its key and its position in the new data.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<K, D> {
    pub key: K,
    pub datum: D,
    pub position: usize,
}

/// Outcome of joining new data against the keys already rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan<K, D> {
    /// New keys, in data order.
    pub enter: Vec<Joined<K, D>>,
    /// Keys present before and after, in data order.
    pub update: Vec<Joined<K, D>>,
    /// Previously rendered keys absent from the new data, in their old order.
    pub exit: Vec<K>,
    /// Later data items whose key was already taken by an earlier item.
    pub dropped: Vec<Joined<K, D>>,
}

impl<K, D> JoinPlan<K, D> {
    /// Number of elements after the plan is applied.
    #[must_use]
    pub fn resulting_len(&self) -> usize {
        self.enter.len() + self.update.len()
    }
}

/// Joins `data` against `existing_keys` by the identity `key_fn` returns.
///
/// When several items share a key the first one wins; the rest are listed in
/// `dropped` and logged.
pub fn reconcile<'a, K, D, F>(existing_keys: &[K], data: &'a [D], key_fn: F) -> JoinPlan<K, &'a D>
where
    K: Eq + Hash + Clone + Debug,
    F: Fn(&D) -> K,
{
    let existing: IndexSet<&K> = existing_keys.iter().collect();
    let mut seen: IndexSet<K> = IndexSet::with_capacity(data.len());
    let mut plan = JoinPlan {
        enter: Vec::new(),
        update: Vec::new(),
        exit: Vec::new(),
        dropped: Vec::new(),
    };

    for (position, datum) in data.iter().enumerate() {
        let key = key_fn(datum);
        if seen.contains(&key) {
            plan.dropped.push(Joined {
                key,
                datum,
                position,
            });
            continue;
        }
        seen.insert(key.clone());
        let joined = Joined {
            key,
            datum,
            position,
        };
        if existing.contains(&joined.key) {
            plan.update.push(joined);
        } else {
            plan.enter.push(joined);
        }
    }

    plan.exit = existing
        .into_iter()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();

    if !plan.dropped.is_empty() {
        let keys: Vec<&K> = plan.dropped.iter().map(|joined| &joined.key).collect();
        warn!(count = keys.len(), ?keys, "duplicate keys in joined data; keeping first occurrence");
    }
    debug!(
        enter = plan.enter.len(),
        update = plan.update.len(),
        exit = plan.exit.len(),
        "reconciled keyed data"
    );
    plan
}

/// Positional join: item `i` is matched to element `i`.
pub fn reconcile_by_index<D>(existing_len: usize, data: &[D]) -> JoinPlan<usize, &D> {
    let mut plan = JoinPlan {
        enter: Vec::new(),
        update: Vec::new(),
        exit: (data.len()..existing_len).collect(),
        dropped: Vec::new(),
    };
    for (position, datum) in data.iter().enumerate() {
        let joined = Joined {
            key: position,
            datum,
            position,
        };
        if position < existing_len {
            plan.update.push(joined);
        } else {
            plan.enter.push(joined);
        }
    }
    plan
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinSummary {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

/// Rendered elements keyed by data identity, kept in data order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedScene<K: Hash + Eq, E> {
    elements: IndexMap<K, E>,
}

impl<K: Hash + Eq, E> Default for KeyedScene<K, E> {
    fn default() -> Self {
        Self {
            elements: IndexMap::new(),
        }
    }
}

impl<K, E> KeyedScene<K, E>
where
    K: Eq + Hash + Clone + Debug,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Current keys in data order.
    #[must_use]
    pub fn keys(&self) -> Vec<K> {
        self.elements.keys().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&E> {
        self.elements.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.elements.iter()
    }

    pub fn elements(&self) -> impl Iterator<Item = &E> {
        self.elements.values()
    }

    /// Applies a plan: exiting elements are removed, entering ones built with
    /// `create`, surviving ones refreshed with `update`. The resulting order
    /// follows the data the plan was computed from.
    pub fn apply<D, C, U>(&mut self, plan: JoinPlan<K, D>, mut create: C, mut update: U) -> JoinSummary
    where
        C: FnMut(&K, &D) -> E,
        U: FnMut(&K, &D, &mut E),
    {
        let summary = JoinSummary {
            entered: plan.enter.len(),
            updated: plan.update.len(),
            exited: plan.exit.len(),
        };
        for key in &plan.exit {
            self.elements.shift_remove(key);
        }

        let mut joined: Vec<(bool, Joined<K, D>)> = plan
            .enter
            .into_iter()
            .map(|joined| (true, joined))
            .chain(plan.update.into_iter().map(|joined| (false, joined)))
            .collect();
        joined.sort_by_key(|(_, joined)| joined.position);

        let mut next = IndexMap::with_capacity(joined.len());
        for (entering, Joined { key, datum, .. }) in joined {
            let element = match self.elements.shift_remove(&key) {
                Some(mut element) if !entering => {
                    update(&key, &datum, &mut element);
                    element
                }
                _ => create(&key, &datum),
            };
            next.insert(key, element);
        }
        self.elements = next;
        summary
    }

    /// Reconciles `data` against the current keys and applies the result.
    pub fn join<D, F, C, U>(&mut self, data: &[D], key_fn: F, create: C, update: U) -> JoinSummary
    where
        F: Fn(&D) -> K,
        C: FnMut(&K, &&D) -> E,
        U: FnMut(&K, &&D, &mut E),
    {
        let plan = reconcile(&self.keys(), data, key_fn);
        self.apply(plan, create, update)
    }
}
