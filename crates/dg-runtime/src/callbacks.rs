use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub type DialogueCallback = Box<dyn FnMut()>;

/// When a registered entry callback runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CallbackPolicy {
    /// Every time the entry is displayed, including revisits through jumps.
    #[default]
    EveryVisit,
    /// Only the first time the entry is displayed until callbacks are cleared.
    FirstVisit,
}

#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: BTreeMap<usize, DialogueCallback>,
    fired: BTreeSet<usize>,
    policy: CallbackPolicy,
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("indices", &self.callbacks.keys().collect::<Vec<_>>())
            .field("fired", &self.fired)
            .field("policy", &self.policy)
            .finish()
    }
}

impl CallbackRegistry {
    pub fn new(policy: CallbackPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> CallbackPolicy {
        self.policy
    }

    /// Replaces any callback already registered at `entry_index`.
    pub fn register(&mut self, entry_index: usize, callback: impl FnMut() + 'static) {
        self.callbacks.insert(entry_index, Box::new(callback));
        self.fired.remove(&entry_index);
    }

    pub fn remove(&mut self, entry_index: usize) -> bool {
        self.fired.remove(&entry_index);
        self.callbacks.remove(&entry_index).is_some()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
        self.fired.clear();
    }

    pub fn contains(&self, entry_index: usize) -> bool {
        self.callbacks.contains_key(&entry_index)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Runs the callback for a displayed entry. Returns whether one ran.
    pub fn invoke(&mut self, entry_index: usize) -> bool {
        let Some(callback) = self.callbacks.get_mut(&entry_index) else {
            tracing::debug!(entry = entry_index, "no callback registered for entry");
            return false;
        };

        if self.policy == CallbackPolicy::FirstVisit && !self.fired.insert(entry_index) {
            tracing::trace!(entry = entry_index, "callback already fired once");
            return false;
        }

        callback();
        true
    }
}
