use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use super::QueryKey;

/// Issued for each request a view makes; only the newest one may render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    key: QueryKey,
}

impl Ticket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

/// Tracks which key a view currently displays.
#[derive(Debug, Default)]
pub struct QueryObserver {
    generation: AtomicU64,
    current: Mutex<Option<QueryKey>>,
}

impl QueryObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches the view to `key`, superseding every earlier ticket.
    pub fn observe(&self, key: QueryKey) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        let mut current = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(key.clone());
        Ticket { generation, key }
    }

    pub fn accept(&self, ticket: &Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    pub fn current_key(&self) -> Option<QueryKey> {
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
