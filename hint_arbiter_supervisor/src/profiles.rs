use std::collections::HashMap;

use hint_arbiter_core::{ProfileId, ProfileLookup, ResourceValue};

/// In-memory profile table, for hosts that resolve their resource lists up
/// front (and for tests).
#[derive(Clone, Debug, Default)]
pub struct StaticProfiles {
    table: HashMap<ProfileId, Vec<ResourceValue>>,
}

impl StaticProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ProfileId, resources: impl Into<Vec<ResourceValue>>) {
        self.table.insert(id, resources.into());
    }
}

impl ProfileLookup for StaticProfiles {
    fn lookup(&self, id: ProfileId) -> Option<Vec<ResourceValue>> {
        self.table.get(&id).cloned()
    }
}
