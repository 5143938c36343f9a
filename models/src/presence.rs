use crate::UserId;

use std::collections::BTreeSet;

use serde::Serialize;

/// User ids the server currently reports as online.
///
/// Each server push carries the complete list, so the set is only ever
/// replaced, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PresenceSet {
    online: BTreeSet<UserId>,
}

impl PresenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards the current contents and takes `ids` as the new online set.
    pub fn replace<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = UserId>,
    {
        self.online = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.online.clear();
    }

    pub fn is_online(&self, id: &UserId) -> bool {
        self.online.contains(id)
    }

    pub fn len(&self) -> usize {
        self.online.len()
    }

    pub fn is_empty(&self) -> bool {
        self.online.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.online.iter()
    }
}

impl FromIterator<UserId> for PresenceSet {
    fn from_iter<T: IntoIterator<Item = UserId>>(iter: T) -> Self {
        Self {
            online: iter.into_iter().collect(),
        }
    }
}
