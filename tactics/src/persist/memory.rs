//! In-process snapshot store and fixed identity.
//!
//! Backs offline boards and tests. Behaves like the remote store: lists are
//! newest first, updates are refused for other owners, and the whole store
//! can be switched offline to exercise failure paths.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cell::{Cell, RefCell};

use uuid::Uuid;

use super::{BoardSnapshot, CurrentUser, IdentityProvider, NewSnapshot, OwnerId, SnapshotId, SnapshotStore, StoreError};
use crate::scene::{Scene, now_ms};

const STATUS_FORBIDDEN: u16 = 403;
const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RefCell<Vec<BoardSnapshot>>,
    offline: Cell<bool>,
    writes: Cell<usize>,
    last_created: Cell<i64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every call fails with [`StoreError::Unreachable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Number of accepted inserts and updates.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Stored snapshot by id, regardless of owner.
    #[must_use]
    pub fn get(&self, id: SnapshotId) -> Option<BoardSnapshot> {
        self.rows.borrow().iter().find(|s| s.id == id).cloned()
    }

    /// Delete a snapshot, as another session would. Returns whether it existed.
    pub fn remove(&self, id: SnapshotId) -> bool {
        let mut rows = self.rows.borrow_mut();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        rows.len() != before
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.borrow().is_empty()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.get() {
            return Err(StoreError::Unreachable("memory store is offline".to_owned()));
        }
        Ok(())
    }

    /// Creation stamp that never repeats, so ordering is total.
    fn next_created_at(&self) -> i64 {
        let now = i64::try_from(now_ms()).unwrap_or(i64::MAX);
        let stamp = now.max(self.last_created.get().saturating_add(1));
        self.last_created.set(stamp);
        stamp
    }
}

#[async_trait::async_trait(?Send)]
impl SnapshotStore for MemoryStore {
    async fn list(&self, owner_id: OwnerId) -> Result<Vec<BoardSnapshot>, StoreError> {
        self.check_online()?;
        let mut out: Vec<BoardSnapshot> = self
            .rows
            .borrow()
            .iter()
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn insert(&self, snapshot: NewSnapshot) -> Result<SnapshotId, StoreError> {
        self.check_online()?;
        let id = Uuid::new_v4();
        let created_at = self.next_created_at();
        self.rows.borrow_mut().push(BoardSnapshot {
            id,
            owner_id: snapshot.owner_id,
            name: snapshot.name,
            scene: snapshot.scene,
            created_at,
        });
        self.writes.set(self.writes.get() + 1);
        Ok(id)
    }

    async fn update(&self, owner_id: OwnerId, id: SnapshotId, scene: &Scene) -> Result<(), StoreError> {
        self.check_online()?;
        let mut rows = self.rows.borrow_mut();
        let Some(row) = rows.iter_mut().find(|s| s.id == id) else {
            return Err(StoreError::Rejected { status: STATUS_NOT_FOUND });
        };
        if row.owner_id != owner_id {
            return Err(StoreError::Rejected { status: STATUS_FORBIDDEN });
        }
        row.scene = scene.clone();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Identity provider that always reports the same user (or nobody).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<CurrentUser>,
}

impl StaticIdentity {
    #[must_use]
    pub fn signed_in(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None }
    }
}

#[async_trait::async_trait(?Send)]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<CurrentUser>, StoreError> {
        Ok(self.user.clone())
    }
}
