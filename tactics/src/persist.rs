//! Persistence adapter: named board snapshots scoped to the signed-in user.
//!
//! DESIGN
//! ======
//! The adapter talks to two injected collaborators, a [`SnapshotStore`] and an
//! [`IdentityProvider`]. Both are constructed once by the host and handed to
//! [`Persistence::new`]; nothing here reaches for a global client.
//!
//! Remote failures stop at this boundary. They are logged, recorded as the
//! latest [`Notice`] for the UI, and returned to the caller, but they never
//! touch the scene: saves do not mutate the board optimistically, so there
//! is nothing to roll back.
//!
//! CONCURRENCY
//! ===========
//! The adapter is shared by event callbacks on a single-threaded event loop,
//! so state lives in `Cell`/`RefCell` and methods take `&self`. No borrow is
//! held across an `.await`. A save-in-progress flag turns a second save
//! started while one is awaiting the store into [`AbortReason::InFlight`].
//! Writes are last-write-wins; there is no version check.
//!
//! A [`Persistence::load`] that lands while a save is awaiting the store
//! wins the binding: the save's result only rebinds or unbinds the board if
//! no load happened in between.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

pub mod memory;

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::consts::FALLBACK_SNAPSHOT_NAME;
use crate::engine::{Action, EngineCore};
use crate::scene::Scene;

pub use memory::{MemoryStore, StaticIdentity};

/// Identifier of a stored snapshot.
pub type SnapshotId = Uuid;

/// Identifier of the user who owns a snapshot.
pub type OwnerId = Uuid;

// =============================================================
// Records
// =============================================================

/// A named, persisted copy of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub id: SnapshotId,
    pub owner_id: OwnerId,
    pub name: String,
    pub scene: Scene,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Payload for creating a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSnapshot {
    pub owner_id: OwnerId,
    pub name: String,
    pub scene: Scene,
}

/// The authenticated user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: OwnerId,
    pub name: String,
}

// =============================================================
// Collaborators
// =============================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot store unreachable: {0}")]
    Unreachable(String),
    #[error("snapshot store rejected the request (status {status})")]
    Rejected { status: u16 },
    #[error("not authorized")]
    Unauthorized,
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Per-owner record store for snapshots.
#[async_trait::async_trait(?Send)]
pub trait SnapshotStore {
    /// All snapshots owned by `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be reached or refuses.
    async fn list(&self, owner_id: OwnerId) -> Result<Vec<BoardSnapshot>, StoreError>;

    /// Create a snapshot and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write is not accepted.
    async fn insert(&self, snapshot: NewSnapshot) -> Result<SnapshotId, StoreError>;

    /// Overwrite the scene of an existing snapshot. The name is untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the snapshot does not exist, belongs to
    /// another owner, or the store is unreachable.
    async fn update(&self, owner_id: OwnerId, id: SnapshotId, scene: &Scene) -> Result<(), StoreError>;
}

/// Source of the signed-in user.
#[async_trait::async_trait(?Send)]
pub trait IdentityProvider {
    /// The current user, or `None` for an anonymous session.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the provider cannot be reached.
    async fn current_user(&self) -> Result<Option<CurrentUser>, StoreError>;
}

// =============================================================
// Outcomes
// =============================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistError {
    #[error("could not determine the current user: {0}")]
    Identity(#[source] StoreError),
    #[error("could not list snapshots: {0}")]
    List(#[source] StoreError),
    #[error("could not save snapshot: {0}")]
    Save(#[source] StoreError),
}

/// Why a save did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No signed-in user; the board stays usable but unsaved.
    Anonymous,
    /// The name prompt was dismissed or left empty.
    Cancelled,
    /// Another save is still awaiting the store.
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(SnapshotId),
    Updated(SnapshotId),
    Aborted(AbortReason),
}

/// Outcome of the naming step of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameDecision {
    Use(String),
    Aborted,
}

/// User-visible, non-blocking message about the last remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved { name: String },
    Failed { message: String },
}

/// Pick the name for a save.
///
/// A board already bound to a snapshot keeps that snapshot's name and ignores
/// `input`; if the snapshot is no longer in `snapshots` the fallback name is
/// used. An unbound board needs a non-blank `input`; blank or `None`
/// (prompt dismissed) aborts.
#[must_use]
pub fn determine_snapshot_name(
    current_id: Option<SnapshotId>,
    snapshots: &[BoardSnapshot],
    input: Option<&str>,
) -> NameDecision {
    if let Some(id) = current_id {
        let name = snapshots
            .iter()
            .find(|s| s.id == id)
            .map_or(FALLBACK_SNAPSHOT_NAME, |s| s.name.as_str());
        return NameDecision::Use(name.to_owned());
    }
    match input.map(str::trim) {
        Some(name) if !name.is_empty() => NameDecision::Use(name.to_owned()),
        _ => NameDecision::Aborted,
    }
}

/// Clears the save-in-progress flag when the save finishes or is dropped.
struct InFlight<'a>(&'a Cell<bool>);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// =============================================================
// Persistence
// =============================================================

/// Bridges the board to the snapshot store for the signed-in user.
pub struct Persistence<S, I> {
    store: S,
    identity: I,
    owner: RefCell<Option<CurrentUser>>,
    snapshots: RefCell<Vec<BoardSnapshot>>,
    current_id: Cell<Option<SnapshotId>>,
    /// Bumped by every load that changes the binding.
    load_epoch: Cell<u64>,
    saving: Cell<bool>,
    notice: RefCell<Option<Notice>>,
}

impl<S: SnapshotStore, I: IdentityProvider> Persistence<S, I> {
    #[must_use]
    pub fn new(store: S, identity: I) -> Self {
        Self {
            store,
            identity,
            owner: RefCell::new(None),
            snapshots: RefCell::new(Vec::new()),
            current_id: Cell::new(None),
            load_epoch: Cell::new(0),
            saving: Cell::new(false),
            notice: RefCell::new(None),
        }
    }

    /// Resolve the signed-in user and fetch their snapshots.
    ///
    /// An identity failure leaves the session anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Identity`] or [`PersistError::List`]; the board
    /// stays usable either way.
    pub async fn init(&self) -> Result<Option<CurrentUser>, PersistError> {
        let user = match self.identity.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "identity lookup failed; continuing anonymously");
                self.owner.replace(None);
                return Err(self.fail(PersistError::Identity(e)));
            }
        };
        match &user {
            Some(u) => info!(user_id = %u.id, "signed in"),
            None => debug!("anonymous session"),
        }
        self.owner.replace(user.clone());
        self.refresh().await?;
        Ok(user)
    }

    /// Snapshots owned by `owner_id`, newest first. Anonymous sessions get an
    /// empty list without contacting the store.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::List`] if the store call fails.
    pub async fn list_snapshots(&self, owner_id: Option<OwnerId>) -> Result<Vec<BoardSnapshot>, PersistError> {
        let Some(owner_id) = owner_id else {
            return Ok(Vec::new());
        };
        self.store.list(owner_id).await.map_err(PersistError::List)
    }

    /// Re-fetch the cached snapshot list for the signed-in user. On failure
    /// the previous list is kept.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::List`] if the store call fails.
    pub async fn refresh(&self) -> Result<(), PersistError> {
        match self.list_snapshots(self.owner_id()).await {
            Ok(list) => {
                debug!(count = list.len(), "snapshot list refreshed");
                self.snapshots.replace(list);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "snapshot list refresh failed");
                Err(self.fail(e))
            }
        }
    }

    /// Whether the next [`Persistence::save`] will use the name input, i.e.
    /// whether the host should prompt for one.
    #[must_use]
    pub fn needs_name(&self) -> bool {
        self.current_id.get().is_none()
    }

    /// Save `scene`: create a snapshot named from `name_input` when the board
    /// is unsaved, otherwise overwrite the bound snapshot's scene. A
    /// successful save refreshes the snapshot list.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Save`] if the store rejects or cannot be
    /// reached. The scene is unchanged. `current_id` is unchanged too, except
    /// that a bound snapshot the store reports missing (404) is unbound so
    /// the next save creates a new one.
    pub async fn save(&self, scene: &Scene, name_input: Option<&str>) -> Result<SaveOutcome, PersistError> {
        let Some(owner_id) = self.owner_id() else {
            debug!("save skipped: anonymous session");
            return Ok(SaveOutcome::Aborted(AbortReason::Anonymous));
        };
        let Some(guard) = InFlight::enter(&self.saving) else {
            debug!("save skipped: another save is in flight");
            return Ok(SaveOutcome::Aborted(AbortReason::InFlight));
        };

        let current_id = self.current_id.get();
        let epoch = self.load_epoch.get();
        let decision = determine_snapshot_name(current_id, &self.snapshots.borrow(), name_input);
        let NameDecision::Use(name) = decision else {
            debug!("save cancelled at name prompt");
            return Ok(SaveOutcome::Aborted(AbortReason::Cancelled));
        };

        let result = match current_id {
            Some(id) => self
                .store
                .update(owner_id, id, scene)
                .await
                .map(|()| SaveOutcome::Updated(id)),
            None => self
                .store
                .insert(NewSnapshot { owner_id, name: name.clone(), scene: scene.clone() })
                .await
                .map(SaveOutcome::Created),
        };
        drop(guard);

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, name = %name, "save failed");
                let missing = current_id.is_some() && matches!(e, StoreError::Rejected { status: 404 });
                let error = PersistError::Save(e);
                if missing && self.load_epoch.get() == epoch {
                    self.current_id.set(None);
                    let message = format!("{error}; \"{name}\" no longer exists, save again to store this board under a new name");
                    self.notice.replace(Some(Notice::Failed { message }));
                    return Err(error);
                }
                return Err(self.fail(error));
            }
        };
        if let SaveOutcome::Created(id) = outcome {
            if self.load_epoch.get() == epoch {
                self.current_id.set(Some(id));
            } else {
                debug!(%id, "snapshot created but board was loaded meanwhile; keeping the loaded binding");
            }
        }
        info!(?outcome, name = %name, "snapshot saved");

        // The save stands even if the list cannot be re-fetched.
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "snapshot list stale after save");
        }
        self.notice.replace(Some(Notice::Saved { name }));
        Ok(outcome)
    }

    /// Bind the board to a snapshot. `None` unbinds and resets the board to
    /// its seed; a cached id replaces the scene wholesale; an unknown id is
    /// ignored.
    pub fn load(&self, id: Option<SnapshotId>, engine: &mut EngineCore) -> Vec<Action> {
        let Some(id) = id else {
            self.current_id.set(None);
            self.bump_epoch();
            return engine.reset();
        };
        let scene = self
            .snapshots
            .borrow()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.scene.clone());
        let Some(scene) = scene else {
            debug!(%id, "load ignored: snapshot not in list");
            return Vec::new();
        };
        self.current_id.set(Some(id));
        self.bump_epoch();
        engine.load_scene(scene)
    }

    // --- Queries ---

    #[must_use]
    pub fn owner(&self) -> Option<CurrentUser> {
        self.owner.borrow().clone()
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<OwnerId> {
        self.owner.borrow().as_ref().map(|u| u.id)
    }

    /// The cached snapshot list, newest first.
    #[must_use]
    pub fn snapshots(&self) -> Vec<BoardSnapshot> {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn current_id(&self) -> Option<SnapshotId> {
        self.current_id.get()
    }

    /// Display name of the bound snapshot, if the board is bound.
    #[must_use]
    pub fn current_name(&self) -> Option<String> {
        let id = self.current_id.get()?;
        match determine_snapshot_name(Some(id), &self.snapshots.borrow(), None) {
            NameDecision::Use(name) => Some(name),
            NameDecision::Aborted => None,
        }
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    /// Take the latest notice for display.
    pub fn take_notice(&self) -> Option<Notice> {
        self.notice.borrow_mut().take()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn bump_epoch(&self) {
        self.load_epoch.set(self.load_epoch.get().wrapping_add(1));
    }

    fn fail(&self, error: PersistError) -> PersistError {
        self.notice.replace(Some(Notice::Failed { message: error.to_string() }));
        error
    }
}
