//! Scene model: player tokens, annotations, and the runtime store that owns them.
//!
//! This module defines the data that describes what is on the tactics board
//! (`PlayerToken`, `Annotation`, grouped into a `Scene`) and the runtime store
//! that owns a scene while it is being edited (`SceneStore`).
//!
//! `Scene` is plain data: it is what gets serialized into a saved snapshot and
//! compared on round trips. `SceneStore` adds the editing context that never
//! leaves the session: the handle of the one annotation still being drawn and
//! a monotonic clock for minting ids.
//!
//! The serialized field names (`team`, `number`, `type`, `points`) match the
//! stored snapshot format, so previously saved boards load unchanged.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{AWAY_COLOR, AWAY_SEED, AWAY_SEED_ID, HOME_COLOR, HOME_SEED, HOME_SEED_ID, SPAWN_POINT};

/// Identifier of a player token, unique within a board.
pub type TokenId = String;

/// Identifier of an annotation, unique within a board.
pub type AnnotationId = String;

/// Which team a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    /// Disc fill colour for tokens on this side.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Home => HOME_COLOR,
            Self::Away => AWAY_COLOR,
        }
    }
}

/// A draggable player marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerToken {
    pub id: TokenId,
    /// Centre x in board coordinates.
    pub x: f64,
    /// Centre y in board coordinates.
    pub y: f64,
    /// Fixed at creation.
    #[serde(rename = "team")]
    pub side: Side,
    /// Jersey number shown on the disc.
    #[serde(rename = "number")]
    pub label: String,
}

impl PlayerToken {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The kind of a user-drawn annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationKind {
    /// Freehand stroke; points are appended while drawing.
    #[serde(rename = "line")]
    Freehand,
    /// Straight arrow; always exactly a start and an end point.
    #[serde(rename = "arrow")]
    Arrow,
}

/// A freehand stroke or arrow drawn over the pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    #[serde(rename = "type")]
    pub kind: AnnotationKind,
    /// Flattened path: `[x0, y0, x1, y1, ...]`.
    pub points: Vec<f64>,
    /// CSS colour string.
    pub color: String,
}

impl Annotation {
    /// Number of points (coordinate pairs) in the path.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    /// Iterate the path as points.
    pub fn path(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.chunks_exact(2).map(|c| Point::new(c[0], c[1]))
    }

    /// First point of the path.
    #[must_use]
    pub fn start(&self) -> Option<Point> {
        self.path().next()
    }

    /// Last point of the path.
    #[must_use]
    pub fn end(&self) -> Option<Point> {
        self.path().last()
    }
}

/// Structural problems found by [`Scene::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("duplicate token id: {0}")]
    DuplicateToken(TokenId),
    #[error("duplicate annotation id: {0}")]
    DuplicateAnnotation(AnnotationId),
    #[error("annotation {id} has a malformed path: {reason}")]
    MalformedPath { id: AnnotationId, reason: &'static str },
    #[error("non-finite coordinate in {0}")]
    NonFinite(String),
}

/// The full board: tokens and annotations in draw order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub tokens: Vec<PlayerToken>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Scene {
    /// A fresh board: one home and one away token, no annotations.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            tokens: vec![
                PlayerToken {
                    id: HOME_SEED_ID.to_owned(),
                    x: HOME_SEED.0,
                    y: HOME_SEED.1,
                    side: Side::Home,
                    label: "1".to_owned(),
                },
                PlayerToken {
                    id: AWAY_SEED_ID.to_owned(),
                    x: AWAY_SEED.0,
                    y: AWAY_SEED.1,
                    side: Side::Away,
                    label: "1".to_owned(),
                },
            ],
            annotations: Vec::new(),
        }
    }

    #[must_use]
    pub fn token(&self, id: &str) -> Option<&PlayerToken> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Number of tokens on `side`.
    #[must_use]
    pub fn count_side(&self, side: Side) -> usize {
        self.tokens.iter().filter(|t| t.side == side).count()
    }

    /// Check the structural invariants a scene must hold before it is stored.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SceneError> {
        let mut token_ids = HashSet::new();
        for token in &self.tokens {
            if !token_ids.insert(token.id.as_str()) {
                return Err(SceneError::DuplicateToken(token.id.clone()));
            }
            if !(token.x.is_finite() && token.y.is_finite()) {
                return Err(SceneError::NonFinite(token.id.clone()));
            }
        }

        let mut annotation_ids = HashSet::new();
        for ann in &self.annotations {
            if !annotation_ids.insert(ann.id.as_str()) {
                return Err(SceneError::DuplicateAnnotation(ann.id.clone()));
            }
            if ann.points.len() % 2 != 0 {
                return Err(SceneError::MalformedPath { id: ann.id.clone(), reason: "odd number of coordinates" });
            }
            match ann.kind {
                AnnotationKind::Arrow if ann.point_count() != 2 => {
                    return Err(SceneError::MalformedPath { id: ann.id.clone(), reason: "arrow needs exactly 2 points" });
                }
                AnnotationKind::Freehand if ann.point_count() == 0 => {
                    return Err(SceneError::MalformedPath { id: ann.id.clone(), reason: "empty stroke" });
                }
                _ => {}
            }
            if ann.points.iter().any(|v| !v.is_finite()) {
                return Err(SceneError::NonFinite(ann.id.clone()));
            }
        }
        Ok(())
    }
}

// =============================================================
// Id clock
// =============================================================

/// Mints `<prefix>-<millis>` ids that strictly increase within a session,
/// even when several are created in the same millisecond.
#[derive(Debug, Clone, Default)]
struct IdClock {
    last: u64,
}

impl IdClock {
    fn next(&mut self, prefix: &str) -> String {
        let stamp = now_ms().max(self.last.saturating_add(1));
        self.last = stamp;
        format!("{prefix}-{stamp}")
    }

    /// Advance past the numeric stamp of an id minted elsewhere.
    fn observe(&mut self, id: &str) {
        let Some((_, digits)) = id.rsplit_once('-') else {
            return;
        };
        if let Ok(stamp) = digits.parse::<u64>() {
            self.last = self.last.max(stamp);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

// =============================================================
// SceneStore
// =============================================================

/// Runtime owner of the scene being edited.
///
/// At most one annotation is open at a time; it is addressed by index and
/// only ever mutated through [`SceneStore::extend_annotation`].
#[derive(Debug, Clone)]
pub struct SceneStore {
    scene: Scene,
    open: Option<usize>,
    clock: IdClock,
}

impl SceneStore {
    /// Create a store holding a freshly seeded scene.
    #[must_use]
    pub fn new() -> Self {
        Self { scene: Scene::seeded(), open: None, clock: IdClock::default() }
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn tokens(&self) -> &[PlayerToken] {
        &self.scene.tokens
    }

    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.scene.annotations
    }

    #[must_use]
    pub fn token(&self, id: &str) -> Option<&PlayerToken> {
        self.scene.token(id)
    }

    /// The annotation currently being drawn, if any.
    #[must_use]
    pub fn open_annotation(&self) -> Option<&Annotation> {
        self.open.and_then(|i| self.scene.annotations.get(i))
    }

    /// Append a token for `side` at the spawn point. Its label is the
    /// number of tokens already on that side plus one.
    pub fn add_token(&mut self, side: Side) -> PlayerToken {
        let token = PlayerToken {
            id: self.clock.next("p"),
            x: SPAWN_POINT.0,
            y: SPAWN_POINT.1,
            side,
            label: (self.scene.count_side(side) + 1).to_string(),
        };
        self.scene.tokens.push(token.clone());
        token
    }

    /// Reposition a token. Returns `false` if no token has that id.
    pub fn move_token(&mut self, id: &str, position: Point) -> bool {
        let Some(token) = self.scene.tokens.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        token.x = position.x;
        token.y = position.y;
        true
    }

    /// Start a new annotation at `start` and make it the open one.
    ///
    /// Freehand strokes are seeded with the single start point; arrows with
    /// the start point duplicated as a provisional end. Any annotation left
    /// open is closed first.
    pub fn begin_annotation(&mut self, kind: AnnotationKind, start: Point, color: &str) -> AnnotationId {
        self.end_annotation();
        let points = match kind {
            AnnotationKind::Freehand => vec![start.x, start.y],
            AnnotationKind::Arrow => vec![start.x, start.y, start.x, start.y],
        };
        let id = self.clock.next("d");
        self.scene.annotations.push(Annotation { id: id.clone(), kind, points, color: color.to_owned() });
        self.open = Some(self.scene.annotations.len() - 1);
        id
    }

    /// Extend the open annotation: freehand appends `point`, arrow replaces
    /// its end point. Returns `false` when nothing is open.
    pub fn extend_annotation(&mut self, point: Point) -> bool {
        let Some(ann) = self.open.and_then(|i| self.scene.annotations.get_mut(i)) else {
            return false;
        };
        match ann.kind {
            AnnotationKind::Freehand => ann.points.extend([point.x, point.y]),
            AnnotationKind::Arrow => {
                ann.points.truncate(2);
                ann.points.extend([point.x, point.y]);
            }
        }
        true
    }

    /// Close the open annotation, returning it. Idempotent.
    pub fn end_annotation(&mut self) -> Option<Annotation> {
        self.open
            .take()
            .and_then(|i| self.scene.annotations.get(i).cloned())
    }

    /// Replace everything with the two seed tokens and no annotations.
    pub fn reset(&mut self) {
        self.scene = Scene::seeded();
        self.open = None;
    }

    /// Replace the whole scene, e.g. with a loaded snapshot.
    pub fn load(&mut self, scene: Scene) {
        for id in scene.tokens.iter().map(|t| &t.id).chain(scene.annotations.iter().map(|a| &a.id)) {
            self.clock.observe(id);
        }
        self.scene = scene;
        self.open = None;
    }
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}
