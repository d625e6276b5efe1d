//! Shared numeric and palette constants for the tactics crate.

// ── Board geometry ──────────────────────────────────────────────

/// Width of the board in board-space units.
pub const BOARD_WIDTH: f64 = 800.0;

/// Height of the board in board-space units.
pub const BOARD_HEIGHT: f64 = 450.0;

/// Inset of the pitch touchlines from the board edge.
pub const PITCH_MARGIN: f64 = 20.0;

/// Where `add_token` places a new player: the centre spot.
pub const SPAWN_POINT: (f64, f64) = (400.0, 225.0);

/// Seed positions for the default home and away tokens.
pub const HOME_SEED: (f64, f64) = (400.0, 400.0);
pub const AWAY_SEED: (f64, f64) = (400.0, 50.0);

/// Ids of the two seed tokens present on every new or reset board.
pub const HOME_SEED_ID: &str = "h1";
pub const AWAY_SEED_ID: &str = "a1";

// ── Tokens ──────────────────────────────────────────────────────

/// Token disc radius in board units. Also the hit-test radius.
pub const TOKEN_RADIUS: f64 = 15.0;

pub const HOME_COLOR: &str = "#2563eb";
pub const AWAY_COLOR: &str = "#dc2626";

// ── Annotations ─────────────────────────────────────────────────

/// Accent colour every annotation is created with.
pub const ANNOTATION_COLOR: &str = "#bef264";

pub const ANNOTATION_STROKE_WIDTH: f64 = 3.0;

/// Arrowhead length and base width in board units.
pub const ARROWHEAD_LENGTH: f64 = 10.0;
pub const ARROWHEAD_WIDTH: f64 = 10.0;

// ── Snapshots ───────────────────────────────────────────────────

/// Default text offered when prompting for a new snapshot name.
pub const SNAPSHOT_NAME_SUGGESTION: &str = "4-3-3 attacking board";

/// Name used when the current snapshot is no longer in the cached list.
pub const FALLBACK_SNAPSHOT_NAME: &str = "Tactical setup";
