#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::TOKEN_RADIUS;
use crate::scene::{Scene, TokenId};

/// The topmost token whose disc contains `world_pt`.
///
/// Tokens are drawn in scene order, so later tokens sit on top and win ties.
#[must_use]
pub fn hit_token(world_pt: Point, scene: &Scene) -> Option<TokenId> {
    scene
        .tokens
        .iter()
        .rev()
        .find(|t| t.position().distance(world_pt) <= TOKEN_RADIUS)
        .map(|t| t.id.clone())
}
