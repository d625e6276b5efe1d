use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point, clamp_to_board};
use crate::consts::ANNOTATION_COLOR;
use crate::hit;
use crate::input::{Button, InputState, PointerId, Tool, UiState};
use crate::render;
use crate::scene::{Annotation, AnnotationId, PlayerToken, Scene, SceneStore, Side, TokenId};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    TokenAdded(PlayerToken),
    TokenMoved { id: TokenId, x: f64, y: f64 },
    AnnotationStarted(AnnotationId),
    AnnotationFinished(Annotation),
    SceneReset,
    SceneLoaded,
    SetCursor(&'static str),
    RenderNeeded,
}

/// Core engine state — all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: SceneStore,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            scene: SceneStore::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio, refitting the board.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.camera = Camera::fit(width_css, height_css);
    }

    // --- Toolbar ---

    /// Set the active tool. Does not touch a gesture already in progress.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        vec![Action::SetCursor(tool.cursor())]
    }

    /// Choose which side "add token" creates players for.
    pub fn set_side(&mut self, side: Side) {
        self.ui.side_to_add = side;
    }

    /// Add a token for the selected side at the spawn point.
    pub fn add_token(&mut self) -> Vec<Action> {
        let token = self.scene.add_token(self.ui.side_to_add);
        vec![Action::TokenAdded(token), Action::RenderNeeded]
    }

    /// Clear the board back to the two seed tokens.
    pub fn reset(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.scene.reset();
        vec![Action::SceneReset, Action::RenderNeeded]
    }

    /// Replace the scene wholesale, abandoning any gesture in progress.
    pub fn load_scene(&mut self, scene: Scene) -> Vec<Action> {
        self.input = InputState::Idle;
        self.scene.load(scene);
        vec![Action::SceneLoaded, Action::RenderNeeded]
    }

    // --- Input events ---

    /// Start a gesture. Ignored while another gesture is active or for
    /// non-primary buttons.
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, pointer: PointerId) -> Vec<Action> {
        if button != Button::Primary || !self.input.is_idle() {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);

        match self.ui.tool.annotation_kind() {
            None => {
                let Some(id) = hit::hit_token(world, self.scene.scene()) else {
                    return Vec::new();
                };
                let Some(token) = self.scene.token(&id) else {
                    return Vec::new();
                };
                let grab_offset = Point::new(token.x - world.x, token.y - world.y);
                self.input = InputState::DraggingToken { id, pointer, grab_offset };
                vec![Action::SetCursor("grabbing")]
            }
            Some(kind) => {
                let id = self.scene.begin_annotation(kind, world, ANNOTATION_COLOR);
                self.input = InputState::Drawing { id: id.clone(), kind, pointer };
                vec![Action::AnnotationStarted(id), Action::RenderNeeded]
            }
        }
    }

    /// Apply one move of the active gesture, in arrival order.
    pub fn on_pointer_move(&mut self, screen_pt: Point, pointer: PointerId) -> Vec<Action> {
        if self.input.pointer() != Some(pointer) {
            return Vec::new();
        }
        let world = self.camera.screen_to_world(screen_pt);

        match &self.input {
            InputState::Idle => Vec::new(),
            InputState::DraggingToken { id, grab_offset, .. } => {
                let target = clamp_to_board(Point::new(world.x + grab_offset.x, world.y + grab_offset.y));
                if self.scene.move_token(id, target) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::Drawing { .. } => {
                if self.scene.extend_annotation(world) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Finish the active gesture. A drag settles at the release point and
    /// reports the token's final position; a stroke closes without adding
    /// the release point.
    pub fn on_pointer_up(&mut self, screen_pt: Point, pointer: PointerId) -> Vec<Action> {
        if self.input.pointer() != Some(pointer) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if matches!(self.input, InputState::DraggingToken { .. }) {
            actions.extend(self.on_pointer_move(screen_pt, pointer));
        }
        actions.extend(self.finish_gesture());
        actions
    }

    /// The pointer was lost (touch cancelled, capture released). Closes the
    /// gesture where it stands; nothing is rolled back.
    pub fn on_pointer_cancel(&mut self, pointer: PointerId) -> Vec<Action> {
        if self.input.pointer() != Some(pointer) {
            return Vec::new();
        }
        self.finish_gesture()
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle => Vec::new(),
            InputState::DraggingToken { id, .. } => {
                let mut actions = Vec::new();
                if let Some(token) = self.scene.token(&id) {
                    actions.push(Action::TokenMoved { id: token.id.clone(), x: token.x, y: token.y });
                }
                actions.push(Action::SetCursor(self.ui.tool.cursor()));
                actions
            }
            InputState::Drawing { .. } => {
                let mut actions = Vec::new();
                if let Some(annotation) = self.scene.end_annotation() {
                    actions.push(Action::AnnotationFinished(annotation));
                }
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.scene.scene()
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.ui.tool
    }

    #[must_use]
    pub fn side_to_add(&self) -> Side {
        self.ui.side_to_add
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Whether a drag or draw is in progress.
    #[must_use]
    pub fn gesture_active(&self) -> bool {
        !self.input.is_idle()
    }
}

/// The full board engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    // --- Delegated toolbar ---

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_side(&mut self, side: Side) {
        self.core.set_side(side);
    }

    pub fn add_token(&mut self) -> Vec<Action> {
        self.core.add_token()
    }

    pub fn reset(&mut self) -> Vec<Action> {
        self.core.reset()
    }

    pub fn load_scene(&mut self, scene: Scene) -> Vec<Action> {
        self.core.load_scene(scene)
    }

    // --- Viewport ---

    /// Resize the backing store to the CSS size times `dpr` and refit the board.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * self.core.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * self.core.dpr).round().max(0.0) as u32);
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, pointer: PointerId) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, pointer)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, pointer: PointerId) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, pointer)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, pointer: PointerId) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, pointer)
    }

    pub fn on_pointer_cancel(&mut self, pointer: PointerId) -> Vec<Action> {
        self.core.on_pointer_cancel(pointer)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        render::draw(
            &ctx,
            self.core.scene(),
            &self.core.camera,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    /// Encode the rendered board as a PNG data URL for download.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot be encoded (e.g. it is tainted).
    pub fn export_png(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url_with_type("image/png")
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        self.core.scene()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }
}
