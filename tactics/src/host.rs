//! Browser host: the JavaScript-facing board.
//!
//! The page creates one [`BoardHost`] per canvas and forwards DOM events to
//! it. Pointer events are translated here into engine input; the toolbar,
//! save, and load buttons call the matching methods. Remote work (sign-in
//! lookup, saves) runs on the browser event loop via `spawn_local`, and the
//! page is told to refresh its chrome through the optional `on_change`
//! callback once it settles.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use tracing::{debug, warn};
use uuid::Uuid;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, PointerEvent};

use crate::camera::Point;
use crate::consts::SNAPSHOT_NAME_SUGGESTION;
use crate::engine::{Action, Engine};
use crate::input::{Button, Tool};
use crate::persist::{Notice, Persistence};
use crate::rest::RestClient;
use crate::scene::Side;

const NAME_PROMPT: &str = "Name this board";

type BoardPersistence = Persistence<RestClient, RestClient>;

/// `PointerEvent.button` to engine button. Unknown buttons act as primary.
#[must_use]
pub fn map_button(button: i16) -> Button {
    match button {
        1 => Button::Middle,
        2 => Button::Secondary,
        _ => Button::Primary,
    }
}

/// Toolbar tool name (`"move"`, `"freehand"`, `"arrow"`).
#[must_use]
pub fn parse_tool(name: &str) -> Option<Tool> {
    match name {
        "move" => Some(Tool::Move),
        "freehand" => Some(Tool::Freehand),
        "arrow" => Some(Tool::Arrow),
        _ => None,
    }
}

/// Side name as stored in scenes (`"home"`, `"away"`).
#[must_use]
pub fn parse_side(name: &str) -> Option<Side> {
    match name {
        "home" => Some(Side::Home),
        "away" => Some(Side::Away),
        _ => None,
    }
}

/// Text shown to the user for a notice.
#[must_use]
pub fn notice_text(notice: &Notice) -> String {
    match notice {
        Notice::Saved { name } => format!("Saved \"{name}\""),
        Notice::Failed { message } => message.clone(),
    }
}

fn pointer_point(ev: &PointerEvent) -> Point {
    Point::new(f64::from(ev.offset_x()), f64::from(ev.offset_y()))
}

fn prompt_for_name() -> Option<String> {
    let window = web_sys::window()?;
    match window.prompt_with_message_and_default(NAME_PROMPT, SNAPSHOT_NAME_SUGGESTION) {
        Ok(input) => input,
        Err(e) => {
            warn!(error = ?e, "name prompt failed");
            None
        }
    }
}

fn notify(on_change: Option<&Function>) {
    let Some(callback) = on_change else {
        return;
    };
    if let Err(e) = callback.call0(&JsValue::NULL) {
        warn!(error = ?e, "on_change callback threw");
    }
}

fn process_actions(actions: Vec<Action>, engine: &Engine) {
    let mut render = false;
    for action in actions {
        match action {
            Action::SetCursor(cursor) => {
                if let Err(e) = engine.canvas().style().set_property("cursor", cursor) {
                    debug!(error = ?e, cursor, "cursor not applied");
                }
            }
            Action::RenderNeeded => render = true,
            other => debug!(action = ?other, "board changed"),
        }
    }
    if render {
        if let Err(e) = engine.render() {
            warn!(error = ?e, "render failed");
        }
    }
}

/// One tactics board bound to a canvas element.
#[wasm_bindgen]
pub struct BoardHost {
    engine: Rc<RefCell<Engine>>,
    persistence: Rc<BoardPersistence>,
    on_change: Option<Function>,
}

#[wasm_bindgen]
impl BoardHost {
    /// `base_url` is the snapshot server origin (`""` for same origin);
    /// `token` is the session token, if the page has one.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, base_url: &str, token: Option<String>, on_change: Option<Function>) -> Self {
        console_error_panic_hook::set_once();
        let client = RestClient::new(base_url, token);
        Self {
            engine: Rc::new(RefCell::new(Engine::new(canvas))),
            persistence: Rc::new(Persistence::new(client.clone(), client)),
            on_change,
        }
    }

    /// Resolve the signed-in user and fetch their snapshots in the background.
    pub fn init(&self) {
        let persistence = Rc::clone(&self.persistence);
        let on_change = self.on_change.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = persistence.init().await {
                warn!(error = %e, "board started without saved snapshots");
            }
            notify(on_change.as_ref());
        });
    }

    // --- Viewport ---

    /// Fit the board to the canvas' CSS size and redraw.
    pub fn resize(&self, width_css: f64, height_css: f64, dpr: f64) {
        let mut engine = self.engine.borrow_mut();
        engine.set_viewport(width_css, height_css, dpr);
        process_actions(vec![Action::RenderNeeded], &engine);
    }

    // --- Pointer events ---

    pub fn pointer_down(&self, ev: &PointerEvent) {
        ev.prevent_default();
        let mut engine = self.engine.borrow_mut();
        if let Err(e) = engine.canvas().set_pointer_capture(ev.pointer_id()) {
            debug!(error = ?e, "pointer capture refused");
        }
        let actions = engine.on_pointer_down(pointer_point(ev), map_button(ev.button()), ev.pointer_id());
        process_actions(actions, &engine);
    }

    pub fn pointer_move(&self, ev: &PointerEvent) {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.on_pointer_move(pointer_point(ev), ev.pointer_id());
        process_actions(actions, &engine);
    }

    pub fn pointer_up(&self, ev: &PointerEvent) {
        let mut engine = self.engine.borrow_mut();
        if let Err(e) = engine.canvas().release_pointer_capture(ev.pointer_id()) {
            debug!(error = ?e, "pointer release refused");
        }
        let actions = engine.on_pointer_up(pointer_point(ev), ev.pointer_id());
        process_actions(actions, &engine);
    }

    /// Also wired to `pointerleave` and `lostpointercapture`.
    pub fn pointer_cancel(&self, ev: &PointerEvent) {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.on_pointer_cancel(ev.pointer_id());
        process_actions(actions, &engine);
    }

    // --- Toolbar ---

    /// # Errors
    ///
    /// Rejects tool names other than `move`, `freehand`, and `arrow`.
    pub fn set_tool(&self, name: &str) -> Result<(), JsValue> {
        let tool = parse_tool(name).ok_or_else(|| JsValue::from_str(&format!("unknown tool: {name}")))?;
        let mut engine = self.engine.borrow_mut();
        let actions = engine.set_tool(tool);
        process_actions(actions, &engine);
        Ok(())
    }

    /// # Errors
    ///
    /// Rejects side names other than `home` and `away`.
    pub fn set_side(&self, name: &str) -> Result<(), JsValue> {
        let side = parse_side(name).ok_or_else(|| JsValue::from_str(&format!("unknown side: {name}")))?;
        self.engine.borrow_mut().set_side(side);
        Ok(())
    }

    pub fn add_token(&self) {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.add_token();
        process_actions(actions, &engine);
    }

    /// Clear the board back to its seed without touching the saved binding.
    pub fn reset(&self) {
        let mut engine = self.engine.borrow_mut();
        let actions = engine.reset();
        process_actions(actions, &engine);
    }

    /// # Errors
    ///
    /// Returns `Err` if the canvas cannot be encoded.
    pub fn export_png(&self) -> Result<String, JsValue> {
        self.engine.borrow().export_png()
    }

    // --- Snapshots ---

    /// Save the board. An unsaved board of a signed-in user asks for a name
    /// first; dismissing the prompt cancels the save.
    pub fn save(&self) {
        let name_input = if self.persistence.owner_id().is_some() && self.persistence.needs_name() {
            prompt_for_name()
        } else {
            None
        };
        let scene = self.engine.borrow().scene().clone();
        let persistence = Rc::clone(&self.persistence);
        let on_change = self.on_change.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match persistence.save(&scene, name_input.as_deref()).await {
                Ok(outcome) => debug!(?outcome, "save finished"),
                Err(e) => warn!(error = %e, "save failed"),
            }
            notify(on_change.as_ref());
        });
    }

    /// Load a snapshot by id, or start a new unsaved board with `None`.
    ///
    /// # Errors
    ///
    /// Rejects ids that are not UUIDs.
    pub fn load(&self, id: Option<String>) -> Result<(), JsValue> {
        let id = id
            .map(|raw| Uuid::parse_str(&raw))
            .transpose()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut engine = self.engine.borrow_mut();
        let actions = self.persistence.load(id, &mut engine.core);
        process_actions(actions, &engine);
        Ok(())
    }

    /// Cached snapshot list as JSON, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list cannot be serialized.
    pub fn snapshots_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.persistence.snapshots()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Name of the snapshot the board is bound to, for the title bar.
    #[must_use]
    pub fn current_name(&self) -> Option<String> {
        self.persistence.current_name()
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.persistence.owner_id().is_some()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.persistence.is_saving()
    }

    /// Latest save/load message, cleared once read.
    #[must_use]
    pub fn take_notice(&self) -> Option<String> {
        self.persistence.take_notice().as_ref().map(notice_text)
    }
}
