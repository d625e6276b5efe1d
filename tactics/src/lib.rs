//! Tactics board engine: scene, interaction, rendering, and persistence.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of the board: translating raw pointer events into scene
//! mutations, fitting the board to the viewport, hit-testing tokens,
//! rendering the pitch and everything on it, and saving named snapshots for
//! the signed-in user. The page only forwards DOM events to a
//! [`host::BoardHost`], which drives the engine and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | `wasm-bindgen` exports wiring DOM events, prompts, and saves |
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Tokens, annotations, and the [`scene::SceneStore`] that edits them |
//! | [`camera`] | Board-to-viewport fit and coordinate conversions |
//! | [`input`] | Tools, buttons, and the gesture state machine |
//! | [`hit`] | Hit-testing against tokens |
//! | [`pitch`] | Pitch markings as data |
//! | [`render`] | Canvas 2D rendering |
//! | [`persist`] | Snapshot persistence adapter and in-memory store |
//! | [`rest`] | HTTP client for the snapshot server |
//! | [`consts`] | Board geometry, palette, and default names |

pub mod camera;
pub mod consts;
pub mod engine;
pub mod hit;
pub mod host;
pub mod input;
pub mod persist;
pub mod pitch;
pub mod render;
pub mod rest;
pub mod scene;
