//! Infinite planning-board engine for the pattern planner.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! board's interaction model: translating raw DOM input into element
//! mutations, keeping the camera for pan/zoom, hit-testing elements, inline
//! text editing, and drawing the scene. The host page wires DOM events to the
//! engine and carries out the returned [`engine::Action`]s. Writes go out as
//! [`engine::Action::Persist`] and come back through
//! [`engine::EngineCore::resolve_persist`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Element types, patches, and the in-memory store |
//! | [`camera`] | Pan/zoom camera, coordinate conversions, fit-to-view |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit-testing against elements and resize handles |
//! | [`resize`] | Handle-driven resize math |
//! | [`text_edit`] | Inline text editor state and auto-height |
//! | [`payload`] | Decoding drag-and-drop payloads from the tray |
//! | [`sync`] | Optimistic write ledger and per-element sync status |
//! | [`persist`] | Persistence collaborator trait and the dispatch loop |
//! | [`capture`] | Window-level pointer capture with a disposer |
//! | [`render`] | Display list and Canvas2D drawing |
//! | [`config`] | Host-supplied engine configuration |
//! | [`error`] | Error types and grepable error codes |
//! | [`consts`] | Shared numeric constants (zoom limits, minimum sizes, etc.) |

pub mod camera;
pub mod capture;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod payload;
pub mod persist;
pub mod render;
pub mod resize;
pub mod sync;
pub mod text_edit;
