//! Fullscreen and pointer lock capture for applications that only see the page through message ports.
//!
//! [`Coordinator`] holds the capture state machine and works against any
//! [`Environment`](pointerbox_host::Environment). On wasm32, [`web::attach`] binds one to the
//! current page body and an Elm style application's ports.

pub mod prelude;

pub mod coordinator;
pub mod state;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use coordinator::Coordinator;
pub use state::CaptureState;
