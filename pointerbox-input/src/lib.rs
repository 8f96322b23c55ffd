//! Normalises the vendor prefixed fullscreen, pointer lock and mouse movement APIs.

pub mod capability;
pub mod delta;
pub mod error;
pub mod fullscreen;
pub mod pointer_lock;

mod request;

pub mod prelude {
	pub use crate::{CaptureError, FullscreenController, PointerLockController, MovementSample, extract_delta};
}

pub use capability::{CapabilityRequest, ResolvedCapability};
pub use delta::{MovementSample, extract_delta};
pub use error::CaptureError;
pub use fullscreen::FullscreenController;
pub use pointer_lock::PointerLockController;
