pub use pointerbox_host as host;
pub use pointerbox_input as input;
pub use pointerbox_bus as bus;
pub use pointerbox_cfg as cfg;

pub use host::prelude::*;
pub use input::prelude::*;
pub use bus::prelude::*;
pub use cfg::prelude::*;

pub use crate::{Coordinator, CaptureState};


pub use anyhow;

pub use tracing;
#[doc(hidden)]
pub use tracing::instrument;
