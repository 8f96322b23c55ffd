
/// Where the managed target is in the capture sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum CaptureState {
	#[default]
	Idle,

	/// Fullscreen has been asked for but the browser hasn't confirmed it yet.
	FullscreenRequested,

	Fullscreen,
	PointerLocked,
}

impl CaptureState {
	pub fn name(&self) -> &'static str {
		match self {
			CaptureState::Idle => "idle",
			CaptureState::FullscreenRequested => "fullscreenRequested",
			CaptureState::Fullscreen => "fullscreen",
			CaptureState::PointerLocked => "pointerLocked",
		}
	}

	pub fn is_locked(&self) -> bool {
		matches!(self, CaptureState::PointerLocked)
	}
}

impl std::fmt::Display for CaptureState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
