use pointerbox_host::HostError;


#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CaptureError {
	/// None of a capability's candidate names exist here. Dependent operations become no-ops.
	#[error("Capability '{capability}' is unavailable in this environment")]
	CapabilityUnavailable {
		capability: &'static str,
	},

	/// The browser refused a request, either by throwing or by rejecting its deferred outcome.
	#[error("'{capability}' request was rejected: {reason}")]
	RequestRejected {
		capability: &'static str,
		reason: String,
	},

	#[error("Capture is already armed")]
	AlreadyArmed,

	#[error(transparent)]
	Host(#[from] HostError),
}

impl CaptureError {
	/// Failures the capture layer is expected to shrug off.
	pub fn is_benign(&self) -> bool {
		matches!(self, CaptureError::CapabilityUnavailable {..} | CaptureError::RequestRejected {..})
	}
}
