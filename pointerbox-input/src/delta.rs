use pointerbox_host::MovementFields;
use crate::capability::{self, CapabilityRequest};


/// Relative pointer movement from a single event.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct MovementSample {
	pub dx: f64,
	pub dy: f64,
}

impl MovementSample {
	pub fn to_array(self) -> [f64; 2] {
		[self.dx, self.dy]
	}
}


/// Read movement from `event`, taking the first truthy value per axis across vendor names.
///
/// Absent, zero and NaN fields are all skipped, so a real zero and a missing field can't be
/// told apart. A later prefixed field can also win over an earlier field that reported zero.
pub fn extract_delta(event: &impl MovementFields) -> MovementSample {
	MovementSample {
		dx: first_truthy(event, &capability::MOVEMENT_X),
		dy: first_truthy(event, &capability::MOVEMENT_Y),
	}
}

fn first_truthy(event: &impl MovementFields, fields: &CapabilityRequest) -> f64 {
	fields.candidate_names.iter()
		.filter_map(|name| event.number_field(name))
		.find(|&value| value != 0.0 && !value.is_nan())
		.unwrap_or(0.0)
}
