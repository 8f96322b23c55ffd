use pointerbox_host::HostObject;


/// A browser capability that may be exposed under several vendor prefixed names.
/// Candidates are tried in order - unprefixed first, then `moz`, `ms`, `webkit`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CapabilityRequest {
	pub canonical_name: &'static str,
	pub candidate_names: &'static [&'static str],
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolvedCapability {
	Available(&'static str),
	Unavailable,
}

impl ResolvedCapability {
	pub fn name(&self) -> Option<&'static str> {
		match *self {
			ResolvedCapability::Available(name) => Some(name),
			ResolvedCapability::Unavailable => None,
		}
	}

	pub fn is_available(&self) -> bool {
		matches!(self, ResolvedCapability::Available(_))
	}
}

impl CapabilityRequest {
	/// The first candidate present on `host`.
	pub fn resolve(&self, host: &impl HostObject) -> ResolvedCapability {
		self.candidate_names.iter()
			.copied()
			.find(|name| host.has_property(name))
			.map_or(ResolvedCapability::Unavailable, ResolvedCapability::Available)
	}

	/// Every candidate present on `host`, in priority order.
	/// Browsers commonly expose both the unprefixed and a prefixed form of the same event.
	pub fn resolve_all(&self, host: &impl HostObject) -> Vec<&'static str> {
		self.candidate_names.iter()
			.copied()
			.filter(|name| host.has_property(name))
			.collect()
	}
}


/// Event name for an `on<event>` handler property.
pub fn event_name(handler_property: &'static str) -> &'static str {
	handler_property.strip_prefix("on")
		.unwrap_or(handler_property)
}


// Element methods
pub const REQUEST_FULLSCREEN: CapabilityRequest = CapabilityRequest {
	canonical_name: "requestFullscreen",
	candidate_names: &["requestFullscreen", "mozRequestFullscreen", "msRequestFullscreen", "webkitRequestFullscreen"],
};

pub const REQUEST_POINTER_LOCK: CapabilityRequest = CapabilityRequest {
	canonical_name: "requestPointerLock",
	candidate_names: &["requestPointerLock", "mozRequestPointerLock", "msRequestPointerLock", "webkitRequestPointerLock"],
};

// Document properties
pub const FULLSCREEN_ELEMENT: CapabilityRequest = CapabilityRequest {
	canonical_name: "fullscreenElement",
	candidate_names: &["fullscreenElement", "mozFullscreenElement", "msFullscreenElement", "webkitFullscreenElement"],
};

pub const POINTER_LOCK_ELEMENT: CapabilityRequest = CapabilityRequest {
	canonical_name: "pointerLockElement",
	candidate_names: &["pointerLockElement", "mozPointerLockElement", "msPointerLockElement", "webkitPointerLockElement"],
};

// Document events, probed through their handler properties
pub const FULLSCREEN_CHANGE: CapabilityRequest = CapabilityRequest {
	canonical_name: "fullscreenchange",
	candidate_names: &["onfullscreenchange", "onmozfullscreenchange", "onmsfullscreenchange", "onwebkitfullscreenchange"],
};

pub const POINTER_LOCK_CHANGE: CapabilityRequest = CapabilityRequest {
	canonical_name: "pointerlockchange",
	candidate_names: &["onpointerlockchange", "onmozpointerlockchange", "onmspointerlockchange", "onwebkitpointerlockchange"],
};

// Mouse event fields
pub const MOVEMENT_X: CapabilityRequest = CapabilityRequest {
	canonical_name: "movementX",
	candidate_names: &["movementX", "mozMovementX", "msMovementX", "webkitMovementX"],
};

pub const MOVEMENT_Y: CapabilityRequest = CapabilityRequest {
	canonical_name: "movementY",
	candidate_names: &["movementY", "mozMovementY", "msMovementY", "webkitMovementY"],
};

pub const MOUSE_MOVE_EVENT: &str = "mousemove";


#[cfg(test)]
mod test {
	use super::*;
	use pointerbox_host::testing::FakeObject;

	#[test]
	fn resolves_in_priority_order() {
		let host = FakeObject::new()
			.with_property("webkitRequestFullscreen")
			.with_property("mozRequestFullscreen");

		assert_eq!(REQUEST_FULLSCREEN.resolve(&host), ResolvedCapability::Available("mozRequestFullscreen"));

		let host = host.with_property("requestFullscreen");
		assert_eq!(REQUEST_FULLSCREEN.resolve(&host), ResolvedCapability::Available("requestFullscreen"));
	}

	#[test]
	fn every_single_candidate_resolves_to_itself() {
		for request in [REQUEST_FULLSCREEN, REQUEST_POINTER_LOCK, FULLSCREEN_CHANGE, POINTER_LOCK_CHANGE] {
			for &candidate in request.candidate_names {
				let host = FakeObject::new().with_property(candidate);
				assert_eq!(request.resolve(&host).name(), Some(candidate));
			}
		}
	}

	#[test]
	fn unavailable_when_nothing_matches() {
		let host = FakeObject::new().with_property("requestPointerLock");

		let resolved = REQUEST_FULLSCREEN.resolve(&host);
		assert_eq!(resolved, ResolvedCapability::Unavailable);
		assert!(!resolved.is_available());
		assert_eq!(resolved.name(), None);
	}

	#[test]
	fn resolution_is_stable() {
		let host = FakeObject::new().with_property("msRequestPointerLock");
		assert_eq!(REQUEST_POINTER_LOCK.resolve(&host), REQUEST_POINTER_LOCK.resolve(&host));
	}

	#[test]
	fn resolve_all_keeps_priority_order() {
		let host = FakeObject::new()
			.with_property("onwebkitfullscreenchange")
			.with_property("onfullscreenchange");

		assert_eq!(FULLSCREEN_CHANGE.resolve_all(&host), vec!["onfullscreenchange", "onwebkitfullscreenchange"]);
		assert!(POINTER_LOCK_CHANGE.resolve_all(&host).is_empty());
	}

	#[test]
	fn handler_properties_map_to_event_names() {
		assert_eq!(event_name("onfullscreenchange"), "fullscreenchange");
		assert_eq!(event_name("onmozpointerlockchange"), "mozpointerlockchange");
		assert_eq!(event_name("mousemove"), "mousemove");
	}
}
