use pointerbox_host::{Environment, HostObject, RequestKind};
use crate::capability::{self, ResolvedCapability};
use crate::{CaptureError, request};


/// Requests fullscreen for a target element and answers whether it currently holds it.
/// The request method is resolved once against the target and reused from then on.
#[derive(Debug, Clone)]
pub struct FullscreenController {
	request: ResolvedCapability,
}

impl FullscreenController {
	pub fn new(target: &impl HostObject) -> FullscreenController {
		let request = capability::REQUEST_FULLSCREEN.resolve(target);
		log::debug!("Fullscreen request resolved to {request:?}");

		FullscreenController { request }
	}

	pub fn is_available(&self) -> bool {
		self.request.is_available()
	}

	/// Ask the browser to make `target` fullscreen. Confirmation arrives later as a change event,
	/// and a deferred rejection arrives as a rejection event.
	pub fn request<E: Environment>(&self, env: &mut E, target: &E::Element) -> Result<(), CaptureError> {
		request::issue(env, target, &capability::REQUEST_FULLSCREEN, self.request, RequestKind::Fullscreen)
	}

	pub fn is_fullscreen_element<E: Environment>(env: &E, element: &E::Element) -> bool {
		request::is_reported_element(env, &capability::FULLSCREEN_ELEMENT, element)
	}
}


#[cfg(test)]
mod test {
	use super::*;
	use pointerbox_host::testing::*;

	#[test]
	fn requests_through_resolved_prefix() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(1).with_property("webkitRequestFullscreen");

		let controller = FullscreenController::new(&body);
		assert!(controller.is_available());

		controller.request(&mut env, &body).unwrap();
		assert_eq!(env.invocations, vec![(1, "webkitRequestFullscreen".to_string())]);
	}

	#[test]
	fn unavailable_request_is_a_noop() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(1);

		let controller = FullscreenController::new(&body);
		assert!(!controller.is_available());

		let result = controller.request(&mut env, &body);
		assert_eq!(result, Err(CaptureError::CapabilityUnavailable { capability: "requestFullscreen" }));
		assert!(result.unwrap_err().is_benign());
		assert!(env.invocations.is_empty());
	}

	#[test]
	fn thrown_request_is_rejected() {
		let mut env = FakeEnvironment::standard();
		env.respond("requestFullscreen", FakeResponse::Throw("not allowed".into()));
		let body = FakeElement::new(1).with_property("requestFullscreen");

		let result = FullscreenController::new(&body).request(&mut env, &body);
		assert_eq!(result, Err(CaptureError::RequestRejected {
			capability: "requestFullscreen",
			reason: "not allowed".into(),
		}));
	}

	#[test]
	fn deferred_outcome_is_watched() {
		let mut env = FakeEnvironment::standard();
		env.respond("requestFullscreen", FakeResponse::Resolve);
		let body = FakeElement::new(1).with_property("requestFullscreen");

		FullscreenController::new(&body).request(&mut env, &body).unwrap();
		assert_eq!(env.watched.len(), 1);
		assert_eq!(env.watched[0].0, RequestKind::Fullscreen);
		assert!(env.settle_watched::<FakeMoveEvent>().is_empty());
	}

	#[test]
	fn fullscreen_element_checks_every_prefix() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(1);
		let other = FakeElement::new(2);

		assert!(!FullscreenController::is_fullscreen_element(&env, &body));

		for property in capability::FULLSCREEN_ELEMENT.candidate_names {
			env.report(property, Some(&body));
			assert!(FullscreenController::is_fullscreen_element(&env, &body));
			assert!(!FullscreenController::is_fullscreen_element(&env, &other));
			env.report(property, None);
		}

		// Another element being fullscreen doesn't count.
		env.report("msFullscreenElement", Some(&other));
		assert!(!FullscreenController::is_fullscreen_element(&env, &body));
	}
}
