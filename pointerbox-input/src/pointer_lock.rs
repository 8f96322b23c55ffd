use pointerbox_host::{Environment, HostObject, RequestKind};
use crate::capability::{self, ResolvedCapability};
use crate::{CaptureError, request};


/// Requests pointer lock for a target element and answers whether it currently holds it.
///
/// Nothing is awaited after a request. The browser grants or denies the lock later, and a denial
/// is usually only visible as the absence of a `pointerlockchange`. Newer browsers return a
/// promise, which is watched purely so a rejection can be logged.
#[derive(Debug, Clone)]
pub struct PointerLockController {
	request: ResolvedCapability,
}

impl PointerLockController {
	pub fn new(target: &impl HostObject) -> PointerLockController {
		let request = capability::REQUEST_POINTER_LOCK.resolve(target);
		log::debug!("Pointer lock request resolved to {request:?}");

		PointerLockController { request }
	}

	pub fn is_available(&self) -> bool {
		self.request.is_available()
	}

	pub fn request<E: Environment>(&self, env: &mut E, target: &E::Element) -> Result<(), CaptureError> {
		request::issue(env, target, &capability::REQUEST_POINTER_LOCK, self.request, RequestKind::PointerLock)
	}

	pub fn is_locked_element<E: Environment>(env: &E, element: &E::Element) -> bool {
		request::is_reported_element(env, &capability::POINTER_LOCK_ELEMENT, element)
	}
}


#[cfg(test)]
mod test {
	use super::*;
	use pointerbox_host::testing::*;

	#[test]
	fn requests_through_resolved_prefix() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(3)
			.with_property("mozRequestPointerLock")
			.with_property("webkitRequestPointerLock");

		PointerLockController::new(&body).request(&mut env, &body).unwrap();
		assert_eq!(env.invocations, vec![(3, "mozRequestPointerLock".to_string())]);
	}

	#[test]
	fn resolution_is_cached_at_construction() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(3);
		let controller = PointerLockController::new(&body);

		// Gaining the method afterwards doesn't change the cached resolution.
		let body = body.with_property("requestPointerLock");
		assert!(controller.request(&mut env, &body).is_err());
		assert!(env.invocations.is_empty());
	}

	#[test]
	fn locked_element_checks_every_prefix() {
		let mut env = FakeEnvironment::standard();
		let body = FakeElement::new(3);

		for property in capability::POINTER_LOCK_ELEMENT.candidate_names {
			env.report(property, Some(&body));
			assert!(PointerLockController::is_locked_element(&env, &body));
			env.report(property, None);
			assert!(!PointerLockController::is_locked_element(&env, &body));
		}
	}

	#[test]
	fn rejected_promise_surfaces_as_event() {
		let mut env = FakeEnvironment::standard();
		env.respond("requestPointerLock", FakeResponse::Reject("no gesture".into()));
		let body = FakeElement::new(3).with_property("requestPointerLock");

		PointerLockController::new(&body).request(&mut env, &body).unwrap();

		let events = env.settle_watched::<FakeMoveEvent>();
		assert!(matches!(&events[..], [pointerbox_host::HostEvent::Rejected { request: RequestKind::PointerLock, .. }]));
	}
}
