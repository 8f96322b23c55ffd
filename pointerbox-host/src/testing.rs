//! An in-memory page for exercising capture logic off the browser.

use std::collections::{HashMap, HashSet};
use crate::*;


#[derive(Debug, Clone, Default)]
pub struct FakeObject {
	properties: HashSet<String>,
}

impl FakeObject {
	pub fn new() -> FakeObject {
		FakeObject::default()
	}

	pub fn with_property(mut self, name: &str) -> FakeObject {
		self.properties.insert(name.into());
		self
	}

	pub fn with_properties<'a>(mut self, names: impl IntoIterator<Item=&'a str>) -> FakeObject {
		self.properties.extend(names.into_iter().map(String::from));
		self
	}
}

impl HostObject for FakeObject {
	fn has_property(&self, name: &str) -> bool {
		self.properties.contains(name)
	}
}


/// Elements compare by id only, like DOM node identity.
#[derive(Debug, Clone)]
pub struct FakeElement {
	pub id: u32,
	pub object: FakeObject,
}

impl FakeElement {
	pub fn new(id: u32) -> FakeElement {
		FakeElement { id, object: FakeObject::new() }
	}

	pub fn with_property(mut self, name: &str) -> FakeElement {
		self.object = self.object.with_property(name);
		self
	}
}

impl PartialEq for FakeElement {
	fn eq(&self, other: &FakeElement) -> bool {
		self.id == other.id
	}
}

impl HostObject for FakeElement {
	fn has_property(&self, name: &str) -> bool {
		self.object.has_property(name)
	}
}


#[derive(Debug, Clone, Default)]
pub struct FakeMoveEvent {
	fields: HashMap<String, f64>,
}

impl FakeMoveEvent {
	pub fn new() -> FakeMoveEvent {
		FakeMoveEvent::default()
	}

	pub fn with(mut self, name: &str, value: f64) -> FakeMoveEvent {
		self.fields.insert(name.into(), value);
		self
	}
}

impl MovementFields for FakeMoveEvent {
	fn number_field(&self, name: &str) -> Option<f64> {
		self.fields.get(name).copied()
	}
}


/// How the fake responds when a method is invoked.
#[derive(Debug, Clone)]
pub enum FakeResponse {
	Return,
	Throw(String),
	Resolve,
	Reject(String),
}


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FakeListenerTarget {
	Document,
	Element(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FakeListener {
	pub target: FakeListenerTarget,
	pub event: String,
	pub listener: Listener,
}


#[derive(Default)]
pub struct FakeEnvironment {
	pub document: FakeObject,

	/// Elements currently reported by document properties such as `fullscreenElement`.
	pub reported: HashMap<String, FakeElement>,

	/// Every (element id, method) pair invoked, in order.
	pub invocations: Vec<(u32, String)>,

	/// Responses for specific methods. Unlisted methods return synchronously.
	pub responses: HashMap<String, FakeResponse>,

	/// Outcomes handed to `watch` that haven't been driven yet.
	pub watched: Vec<(RequestKind, LocalBoxFuture<'static, Result<(), HostError>>)>,

	pub listeners: Vec<FakeListener>,
}

impl FakeEnvironment {
	/// A document exposing only the unprefixed change event handlers.
	pub fn standard() -> FakeEnvironment {
		FakeEnvironment {
			document: FakeObject::new()
				.with_properties(["onfullscreenchange", "onpointerlockchange", "fullscreenElement", "pointerLockElement"]),
			..FakeEnvironment::default()
		}
	}

	pub fn respond(&mut self, method: &str, response: FakeResponse) {
		self.responses.insert(method.into(), response);
	}

	pub fn report(&mut self, property: &str, element: Option<&FakeElement>) {
		match element {
			Some(element) => { self.reported.insert(property.into(), element.clone()); }
			None => { self.reported.remove(property); }
		}
	}

	pub fn invocation_count(&self, method: &str) -> usize {
		self.invocations.iter()
			.filter(|(_, invoked)| invoked == method)
			.count()
	}

	pub fn listener_count(&self, listener: Listener) -> usize {
		self.listeners.iter()
			.filter(|registered| registered.listener == listener)
			.count()
	}

	/// Whether a dispatch for `listener` would reach anyone.
	pub fn is_listening(&self, listener: Listener) -> bool {
		self.listener_count(listener) > 0
	}

	/// Run every watched outcome to completion, returning the rejections the host would dispatch.
	pub fn settle_watched<M>(&mut self) -> Vec<HostEvent<M>> {
		std::mem::take(&mut self.watched).into_iter()
			.filter_map(|(request, outcome)| {
				futures::executor::block_on(outcome).err()
					.map(|reason| HostEvent::Rejected { request, reason })
			})
			.collect()
	}

	fn fake_target(target: ListenerTarget<'_, FakeElement>) -> FakeListenerTarget {
		match target {
			ListenerTarget::Document => FakeListenerTarget::Document,
			ListenerTarget::Element(element) => FakeListenerTarget::Element(element.id),
		}
	}
}

impl Environment for FakeEnvironment {
	type Document = FakeObject;
	type Element = FakeElement;
	type MoveEvent = FakeMoveEvent;

	fn document(&self) -> &FakeObject {
		&self.document
	}

	fn document_element(&self, property: &str) -> Option<FakeElement> {
		self.reported.get(property).cloned()
	}

	fn invoke(&mut self, element: &FakeElement, method: &str) -> Result<Invocation, HostError> {
		if !element.has_property(method) {
			return Err(HostError::MissingProperty(method.into()))
		}

		self.invocations.push((element.id, method.into()));

		match self.responses.get(method).cloned().unwrap_or(FakeResponse::Return) {
			FakeResponse::Return => Ok(Invocation::Returned),
			FakeResponse::Throw(reason) => Err(HostError::Threw(reason)),
			FakeResponse::Resolve => Ok(Invocation::Deferred(Box::pin(async { Ok::<(), HostError>(()) }))),
			FakeResponse::Reject(reason) => Ok(Invocation::Deferred(Box::pin(async move { Err::<(), HostError>(HostError::Threw(reason)) }))),
		}
	}

	fn watch(&mut self, request: RequestKind, outcome: LocalBoxFuture<'static, Result<(), HostError>>) {
		self.watched.push((request, outcome));
	}

	fn add_listener(&mut self, target: ListenerTarget<'_, FakeElement>, event: &str, listener: Listener) -> Result<(), HostError> {
		let registered = FakeListener {
			target: Self::fake_target(target),
			event: event.into(),
			listener,
		};

		// Same as addEventListener: registering an identical listener twice is a no-op.
		if !self.listeners.contains(&registered) {
			self.listeners.push(registered);
		}

		Ok(())
	}

	fn remove_listener(&mut self, target: ListenerTarget<'_, FakeElement>, event: &str, listener: Listener) {
		let target = Self::fake_target(target);
		self.listeners.retain(|registered| {
			!(registered.target == target && registered.event == event && registered.listener == listener)
		});
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn invoking_missing_method_fails_without_recording() {
		let mut env = FakeEnvironment::standard();
		let element = FakeElement::new(1);

		let result = env.invoke(&element, "requestFullscreen");
		assert_eq!(result.err(), Some(HostError::MissingProperty("requestFullscreen".into())));
		assert!(env.invocations.is_empty());
	}

	#[test]
	fn rejected_outcomes_become_host_events() {
		let mut env = FakeEnvironment::standard();
		let element = FakeElement::new(1).with_property("requestFullscreen");
		env.respond("requestFullscreen", FakeResponse::Reject("gesture required".into()));

		let Ok(Invocation::Deferred(outcome)) = env.invoke(&element, "requestFullscreen") else {
			panic!("expected deferred invocation")
		};

		env.watch(RequestKind::Fullscreen, outcome);

		let events = env.settle_watched::<FakeMoveEvent>();
		assert_eq!(events.len(), 1);
		assert!(matches!(&events[0], HostEvent::Rejected { request: RequestKind::Fullscreen, .. }));
		assert!(env.watched.is_empty());
	}

	#[test]
	fn duplicate_listeners_collapse() {
		let mut env = FakeEnvironment::standard();
		let element = FakeElement::new(7);

		env.add_listener(ListenerTarget::Element(&element), "mousemove", Listener::Movement).unwrap();
		env.add_listener(ListenerTarget::Element(&element), "mousemove", Listener::Movement).unwrap();
		assert_eq!(env.listener_count(Listener::Movement), 1);

		env.remove_listener(ListenerTarget::Element(&element), "mousemove", Listener::Movement);
		assert!(!env.is_listening(Listener::Movement));
	}
}
