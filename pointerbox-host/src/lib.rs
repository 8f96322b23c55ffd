//! The narrow slice of the browser that pointer capture needs: probing objects for vendor
//! prefixed properties, invoking request methods, reading the reported fullscreen/lock elements
//! and attaching listeners. Everything above this crate talks to an [`Environment`], so the
//! capture state machine can run against the real page ([`web`], wasm32 only) or against
//! [`testing::FakeEnvironment`].

pub use futures::future::LocalBoxFuture;

pub mod logging;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub mod prelude {
	pub use crate::{
		Environment, HostObject, MovementFields,
		HostEvent, HostError, Invocation,
		Listener, ListenerTarget, RequestKind,
	};
}


/// Anything whose properties can be probed by name - documents, elements and events.
pub trait HostObject {
	/// Whether `name` exists as an own or inherited property. The value is not inspected.
	fn has_property(&self, name: &str) -> bool;
}

/// Numeric fields of a pointer movement event.
pub trait MovementFields {
	/// The raw value of field `name`, or None if it is absent or not a number.
	fn number_field(&self, name: &str) -> Option<f64>;
}


/// The logical listeners a capture coordinator attaches.
/// Hosts map each of these to a concrete callback that produces the matching [`HostEvent`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Listener {
	FullscreenChange,
	PointerLockChange,
	Movement,
}

/// Requests whose outcome may be reported asynchronously.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RequestKind {
	Fullscreen,
	PointerLock,
}

#[derive(Debug)]
pub enum ListenerTarget<'a, E> {
	Document,
	Element(&'a E),
}

impl<E> Clone for ListenerTarget<'_, E> {
	fn clone(&self) -> Self { *self }
}

impl<E> Copy for ListenerTarget<'_, E> {}


/// Everything the host dispatches back into the capture layer.
#[derive(Debug)]
pub enum HostEvent<M> {
	FullscreenChange,
	PointerLockChange,
	MouseMove(M),

	/// A deferred request handed to [`Environment::watch`] settled with an error.
	Rejected {
		request: RequestKind,
		reason: HostError,
	},
}


/// What invoking a request method gave back.
pub enum Invocation {
	/// The call returned without a deferred outcome. Success is only visible through later change events.
	Returned,

	/// The call returned a promise-like outcome that settles later.
	Deferred(LocalBoxFuture<'static, Result<(), HostError>>),
}

impl std::fmt::Debug for Invocation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Invocation::Returned => f.write_str("Returned"),
			Invocation::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}


#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
	#[error("Host threw: {0}")]
	Threw(String),

	#[error("Property '{0}' is not present")]
	MissingProperty(String),

	#[error("Property '{0}' is not callable")]
	NotCallable(String),

	#[error("Failed to manage listener: {0}")]
	Listener(String),
}


/// The host page as seen by the capture layer. All calls happen on the single UI thread.
pub trait Environment {
	type Document: HostObject;
	type Element: HostObject + Clone + PartialEq;
	type MoveEvent: MovementFields;

	fn document(&self) -> &Self::Document;

	/// The element the document reports under `property` (e.g. `fullscreenElement`), if any.
	fn document_element(&self, property: &str) -> Option<Self::Element>;

	/// Call the zero argument method `method` on `element`.
	fn invoke(&mut self, element: &Self::Element, method: &str) -> Result<Invocation, HostError>;

	/// Drive `outcome` to completion on the local executor.
	/// If it fails, the host dispatches [`HostEvent::Rejected`] for `request`.
	fn watch(&mut self, request: RequestKind, outcome: LocalBoxFuture<'static, Result<(), HostError>>);

	fn add_listener(&mut self, target: ListenerTarget<'_, Self::Element>, event: &str, listener: Listener) -> Result<(), HostError>;
	fn remove_listener(&mut self, target: ListenerTarget<'_, Self::Element>, event: &str, listener: Listener);
}
