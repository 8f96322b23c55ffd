//! [`Environment`] backed by the real page, via `web-sys`.
//! Vendor prefixed members aren't part of the web-sys bindings, so everything is looked up
//! by name through `Reflect`.

use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, Event, EventTarget, MouseEvent};

use crate::*;


/// Where the host delivers events. Usually forwards into a shared capture coordinator.
pub type EventSink = Rc<dyn Fn(HostEvent<MouseEvent>)>;

type Callback = Closure<dyn FnMut(Event)>;


impl HostObject for Document {
	fn has_property(&self, name: &str) -> bool {
		has_js_property(self.as_ref(), name)
	}
}

impl HostObject for Element {
	fn has_property(&self, name: &str) -> bool {
		has_js_property(self.as_ref(), name)
	}
}

impl MovementFields for MouseEvent {
	fn number_field(&self, name: &str) -> Option<f64> {
		Reflect::get(self.as_ref(), &JsValue::from_str(name)).ok()?
			.as_f64()
	}
}


/// The document and body of the current page.
pub fn page() -> Result<(Document, Element), HostError> {
	let document = web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| HostError::MissingProperty("document".into()))?;

	let body = document.body()
		.ok_or_else(|| HostError::MissingProperty("body".into()))?;

	Ok((document, body.into()))
}


pub struct WebEnvironment {
	document: Document,
	sink: EventSink,

	/// Live callbacks, keyed by listener kind and event name, along with what they're attached to.
	callbacks: HashMap<(Listener, String), (EventTarget, Callback)>,
}

impl WebEnvironment {
	pub fn new(document: Document, sink: EventSink) -> WebEnvironment {
		WebEnvironment {
			document,
			sink,
			callbacks: HashMap::new(),
		}
	}

	fn make_callback(&self, listener: Listener) -> Callback {
		let sink = self.sink.clone();

		Closure::new(move |event: Event| {
			let host_event = match listener {
				Listener::FullscreenChange => HostEvent::FullscreenChange,
				Listener::PointerLockChange => HostEvent::PointerLockChange,
				Listener::Movement => match event.dyn_into::<MouseEvent>() {
					Ok(event) => HostEvent::MouseMove(event),
					Err(_) => return,
				},
			};

			sink(host_event);
		})
	}
}

impl Environment for WebEnvironment {
	type Document = Document;
	type Element = Element;
	type MoveEvent = MouseEvent;

	fn document(&self) -> &Document {
		&self.document
	}

	fn document_element(&self, property: &str) -> Option<Element> {
		Reflect::get(self.document.as_ref(), &JsValue::from_str(property)).ok()?
			.dyn_into::<Element>().ok()
	}

	fn invoke(&mut self, element: &Element, method: &str) -> Result<Invocation, HostError> {
		let member = Reflect::get(element.as_ref(), &JsValue::from_str(method))
			.map_err(|error| HostError::Threw(describe(&error)))?;

		if member.is_undefined() {
			return Err(HostError::MissingProperty(method.into()))
		}

		let function = member.dyn_into::<Function>()
			.map_err(|_| HostError::NotCallable(method.into()))?;

		let returned = function.call0(element.as_ref())
			.map_err(|error| HostError::Threw(describe(&error)))?;

		match returned.dyn_into::<Promise>() {
			Ok(promise) => {
				let future = JsFuture::from(promise);
				Ok(Invocation::Deferred(Box::pin(async move {
					future.await
						.map(|_| ())
						.map_err(|error| HostError::Threw(describe(&error)))
				})))
			}

			Err(_) => Ok(Invocation::Returned),
		}
	}

	fn watch(&mut self, request: RequestKind, outcome: LocalBoxFuture<'static, Result<(), HostError>>) {
		let sink = self.sink.clone();

		wasm_bindgen_futures::spawn_local(async move {
			if let Err(reason) = outcome.await {
				sink(HostEvent::Rejected { request, reason });
			}
		});
	}

	fn add_listener(&mut self, target: ListenerTarget<'_, Element>, event: &str, listener: Listener) -> Result<(), HostError> {
		let key = (listener, event.to_owned());
		if self.callbacks.contains_key(&key) {
			return Ok(())
		}

		let event_target: EventTarget = match target {
			ListenerTarget::Document => self.document.clone().into(),
			ListenerTarget::Element(element) => element.clone().into(),
		};

		let callback = self.make_callback(listener);

		event_target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
			.map_err(|error| HostError::Listener(describe(&error)))?;

		self.callbacks.insert(key, (event_target, callback));
		Ok(())
	}

	fn remove_listener(&mut self, _: ListenerTarget<'_, Element>, event: &str, listener: Listener) {
		let Some((event_target, callback)) = self.callbacks.remove(&(listener, event.to_owned())) else {
			return
		};

		if let Err(error) = event_target.remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
			log::warn!("Failed to remove '{event}' listener: {}", describe(&error));
		}
	}
}

impl Drop for WebEnvironment {
	fn drop(&mut self) {
		// Callbacks must be detached before their closures are freed.
		for ((_, event), (event_target, callback)) in self.callbacks.drain() {
			let _ = event_target.remove_event_listener_with_callback(&event, callback.as_ref().unchecked_ref());
		}
	}
}


fn has_js_property(object: &JsValue, name: &str) -> bool {
	Reflect::has(object, &JsValue::from_str(name)).unwrap_or(false)
}

/// Best effort human readable form of a thrown value or rejection reason.
pub fn describe(value: &JsValue) -> String {
	if let Some(message) = value.as_string() {
		return message
	}

	if let Some(error) = value.dyn_ref::<js_sys::Error>() {
		return String::from(error.message())
	}

	format!("{value:?}")
}
