//! Binds a [`Coordinator`] to the page body and an Elm style application object,
//! i.e. something with `app.ports.<name>.subscribe(fn)` and `app.ports.<name>.send(value)`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::Context;
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MouseEvent;

use pointerbox_host::{HostEvent, logging};
use pointerbox_host::web::{self, EventSink, WebEnvironment};
use pointerbox_bus::{Inbound, Outbound, Outlet};
use pointerbox_cfg::{CaptureConfig, Config};

use crate::Coordinator;


type WebCoordinator = Coordinator<WebEnvironment, ElmPorts>;


/// Sends outbound messages through `app.ports.<name>.send(value)`.
pub struct ElmPorts {
	ports: JsValue,
}

impl ElmPorts {
	pub fn from_app(app: &JsValue) -> anyhow::Result<ElmPorts> {
		let ports = get(app, "ports")?;
		anyhow::ensure!(ports.is_object(), "Application has no ports");

		Ok(ElmPorts { ports })
	}

	fn port(&self, name: &str) -> anyhow::Result<JsValue> {
		let port = get(&self.ports, name)?;
		anyhow::ensure!(port.is_object(), "Application has no '{name}' port");
		Ok(port)
	}

	fn port_method(&self, name: &str, method: &str) -> anyhow::Result<(JsValue, Function)> {
		let port = self.port(name)?;
		let function = get(&port, method)?
			.dyn_into::<Function>()
			.map_err(|_| anyhow::format_err!("Port '{name}' has no '{method}' function"))?;

		Ok((port, function))
	}
}

impl Outlet for ElmPorts {
	fn send(&mut self, message: Outbound) -> anyhow::Result<()> {
		let (port, send) = self.port_method(message.port_name(), "send")?;

		let value = match message {
			Outbound::PointerLockChanged(locked) => JsValue::from_bool(locked),
			Outbound::PointerMovement([dx, dy]) => Array::of2(&dx.into(), &dy.into()).into(),
		};

		send.call1(&port, &value)
			.map(|_| ())
			.map_err(js_error)
	}
}


/// Handle returned to JS. Capture stays active until [`PointerCapture::dispose`] is called.
#[wasm_bindgen]
pub struct PointerCapture {
	coordinator: Rc<RefCell<WebCoordinator>>,
	subscription: Option<Subscription>,
}

struct Subscription {
	port: JsValue,
	callback: Closure<dyn FnMut()>,
}

#[wasm_bindgen]
impl PointerCapture {
	/// Name of the current capture state.
	pub fn state(&self) -> String {
		match self.coordinator.try_borrow() {
			Ok(coordinator) => coordinator.state().name().to_owned(),
			Err(_) => "busy".to_owned(),
		}
	}

	/// Stop listening to the application and the page. Safe to call more than once.
	pub fn dispose(&mut self) {
		if let Some(Subscription { port, callback }) = self.subscription.take() {
			let unsubscribe = get(&port, "unsubscribe").ok()
				.and_then(|unsubscribe| unsubscribe.dyn_into::<Function>().ok());

			match unsubscribe {
				Some(unsubscribe) => {
					if let Err(error) = unsubscribe.call1(&port, callback.as_ref()) {
						log::warn!("Failed to unsubscribe: {}", web::describe(&error));
					}
				}

				// Can't detach, so the callback has to outlive us.
				None => callback.forget(),
			}
		}

		match self.coordinator.try_borrow_mut() {
			Ok(mut coordinator) => coordinator.disarm(),
			Err(_) => log::warn!("Couldn't disarm capture while it is handling an event"),
		}
	}
}


/// JS entry point. `flags` may be undefined, or an object like `{fullscreenEnabled, autoLockOnFullscreen}`.
#[wasm_bindgen(js_name = attachPointerCapture)]
pub fn attach_pointer_capture(app: JsValue, flags: JsValue) -> Result<PointerCapture, JsValue> {
	attach(&app, &flags)
		.map_err(|error| JsValue::from_str(&format!("{error:#}")))
}

pub fn attach(app: &JsValue, flags: &JsValue) -> anyhow::Result<PointerCapture> {
	logging::init(log::LevelFilter::Info);

	let config = read_config(flags)?;
	let (document, body) = web::page()?;
	let outlet = ElmPorts::from_app(app)?;

	let coordinator = Rc::new_cyclic(|weak: &Weak<RefCell<WebCoordinator>>| {
		let env = WebEnvironment::new(document, event_sink(weak.clone()));
		RefCell::new(Coordinator::new(env, outlet, body, config))
	});

	coordinator.borrow_mut().arm()
		.context("Failed to arm pointer capture")?;

	let mut capture = PointerCapture {
		coordinator,
		subscription: None,
	};

	match subscribe(app, &capture.coordinator) {
		Ok(subscription) => capture.subscription = Some(subscription),
		Err(error) => {
			capture.dispose();
			return Err(error)
		}
	}

	Ok(capture)
}


fn event_sink(coordinator: Weak<RefCell<WebCoordinator>>) -> EventSink {
	Rc::new(move |event: HostEvent<MouseEvent>| {
		let Some(shared) = coordinator.upgrade() else {
			log::warn!("Dropping host event - capture is gone");
			return
		};

		let Ok(mut coordinator) = shared.try_borrow_mut() else {
			log::warn!("Dropping re-entrant host event");
			return
		};

		coordinator.handle_event(event);
	})
}

fn subscribe(app: &JsValue, coordinator: &Rc<RefCell<WebCoordinator>>) -> anyhow::Result<Subscription> {
	let command = Inbound::RequestPointerLock;
	let (port, subscribe) = ElmPorts::from_app(app)?
		.port_method(command.port_name(), "subscribe")?;

	let coordinator = Rc::downgrade(coordinator);
	let callback = Closure::<dyn FnMut()>::new(move || {
		let Some(shared) = coordinator.upgrade() else { return };

		match shared.try_borrow_mut() {
			Ok(mut coordinator) => coordinator.handle_command(command),
			Err(_) => log::warn!("Dropping '{}' - capture is busy", command.port_name()),
		}
	});

	subscribe.call1(&port, callback.as_ref())
		.map_err(js_error)?;

	Ok(Subscription { port, callback })
}

/// Flags from the host page, then `capture.*` overrides from the query string.
fn read_config(flags: &JsValue) -> anyhow::Result<CaptureConfig> {
	let config = if flags.is_undefined() || flags.is_null() {
		CaptureConfig::default()
	} else {
		serde_wasm_bindgen::from_value(flags.clone())
			.map_err(|error| anyhow::format_err!("Invalid capture flags: {error}"))?
	};

	let query = web_sys::window()
		.and_then(|window| window.location().search().ok())
		.unwrap_or_default();

	let overrides = match Config::from_sources(None, query.trim_start_matches('?').split('&')) {
		Ok(overrides) => overrides,
		Err(error) => {
			log::warn!("Ignoring malformed query string: {error:#}");
			Config::new()
		}
	};

	Ok(config.overridden_by(&overrides))
}


fn get(object: &JsValue, name: &str) -> anyhow::Result<JsValue> {
	Reflect::get(object, &JsValue::from_str(name))
		.map_err(js_error)
}

fn js_error(value: JsValue) -> anyhow::Error {
	anyhow::format_err!("{}", web::describe(&value))
}
