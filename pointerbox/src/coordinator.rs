use pointerbox_host::{Environment, HostEvent, Listener, ListenerTarget, RequestKind};
use pointerbox_input::capability::{self, CapabilityRequest};
use pointerbox_input::{CaptureError, FullscreenController, PointerLockController, extract_delta};
use pointerbox_bus::{Inbound, Outbound, Outlet};
use pointerbox_cfg::{CaptureConfig, LockTrigger};
use tracing::instrument;

use crate::CaptureState;


/// Drives fullscreen -> pointer lock acquisition for a single target element and relays
/// lock changes and movement to an [`Outlet`].
///
/// Browser state is authoritative. The coordinator only remembers the last [`CaptureState`] so it
/// knows which listeners to attach or detach, and only emits when that state actually changes.
pub struct Coordinator<E: Environment, O: Outlet> {
	env: E,
	outlet: O,
	target: E::Element,
	config: CaptureConfig,

	fullscreen: FullscreenController,
	pointer_lock: PointerLockController,

	state: CaptureState,

	/// Change events currently listened for. None while disarmed.
	armed: Option<Vec<(&'static str, Listener)>>,
	movement_attached: bool,
}


impl<E: Environment, O: Outlet> Coordinator<E, O> {
	/// Resolves request capabilities against `target`. Nothing is attached until [`Self::arm`].
	pub fn new(env: E, outlet: O, target: E::Element, config: CaptureConfig) -> Self {
		config.check();
		log::info!("Capture config: {config:?} ({:?})", config.lock_trigger());

		let fullscreen = FullscreenController::new(&target);
		let pointer_lock = PointerLockController::new(&target);

		if config.fullscreen_enabled && !fullscreen.is_available() {
			log::warn!("Fullscreen is enabled but unavailable - capture requests will do nothing");
		}

		if !pointer_lock.is_available() {
			log::warn!("Pointer lock is unavailable - capture will never lock");
		}

		Coordinator {
			env,
			outlet,
			target,
			config,

			fullscreen,
			pointer_lock,

			state: CaptureState::Idle,
			armed: None,
			movement_attached: false,
		}
	}

	pub fn state(&self) -> CaptureState { self.state }
	pub fn config(&self) -> &CaptureConfig { &self.config }
	pub fn target(&self) -> &E::Element { &self.target }
	pub fn is_armed(&self) -> bool { self.armed.is_some() }

	pub fn env(&self) -> &E { &self.env }
	pub fn env_mut(&mut self) -> &mut E { &mut self.env }

	pub fn outlet(&self) -> &O { &self.outlet }
	pub fn outlet_mut(&mut self) -> &mut O { &mut self.outlet }

	/// Start listening for change events, under every vendor name the document exposes.
	#[instrument(skip_all)]
	pub fn arm(&mut self) -> Result<(), CaptureError> {
		if self.armed.is_some() {
			return Err(CaptureError::AlreadyArmed)
		}

		let mut wanted = Vec::new();
		if self.config.fullscreen_enabled {
			wanted.push((capability::FULLSCREEN_CHANGE, Listener::FullscreenChange));
		}
		wanted.push((capability::POINTER_LOCK_CHANGE, Listener::PointerLockChange));

		let mut attached = Vec::new();
		let result = self.attach_change_listeners(&wanted, &mut attached);

		self.armed = Some(attached);

		if let Err(error) = result {
			self.disarm();
			return Err(error)
		}

		log::info!("Capture armed");
		Ok(())
	}

	fn attach_change_listeners(&mut self, wanted: &[(CapabilityRequest, Listener)], attached: &mut Vec<(&'static str, Listener)>)
		-> Result<(), CaptureError>
	{
		for &(request, listener) in wanted {
			let properties = request.resolve_all(self.env.document());
			if properties.is_empty() {
				log::warn!("No '{}' event in this environment - it will never be observed", request.canonical_name);
			}

			for property in properties {
				let event = capability::event_name(property);
				self.env.add_listener(ListenerTarget::Document, event, listener)?;
				attached.push((event, listener));
			}
		}

		Ok(())
	}

	/// Remove every listener this coordinator attached and forget any capture state.
	/// The coordinator can be armed again afterwards.
	#[instrument(skip_all)]
	pub fn disarm(&mut self) {
		self.detach_movement();

		for (event, listener) in self.armed.take().unwrap_or_default() {
			self.env.remove_listener(ListenerTarget::Document, event, listener);
		}

		if self.state.is_locked() {
			log::info!("Disarmed while pointer locked - no further lock changes will be reported");
		}

		self.set_state(CaptureState::Idle);
	}

	#[instrument(skip(self))]
	pub fn handle_command(&mut self, command: Inbound) {
		match command {
			Inbound::RequestPointerLock => self.enter_capture(),
		}
	}

	#[instrument(skip_all)]
	pub fn handle_event(&mut self, event: HostEvent<E::MoveEvent>) {
		match event {
			HostEvent::FullscreenChange => self.on_fullscreen_change(),
			HostEvent::PointerLockChange => self.on_pointer_lock_change(),
			HostEvent::MouseMove(event) => self.on_movement(&event),

			HostEvent::Rejected { request: RequestKind::Fullscreen, reason } => {
				log::error!("`requestFullscreen` failed: {reason}");

				if self.state == CaptureState::FullscreenRequested {
					self.set_state(CaptureState::Idle);
				}
			}

			HostEvent::Rejected { request: RequestKind::PointerLock, reason } => {
				log::warn!("`requestPointerLock` failed: {reason}");
			}
		}
	}
}


impl<E: Environment, O: Outlet> Coordinator<E, O> {
	fn enter_capture(&mut self) {
		if self.armed.is_none() {
			log::warn!("Capture requested before arming - ignoring");
			return
		}

		match self.state {
			CaptureState::PointerLocked => {
				log::debug!("Capture requested while already locked");
			}

			// Lock was released but fullscreen kept. Asking for fullscreen again wouldn't produce a change event.
			CaptureState::Fullscreen => self.request_pointer_lock(),

			CaptureState::Idle | CaptureState::FullscreenRequested if !self.config.fullscreen_enabled => {
				self.request_pointer_lock();
			}

			CaptureState::Idle | CaptureState::FullscreenRequested => {
				match self.fullscreen.request(&mut self.env, &self.target) {
					Ok(()) => self.set_state(CaptureState::FullscreenRequested),
					Err(error) => {
						log::error!("`requestFullscreen` failed: {error}");
						self.set_state(CaptureState::Idle);
					}
				}

				if self.config.lock_trigger() == LockTrigger::OnCommand {
					self.request_pointer_lock();
				}
			}
		}
	}

	fn request_pointer_lock(&mut self) {
		match self.pointer_lock.request(&mut self.env, &self.target) {
			Ok(()) => log::debug!("Pointer lock requested - a denial will only show up as a missing lock change"),
			Err(error) => log::warn!("`requestPointerLock` failed: {error}"),
		}
	}

	fn on_fullscreen_change(&mut self) {
		let is_fullscreen = FullscreenController::is_fullscreen_element(&self.env, &self.target);

		match (self.state, is_fullscreen) {
			(CaptureState::Idle | CaptureState::FullscreenRequested, true) => {
				self.set_state(CaptureState::Fullscreen);

				if self.config.lock_trigger() == LockTrigger::OnFullscreenEntry {
					self.request_pointer_lock();
				}
			}

			(CaptureState::FullscreenRequested | CaptureState::Fullscreen, false) => {
				log::debug!("Target is not the fullscreen element");
				self.set_state(CaptureState::Idle);
			}

			(CaptureState::PointerLocked, false) => {
				// Exiting fullscreen drops the lock too. If the browser hasn't reported that yet,
				// the pending lock change will land us in Idle.
				if !PointerLockController::is_locked_element(&self.env, &self.target) {
					self.release_lock();
				}
			}

			(CaptureState::Fullscreen | CaptureState::PointerLocked, true) | (CaptureState::Idle, false) => {
				log::trace!("Fullscreen change with no effect in {}", self.state);
			}
		}
	}

	fn on_pointer_lock_change(&mut self) {
		let is_locked = PointerLockController::is_locked_element(&self.env, &self.target);

		match (self.state.is_locked(), is_locked) {
			(false, true) => self.acquire_lock(),
			(true, false) => self.release_lock(),
			_ => log::trace!("Pointer lock change with no effect in {}", self.state),
		}
	}

	fn on_movement(&mut self, event: &E::MoveEvent) {
		if !self.state.is_locked() {
			log::trace!("Dropping movement in {}", self.state);
			return
		}

		let sample = extract_delta(event);
		self.emit(Outbound::PointerMovement(sample.to_array()));
	}

	fn acquire_lock(&mut self) {
		match self.env.add_listener(ListenerTarget::Element(&self.target), capability::MOUSE_MOVE_EVENT, Listener::Movement) {
			Ok(()) => self.movement_attached = true,
			Err(error) => log::error!("Failed to attach movement listener: {error}"),
		}

		self.set_state(CaptureState::PointerLocked);
		self.emit(Outbound::PointerLockChanged(true));
	}

	fn release_lock(&mut self) {
		self.detach_movement();

		let still_fullscreen = self.config.fullscreen_enabled
			&& FullscreenController::is_fullscreen_element(&self.env, &self.target);

		self.set_state(match still_fullscreen {
			true => CaptureState::Fullscreen,
			false => CaptureState::Idle,
		});

		self.emit(Outbound::PointerLockChanged(false));
	}

	fn detach_movement(&mut self) {
		if std::mem::take(&mut self.movement_attached) {
			self.env.remove_listener(ListenerTarget::Element(&self.target), capability::MOUSE_MOVE_EVENT, Listener::Movement);
		}
	}

	fn set_state(&mut self, state: CaptureState) {
		if self.state != state {
			log::debug!("Capture state {} -> {}", self.state, state);
			self.state = state;
		}
	}

	fn emit(&mut self, message: Outbound) {
		let port_name = message.port_name();

		if let Err(error) = self.outlet.send(message) {
			log::warn!("Failed to send '{port_name}': {error}");
		}
	}
}
