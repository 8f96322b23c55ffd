//! Messages crossing the port boundary between capture and the external application.

use std::collections::VecDeque;
use serde::{Deserialize, Serialize};

pub mod prelude {
	pub use crate::{Inbound, Outbound, Outlet};
}


/// Application -> capture.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "port", rename_all = "camelCase")]
pub enum Inbound {
	/// Enter capture mode - fullscreen and/or pointer lock, depending on configuration.
	RequestPointerLock,
}

impl Inbound {
	pub const ALL: &'static [Inbound] = &[Inbound::RequestPointerLock];

	pub fn port_name(&self) -> &'static str {
		match self {
			Inbound::RequestPointerLock => "requestPointerLock",
		}
	}

	pub fn from_port_name(name: &str) -> Option<Inbound> {
		Inbound::ALL.iter()
			.copied()
			.find(|inbound| inbound.port_name() == name)
	}
}


/// Capture -> application.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "value", rename_all = "camelCase")]
pub enum Outbound {
	/// Sent on every confirmed lock or unlock.
	PointerLockChanged(bool),

	/// `[dx, dy]`, sent once per movement event while locked.
	PointerMovement([f64; 2]),
}

impl Outbound {
	pub fn port_name(&self) -> &'static str {
		match self {
			Outbound::PointerLockChanged(_) => "pointerLockChanged",
			Outbound::PointerMovement(_) => "pointerMovement",
		}
	}

	/// `{"port": <name>, "value": <payload>}`
	pub fn to_json(&self) -> anyhow::Result<String> {
		serde_json::to_string(self).map_err(Into::into)
	}
}


/// Somewhere outbound messages can be sent. Sends are fire-and-forget.
pub trait Outlet {
	fn send(&mut self, message: Outbound) -> anyhow::Result<()>;
}

impl<O: Outlet + ?Sized> Outlet for Box<O> {
	fn send(&mut self, message: Outbound) -> anyhow::Result<()> {
		(**self).send(message)
	}
}


/// An [`Outlet`] that just queues messages until someone collects them.
#[derive(Debug, Default)]
pub struct Mailbox {
	messages: VecDeque<Outbound>,
}

impl Mailbox {
	pub fn new() -> Mailbox {
		Mailbox::default()
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item=&Outbound> + '_ {
		self.messages.iter()
	}

	pub fn pop(&mut self) -> Option<Outbound> {
		self.messages.pop_front()
	}

	pub fn drain(&mut self) -> impl Iterator<Item=Outbound> + '_ {
		self.messages.drain(..)
	}

	/// Every lock state sent so far, oldest first.
	pub fn lock_changes(&self) -> Vec<bool> {
		self.messages.iter()
			.filter_map(|message| match message {
				Outbound::PointerLockChanged(locked) => Some(*locked),
				_ => None,
			})
			.collect()
	}
}

impl Outlet for Mailbox {
	fn send(&mut self, message: Outbound) -> anyhow::Result<()> {
		log::trace!("Queued {message:?}");
		self.messages.push_back(message);
		Ok(())
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn port_names() {
		assert_eq!(Inbound::from_port_name("requestPointerLock"), Some(Inbound::RequestPointerLock));
		assert_eq!(Inbound::from_port_name("pointerMovement"), None);

		assert_eq!(Outbound::PointerLockChanged(true).port_name(), "pointerLockChanged");
		assert_eq!(Outbound::PointerMovement([1.0, 2.0]).port_name(), "pointerMovement");
	}

	#[test]
	fn outbound_json_shape() {
		let json = Outbound::PointerMovement([-3.0, 7.5]).to_json().unwrap();
		assert_eq!(json, r#"{"port":"pointerMovement","value":[-3.0,7.5]}"#);

		let json = Outbound::PointerLockChanged(false).to_json().unwrap();
		assert_eq!(json, r#"{"port":"pointerLockChanged","value":false}"#);
	}

	#[test]
	fn inbound_json_shape() {
		let inbound: Inbound = serde_json::from_str(r#"{"port":"requestPointerLock"}"#).unwrap();
		assert_eq!(inbound, Inbound::RequestPointerLock);
	}

	#[test]
	fn mailbox_preserves_order() {
		let mut mailbox = Mailbox::new();
		mailbox.send(Outbound::PointerLockChanged(true)).unwrap();
		mailbox.send(Outbound::PointerMovement([1.0, 0.0])).unwrap();
		mailbox.send(Outbound::PointerLockChanged(false)).unwrap();

		assert_eq!(mailbox.len(), 3);
		assert_eq!(mailbox.lock_changes(), vec![true, false]);

		let drained: Vec<_> = mailbox.drain().collect();
		assert_eq!(drained[1], Outbound::PointerMovement([1.0, 0.0]));
		assert!(mailbox.is_empty());
	}
}
