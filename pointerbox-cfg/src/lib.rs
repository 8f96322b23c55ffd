pub mod prelude {
	pub use crate::{CaptureConfig, LockTrigger};
}

pub mod table;
pub use table::{Table, Value};

use serde::{Deserialize, Serialize};
use tracing::instrument;


/// Runtime representation of hierarchical key-value storage, intended for settings, query string config, etc.
#[derive(Debug, Clone, Default)]
pub struct Config {
	/// Config parsed from a settings document.
	base: Table,

	/// Any config overridden by query string or CLI args.
	arguments: Table,
}

impl Config {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from an optional TOML document and `key=value` overrides.
	#[instrument(name="config load", skip_all)]
	pub fn from_sources<'a>(document: Option<&str>, args: impl IntoIterator<Item=&'a str>) -> anyhow::Result<Self> {
		let mut config = Self::default();

		if let Some(document) = document {
			config.base = Table::from_toml_str(document)?;
		}

		config.arguments = Table::from_args(args)?;

		log::info!("Loaded config: {config:?}");

		Ok(config)
	}

	/// Permanently fold `overrides` into the base layer.
	pub fn commit(&mut self, overrides: &Table) {
		self.base.merge_from(overrides);
	}
}

impl Config {
	pub fn get_value(&self, key: &str) -> Option<&Value> {
		if let Some(value) = self.arguments.get_value(key) {
			return Some(value)
		}

		if let Some(value) = self.base.get_value(key) {
			return Some(value)
		}

		None
	}

	pub fn get_bool(&self, key: &str) -> Option<bool> {
		let value = self.get_value(key)?;
		let b = value.as_bool();

		if b.is_none() {
			log::warn!("Config value '{key}' should be a bool, got {value:?} - ignoring");
		}

		b
	}
}


/// Which edge of the capture state machine requests pointer lock.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LockTrigger {
	/// Lock as soon as the target is confirmed fullscreen.
	OnFullscreenEntry,

	/// Lock directly when the application asks for capture.
	OnCommand,
}


/// How capture is acquired.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
	/// Request fullscreen before pointer lock. When false, only pointer lock is ever requested.
	pub fullscreen_enabled: bool,

	/// Request pointer lock when fullscreen is entered rather than alongside the fullscreen request.
	/// Has no effect when fullscreen is disabled.
	pub auto_lock_on_fullscreen: bool,
}

impl Default for CaptureConfig {
	fn default() -> Self {
		CaptureConfig {
			fullscreen_enabled: true,
			auto_lock_on_fullscreen: true,
		}
	}
}

impl CaptureConfig {
	pub const FULLSCREEN_ENABLED_KEY: &'static str = "capture.fullscreen_enabled";
	pub const AUTO_LOCK_KEY: &'static str = "capture.auto_lock_on_fullscreen";

	pub fn from_config(config: &Config) -> CaptureConfig {
		CaptureConfig::default().overridden_by(config)
	}

	/// Replace any fields `config` has values for.
	pub fn overridden_by(mut self, config: &Config) -> CaptureConfig {
		if let Some(enabled) = config.get_bool(Self::FULLSCREEN_ENABLED_KEY) {
			self.fullscreen_enabled = enabled;
		}

		if let Some(auto_lock) = config.get_bool(Self::AUTO_LOCK_KEY) {
			self.auto_lock_on_fullscreen = auto_lock;
		}

		self
	}

	pub fn lock_trigger(&self) -> LockTrigger {
		if self.fullscreen_enabled && self.auto_lock_on_fullscreen {
			LockTrigger::OnFullscreenEntry
		} else {
			LockTrigger::OnCommand
		}
	}

	/// Complain about combinations that don't mean what they say.
	pub fn check(&self) {
		if !self.fullscreen_enabled && self.auto_lock_on_fullscreen {
			log::warn!("auto_lock_on_fullscreen has no effect with fullscreen disabled - pointer lock will be requested on command");
		}
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn defaults_lock_on_fullscreen_entry() {
		let config = CaptureConfig::from_config(&Config::new());
		assert_eq!(config, CaptureConfig::default());
		assert_eq!(config.lock_trigger(), LockTrigger::OnFullscreenEntry);
	}

	#[test]
	fn arguments_beat_document() {
		let document = "[capture]\nfullscreen_enabled = false\nauto_lock_on_fullscreen = false\n";
		let config = Config::from_sources(Some(document), ["capture.auto_lock_on_fullscreen=true"]).unwrap();

		let capture = CaptureConfig::from_config(&config);
		assert!(!capture.fullscreen_enabled);
		assert!(capture.auto_lock_on_fullscreen);
		assert_eq!(capture.lock_trigger(), LockTrigger::OnCommand);
	}

	#[test]
	fn wrong_type_is_ignored() {
		let config = Config::from_sources(None, ["capture.fullscreen_enabled=sometimes"]).unwrap();
		assert_eq!(config.get_bool(CaptureConfig::FULLSCREEN_ENABLED_KEY), None);
		assert!(CaptureConfig::from_config(&config).fullscreen_enabled);
	}

	#[test]
	fn commit_folds_into_base() {
		let mut config = Config::new();
		config.commit(&Table::from_args(["capture.fullscreen_enabled=false"]).unwrap());
		assert_eq!(config.get_bool(CaptureConfig::FULLSCREEN_ENABLED_KEY), Some(false));
	}

	#[test]
	fn lock_trigger_table() {
		let trigger = |fullscreen_enabled, auto_lock_on_fullscreen| {
			CaptureConfig { fullscreen_enabled, auto_lock_on_fullscreen }.lock_trigger()
		};

		assert_eq!(trigger(true, true), LockTrigger::OnFullscreenEntry);
		assert_eq!(trigger(true, false), LockTrigger::OnCommand);
		assert_eq!(trigger(false, true), LockTrigger::OnCommand);
		assert_eq!(trigger(false, false), LockTrigger::OnCommand);
	}

	#[test]
	fn flags_deserialize_with_defaults() {
		let config: CaptureConfig = toml::from_str("autoLockOnFullscreen = false").unwrap();
		assert_eq!(config, CaptureConfig { fullscreen_enabled: true, auto_lock_on_fullscreen: false });
	}
}
