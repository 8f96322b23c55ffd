use std::collections::HashMap;
use anyhow::Context;


/// Hierarchical key-value storage. Keys may be dotted to address nested tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
	data: HashMap<String, Value>,
}


impl Table {
	pub fn new() -> Table {
		Table::default()
	}

	pub fn from_toml_str(source: &str) -> anyhow::Result<Table> {
		let raw: toml::Table = toml::from_str(source)
			.context("Failed to parse config")?;

		Ok(Table::from_toml(raw))
	}

	/// Parse `key=value` pairs, as found in a query string or on a command line.
	/// `true` and `false` become bools, a bare key is treated as `true`.
	pub fn from_args<'a>(args: impl IntoIterator<Item=&'a str>) -> anyhow::Result<Table> {
		let mut table = Table::new();

		for arg in args {
			let arg = arg.trim();
			if arg.is_empty() {
				continue
			}

			let (key, value) = match arg.split_once('=') {
				Some((key, value)) => (key.trim(), Value::parse(value.trim())),
				None => (arg, Value::Bool(true)),
			};

			anyhow::ensure!(!key.is_empty(), "Missing key in argument '{arg}'");
			anyhow::ensure!(!key.split('.').any(str::is_empty), "Malformed key '{key}'");

			table.set_value(key, value);
		}

		Ok(table)
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Copy or replace values present in `other`
	pub fn merge_from(&mut self, other: &Table) {
		for (key, value) in other.data.iter() {
			if let (Some(Value::Table(ours)), Value::Table(theirs)) = (self.data.get_mut(key), value) {
				ours.merge_from(theirs);
				continue
			}

			self.data.insert(key.clone(), value.clone());
		}
	}

	pub fn get_value(&self, key: &str) -> Option<&Value> {
		if let Some((key, tail)) = key.split_once('.') {
			let subtable = self.data.get(key)?
				.as_table()?;

			subtable.get_value(tail)
		} else {
			self.data.get(key)
		}
	}

	/// Set a value, creating intermediate tables as needed.
	/// Any non-table value in the way is replaced.
	pub fn set_value(&mut self, key: &str, value: Value) {
		if let Some((key, tail)) = key.split_once('.') {
			let entry = self.data.entry(key.into())
				.or_insert_with(|| Value::Table(Table::new()));

			if entry.as_table().is_none() {
				*entry = Value::Table(Table::new());
			}

			if let Value::Table(subtable) = entry {
				subtable.set_value(tail, value);
			}

		} else {
			self.data.insert(key.into(), value);
		}
	}

	fn from_toml(raw: toml::Table) -> Table {
		let data = raw.into_iter()
			.map(|(key, value)| {
				let value = match value {
					toml::Value::String(string) => Value::String(string),
					toml::Value::Boolean(b) => Value::Bool(b),
					toml::Value::Table(table) => Value::Table(Table::from_toml(table)),
					other => Value::String(other.to_string()),
				};

				(key, value)
			})
			.collect();

		Table { data }
	}
}




#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	String(String),
	Table(Table),
	Bool(bool),
}

impl Value {
	fn parse(raw: &str) -> Value {
		match raw {
			"true" | "1" | "yes" | "on" => Value::Bool(true),
			"false" | "0" | "no" | "off" => Value::Bool(false),
			_ => Value::String(raw.into()),
		}
	}

	pub fn as_table(&self) -> Option<&Table> {
		match self {
			Value::Table(tbl) => Some(tbl),
			_ => None
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s.as_str()),
			_ => None
		}
	}
}


#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn dotted_keys() {
		let mut table = Table::new();
		table.set_value("capture.fullscreen_enabled", Value::Bool(false));

		assert_eq!(table.get_value("capture.fullscreen_enabled"), Some(&Value::Bool(false)));
		assert!(table.get_value("capture").and_then(Value::as_table).is_some());
		assert_eq!(table.get_value("capture.missing"), None);
		assert_eq!(table.get_value("capture.fullscreen_enabled.deeper"), None);
	}

	#[test]
	fn parses_toml() {
		let table = Table::from_toml_str(r#"
			title = "demo"

			[capture]
			auto_lock_on_fullscreen = false
			retries = 3
		"#).unwrap();

		assert_eq!(table.get_value("title").and_then(Value::as_str), Some("demo"));
		assert_eq!(table.get_value("capture.auto_lock_on_fullscreen").and_then(Value::as_bool), Some(false));
		assert_eq!(table.get_value("capture.retries").and_then(Value::as_str), Some("3"));
	}

	#[test]
	fn invalid_toml_is_an_error() {
		assert!(Table::from_toml_str("[capture").is_err());
	}

	#[test]
	fn parses_args() {
		let table = Table::from_args(["capture.fullscreen_enabled=off", "verbose", "", "name = pat"]).unwrap();

		assert_eq!(table.get_value("capture.fullscreen_enabled"), Some(&Value::Bool(false)));
		assert_eq!(table.get_value("verbose"), Some(&Value::Bool(true)));
		assert_eq!(table.get_value("name").and_then(Value::as_str), Some("pat"));

		assert!(Table::from_args(["=true"]).is_err());
		assert!(Table::from_args(["capture..x=1"]).is_err());
	}

	#[test]
	fn merge_replaces_leaves_and_keeps_siblings() {
		let mut base = Table::from_args(["capture.a=true", "capture.b=true"]).unwrap();
		let overrides = Table::from_args(["capture.b=false", "other=x"]).unwrap();

		base.merge_from(&overrides);

		assert_eq!(base.get_value("capture.a"), Some(&Value::Bool(true)));
		assert_eq!(base.get_value("capture.b"), Some(&Value::Bool(false)));
		assert_eq!(base.get_value("other").and_then(Value::as_str), Some("x"));
	}
}
