use hashbrown::HashMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A decoded SCALE value, shaped so it can be serialized to JSON (or any
/// other self-describing format) without this crate depending on one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Null,
	Bool(bool),
	Char(char),
	Str(String),
	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	U128(u128),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	I128(i128),
	/// U256/I256: stored as a fixed 32-byte little-endian array, since no
	/// native 256-bit integer type exists to hold them.
	Bytes32([u8; 32]),
	Sequence(Vec<Value>),
	Map(Composite),
}

/// An ordered, string-keyed mapping, preserving field declaration order
/// rather than sorting by key. Serializes as a JSON-style object rather than
/// an array of pairs, so `#[derive(Serialize)]`'s default tuple-vec encoding
/// would be the wrong shape here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
	entries: Vec<(String, Value)>,
}

impl Serialize for Composite {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.entries.len()))?;
		for (k, v) in &self.entries {
			map.serialize_entry(k, v)?;
		}
		map.end()
	}
}

impl Composite {
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	pub fn with_capacity(capacity: usize) -> Self {
		Self { entries: Vec::with_capacity(capacity) }
	}

	pub fn insert(&mut self, name: impl Into<String>, value: Value) {
		self.entries.push((name.into(), value));
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
	}

	pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn into_map(self) -> HashMap<String, Value> {
		self.entries.into_iter().collect()
	}
}

impl FromIterator<(String, Value)> for Composite {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self { entries: iter.into_iter().collect() }
	}
}
