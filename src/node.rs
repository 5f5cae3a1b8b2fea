use codec::Decode;

use crate::error::DecodeError;
use crate::primitives::{self, PrimitiveTag};
use crate::value::{Composite, Value};

/// Index into a [`DecoderArena`]. Valid only for the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// One field of a [`DecoderNode::Composite`]: its display name, its decoder,
/// and the metadata type index it was built from (kept for error context).
#[derive(Debug, Clone)]
pub struct CompositeField {
	pub name: String,
	pub node: NodeId,
	pub type_index: u32,
}

/// The closed set of decoder node shapes. Every metadata type definition the
/// builder accepts is lowered into exactly one of these.
#[derive(Debug, Clone)]
pub enum DecoderNode {
	/// Reads nothing; decodes to [`Value::Null`].
	Noop,
	/// Reads one plain-encoded primitive.
	Value(PrimitiveTag),
	/// Reads one compact-encoded unsigned integer.
	CompactValue(PrimitiveTag),
	/// Reads a fixed number of items of a single item decoder.
	Array { length: u32, item: NodeId },
	/// Reads a compact length prefix, then that many items of a single item decoder.
	Sequence { item: NodeId },
	/// Reads each field in order into a named mapping.
	Composite { fields: Vec<CompositeField> },
	/// Reads one discriminant byte, then dispatches to the matching arm.
	Variant { arms: hashbrown::HashMap<u8, NodeId> },
	/// Reads a store value then an order value, into a two-entry mapping.
	BitSequence { store: NodeId, order: NodeId },
	/// Indirection patched by the cycle resolver once its target is built.
	Recursive { target: Option<NodeId> },
}

/// Flat, append-only store of decoder nodes, owned exclusively by the
/// registry that built it. Using a plain index instead of `Rc`/`Arc` avoids
/// reference cycles even though `Recursive` nodes point back into their own
/// ancestry, and makes the built arena trivially `Send + Sync`.
#[derive(Debug, Clone, Default)]
pub struct DecoderArena {
	nodes: Vec<DecoderNode>,
}

impl DecoderArena {
	pub fn new() -> Self {
		Self { nodes: Vec::new() }
	}

	pub fn push(&mut self, node: DecoderNode) -> NodeId {
		let id = NodeId(self.nodes.len() as u32);
		self.nodes.push(node);
		id
	}

	pub fn get(&self, id: NodeId) -> &DecoderNode {
		&self.nodes[id.0 as usize]
	}

	pub fn get_mut(&mut self, id: NodeId) -> &mut DecoderNode {
		&mut self.nodes[id.0 as usize]
	}

	/// Patch a `Recursive` placeholder at `id` to point at `target`.
	pub fn resolve_recursive(&mut self, id: NodeId, target: NodeId) {
		match self.get_mut(id) {
			DecoderNode::Recursive { target: t } => *t = Some(target),
			other => panic!("resolve_recursive called on non-recursive node: {other:?}"),
		}
	}

	pub fn decode(&self, id: NodeId, input: &mut &[u8], field: &str) -> Result<Value, DecodeError> {
		match self.get(id) {
			DecoderNode::Noop => Ok(Value::Null),

			DecoderNode::Value(tag) => primitives::decode(*tag, input)
				.map_err(|source| DecodeError::Read { field: field.to_string(), source }),

			DecoderNode::CompactValue(tag) => primitives::decode_compact(*tag, input)
				.map_err(|source| DecodeError::Read { field: field.to_string(), source }),

			DecoderNode::Array { length, item } => {
				let mut out = Vec::with_capacity(*length as usize);
				for _ in 0..*length {
					out.push(self.decode(*item, input, field)?);
				}
				Ok(Value::Sequence(out))
			},

			DecoderNode::Sequence { item } => {
				let len = codec::Compact::<u32>::decode(input)
					.map_err(|source| DecodeError::Read { field: field.to_string(), source })?
					.0;
				let mut out = Vec::with_capacity(len as usize);
				for _ in 0..len {
					out.push(self.decode(*item, input, field)?);
				}
				Ok(Value::Sequence(out))
			},

			DecoderNode::Composite { fields } => {
				let mut out = Composite::with_capacity(fields.len());
				for f in fields {
					let value = self.decode(f.node, input, &f.name)?;
					out.insert(f.name.clone(), value);
				}
				Ok(Value::Map(out))
			},

			DecoderNode::Variant { arms } => {
				let discriminant = u8::decode(input)
					.map_err(|source| DecodeError::Read { field: field.to_string(), source })?;
				let arm = arms.get(&discriminant).ok_or_else(|| DecodeError::UnknownVariant {
					field: field.to_string(),
					discriminant,
				})?;
				if matches!(self.get(*arm), DecoderNode::Noop) {
					return Ok(Value::U8(discriminant));
				}
				self.decode(*arm, input, field)
			},

			DecoderNode::BitSequence { store, order } => {
				let mut out = Composite::with_capacity(2);
				out.insert("bit_store", self.decode(*store, input, "bit_store")?);
				out.insert("bit_order", self.decode(*order, input, "bit_order")?);
				Ok(Value::Map(out))
			},

			DecoderNode::Recursive { target } => match target {
				Some(target) => self.decode(*target, input, field),
				None => Err(DecodeError::MissingDecoder(id)),
			},
		}
	}
}
