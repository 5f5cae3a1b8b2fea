use hashbrown::HashMap;
use scale_info::form::PortableForm;
use scale_info::{Field, PortableRegistry, Type, TypeDef, Variant};

use crate::error::BuildError;
use crate::node::{CompositeField, DecoderArena, DecoderNode, NodeId};
use crate::primitives::PrimitiveTag;

/// Memoization key: a type is built at most once per (type index, whether it
/// is reached underneath a `Compact<_>` wrapper) pair, since the two
/// contexts decode the same type index under different wire semantics.
type MemoKey = (u32, bool);

/// Recursively lowers metadata type definitions into [`DecoderNode`]s,
/// memoizing by [`MemoKey`] and breaking cycles with a `Recursive`
/// placeholder inserted before descending into a type's own fields.
pub struct Builder<'a> {
	types: &'a PortableRegistry,
	arena: DecoderArena,
	memo: HashMap<MemoKey, NodeId>,
	pending: Vec<(NodeId, MemoKey)>,
}

impl<'a> Builder<'a> {
	pub fn new(types: &'a PortableRegistry) -> Self {
		Self { types, arena: DecoderArena::new(), memo: HashMap::new(), pending: Vec::new() }
	}

	/// Resolve the type at `type_index`, building its decoder if necessary.
	/// `path` is a human-readable context string used only for error
	/// messages (e.g. `"Balances.transfer.value"`).
	pub fn build_type_decoder(
		&mut self,
		type_index: u32,
		compact: bool,
		path: &str,
	) -> Result<NodeId, BuildError> {
		let key = (type_index, compact);

		if let Some(&id) = self.memo.get(&key) {
			if matches!(self.arena.get(id), DecoderNode::Recursive { target: None }) {
				tracing::trace!(type_index, compact, path, "recording recursive back-edge");
				self.pending.push((id, key));
			}
			return Ok(id);
		}

		let resolved_ty = self.resolve(type_index, path)?;

		// Compact is a wire-format modifier, not a structural type of its own:
		// alias the plain key straight to the inner compact decoder instead of
		// materialising a pass-through node for it. The placeholder still goes
		// in first so a type that is (bizarrely) compact-recursive through
		// itself still terminates via the usual pending-patch machinery.
		if !compact {
			if let TypeDef::Compact(inner) = &resolved_ty.type_def {
				let placeholder = self.arena.push(DecoderNode::Recursive { target: None });
				self.memo.insert(key, placeholder);
				let inner_id = self.build_type_decoder(inner.type_param.id, true, path)?;
				self.memo.insert(key, inner_id);
				return Ok(inner_id);
			}
		}

		let placeholder = self.arena.push(DecoderNode::Recursive { target: None });
		self.memo.insert(key, placeholder);

		let node = if compact {
			self.build_compact_node(resolved_ty, type_index, path)?
		} else {
			self.build_plain_node(resolved_ty, type_index, path)?
		};

		let real_id = self.arena.push(node);
		self.memo.insert(key, real_id);
		Ok(real_id)
	}

	fn resolve(&self, type_index: u32, path: &str) -> Result<&'a Type<PortableForm>, BuildError> {
		self.types
			.resolve(type_index)
			.ok_or_else(|| BuildError::UnknownTypeIndex { path: path.to_string(), index: type_index })
	}

	fn build_plain_node(
		&mut self,
		ty: &'a Type<PortableForm>,
		type_index: u32,
		path: &str,
	) -> Result<DecoderNode, BuildError> {
		match &ty.type_def {
			TypeDef::Primitive(p) => Ok(DecoderNode::Value(PrimitiveTag::from_type_def(p))),

			// `TypeDef::Compact` is intercepted in `build_type_decoder` before this
			// function is ever called for a plain (non-compact) key.
			TypeDef::Composite(composite) => {
				let fields = self.build_fields(&composite.fields, path, false)?;
				Ok(DecoderNode::Composite { fields })
			},

			TypeDef::Variant(variant) => Ok(self.build_variant(&variant.variants, path, false)?),

			TypeDef::Array(array) => {
				let item = self.build_type_decoder(array.type_param.id, false, path)?;
				Ok(DecoderNode::Array { length: array.len, item })
			},

			TypeDef::Sequence(sequence) => {
				let item = self.build_type_decoder(sequence.type_param.id, false, path)?;
				Ok(DecoderNode::Sequence { item })
			},

			TypeDef::Tuple(tuple) if tuple.fields.is_empty() => Ok(DecoderNode::Noop),

			TypeDef::Tuple(tuple) => {
				let fields = tuple
					.fields
					.iter()
					.enumerate()
					.map(|(i, f)| {
						let name = format!("tuple_item_{i}");
						let node = self.build_type_decoder(f.id, false, &format!("{path}.{name}"))?;
						Ok(CompositeField { name, node, type_index: f.id })
					})
					.collect::<Result<Vec<_>, BuildError>>()?;
				Ok(DecoderNode::Composite { fields })
			},

			TypeDef::BitSequence(bits) => {
				let store = self.build_type_decoder(bits.bit_store_type.id, false, path)?;
				let order = self.build_type_decoder(bits.bit_order_type.id, false, path)?;
				Ok(DecoderNode::BitSequence { store, order })
			},

			_ => Err(BuildError::UnsupportedType {
				path: path.to_string(),
				index: type_index,
				reason: "type definition shape is not supported",
			}),
		}
	}

	fn build_compact_node(
		&mut self,
		ty: &'a Type<PortableForm>,
		type_index: u32,
		path: &str,
	) -> Result<DecoderNode, BuildError> {
		match &ty.type_def {
			TypeDef::Primitive(p) => {
				let tag = PrimitiveTag::from_type_def(p);
				if !tag.supports_compact() {
					return Err(BuildError::UnsupportedCompactType {
						path: path.to_string(),
						index: type_index,
						reason: "only unsigned integer primitives support compact encoding",
					});
				}
				Ok(DecoderNode::CompactValue(tag))
			},

			TypeDef::Tuple(tuple) if tuple.fields.is_empty() => Ok(DecoderNode::Noop),

			TypeDef::Tuple(tuple) => {
				let fields = tuple
					.fields
					.iter()
					.enumerate()
					.map(|(i, f)| {
						let name = format!("tuple_item_{i}");
						let node = self.build_type_decoder(f.id, true, &format!("{path}.{name}"))?;
						Ok(CompositeField { name, node, type_index: f.id })
					})
					.collect::<Result<Vec<_>, BuildError>>()?;
				Ok(DecoderNode::Composite { fields })
			},

			TypeDef::Composite(composite) => {
				let fields = self.build_fields(&composite.fields, path, true)?;
				Ok(DecoderNode::Composite { fields })
			},

			_ => Err(BuildError::UnsupportedCompactType {
				path: path.to_string(),
				index: type_index,
				reason: "compact wrapper only supports primitive, tuple, or composite inner types",
			}),
		}
	}

	/// Build a top-level field list (a pallet's call/event/error variant
	/// payload) using the general field-naming rule, as opposed to the
	/// positional `variant_item_{i}` rule used for `Variant` nodes nested
	/// inside the type graph (see [`Builder::build_variant`]).
	pub fn build_top_level_fields(
		&mut self,
		fields: &'a [Field<PortableForm>],
		path: &str,
	) -> Result<Vec<CompositeField>, BuildError> {
		self.build_fields(fields, path, false)
	}

	fn build_fields(
		&mut self,
		fields: &'a [Field<PortableForm>],
		path: &str,
		compact: bool,
	) -> Result<Vec<CompositeField>, BuildError> {
		fields
			.iter()
			.map(|field| {
				let type_index = field.ty.id;
				let resolved = self.resolve(type_index, path)?;
				let name = field_name(field, resolved, type_index);
				let field_path = format!("{path}.{name}");
				let node = self.build_type_decoder(type_index, compact, &field_path)?;
				Ok(CompositeField { name, node, type_index })
			})
			.collect()
	}

	fn build_variant(
		&mut self,
		variants: &'a [Variant<PortableForm>],
		path: &str,
		compact: bool,
	) -> Result<DecoderNode, BuildError> {
		let mut arms = HashMap::with_capacity(variants.len());
		for variant in variants.iter() {
			let variant_path = format!("{path}.{}", variant.name);
			let arm_node = if variant.fields.is_empty() {
				self.arena.push(DecoderNode::Noop)
			} else {
				// Variant arm fields are named positionally (`variant_item_{i}`)
				// rather than via the general field-naming rule: tuple-style
				// variant payloads rarely carry meaningful field names.
				let fields = variant
					.fields
					.iter()
					.enumerate()
					.map(|(i, field)| {
						let type_index = field.ty.id;
						let name = format!("variant_item_{i}");
						let field_path = format!("{variant_path}.{name}");
						let node = self.build_type_decoder(type_index, compact, &field_path)?;
						Ok(CompositeField { name, node, type_index })
					})
					.collect::<Result<Vec<_>, BuildError>>()?;
				self.arena.push(DecoderNode::Composite { fields })
			};
			arms.insert(variant.index, arm_node);
		}
		Ok(DecoderNode::Variant { arms })
	}

	/// Patch every recorded back-edge placeholder to its fully-built target.
	/// Must be called once, after the whole pallet scan that produced this
	/// builder's registry has finished.
	pub fn resolve_cycles(&mut self) -> Result<(), BuildError> {
		for (placeholder, key) in std::mem::take(&mut self.pending) {
			let real_id = *self.memo.get(&key).ok_or(BuildError::RecursiveResolution {
				index: key.0,
				reason: "no decoder was ever built for this type index",
			})?;
			if matches!(self.arena.get(real_id), DecoderNode::Recursive { .. }) {
				return Err(BuildError::RecursiveResolution {
					index: key.0,
					reason: "resolved target is itself a recursive placeholder",
				});
			}
			self.arena.resolve_recursive(placeholder, real_id);
		}
		Ok(())
	}

	pub fn into_arena(self) -> DecoderArena {
		self.arena
	}
}

/// Field name derivation: path segments (joined by `_`) beat the field's own
/// name, which beats its type-name, which beats a positional fallback.
fn field_name(field: &Field<PortableForm>, resolved_type: &Type<PortableForm>, type_index: u32) -> String {
	if !resolved_type.path.segments.is_empty() {
		return resolved_type.path.segments.join("_");
	}
	if let Some(name) = &field.name {
		return name.clone();
	}
	if let Some(type_name) = &field.type_name {
		return type_name.clone();
	}
	format!("lookup_index_{type_index}")
}
