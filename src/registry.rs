use hashbrown::HashMap;
use scale_info::TypeDef;

use crate::builder::Builder;
use crate::error::{BuildError, DecodeError};
use crate::metadata::Metadata;
use crate::node::{CompositeField, DecoderArena};
use crate::value::Composite;

/// A registry entry: a named, ordered list of top-level fields, equivalent
/// to a `Composite` decoder node but addressable by registry key rather than
/// by arena id.
#[derive(Debug, Clone)]
pub struct Type {
	pub name: String,
	pub fields: Vec<CompositeField>,
}

/// A stable identity for a pallet event: `(pallet_index, variant_index)`.
/// Kept as a distinct two-field newtype rather than a raw byte pair or a
/// stringly-typed key, to rule out accidental collisions with call/error
/// registry keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(pub u8, pub u8);

macro_rules! string_keyed_registry {
	($name:ident) => {
		#[derive(Debug, Clone, Default)]
		pub struct $name {
			arena: DecoderArena,
			entries: HashMap<String, Type>,
		}

		impl $name {
			pub fn get(&self, key: &str) -> Option<&Type> {
				self.entries.get(key)
			}

			pub fn decode(&self, key: &str, input: &mut &[u8]) -> Result<Composite, DecodeError> {
				let ty = self.get(key).ok_or_else(|| DecodeError::UnknownCallOrError(key.to_string()))?;
				crate::driver::decode_type(&self.arena, ty, input)
			}

			pub fn keys(&self) -> impl Iterator<Item = &str> {
				self.entries.keys().map(String::as_str)
			}
		}
	};
}

string_keyed_registry!(CallRegistry);
string_keyed_registry!(ErrorRegistry);

#[derive(Debug, Clone, Default)]
pub struct EventRegistry {
	arena: DecoderArena,
	entries: HashMap<EventId, Type>,
}

impl EventRegistry {
	pub fn get(&self, id: EventId) -> Option<&Type> {
		self.entries.get(&id)
	}

	pub fn decode(&self, id: EventId, input: &mut &[u8]) -> Result<Composite, DecodeError> {
		let ty = self.get(id).ok_or(DecodeError::UnknownEvent(id))?;
		crate::driver::decode_type(&self.arena, ty, input)
	}

	pub fn ids(&self) -> impl Iterator<Item = EventId> + '_ {
		self.entries.keys().copied()
	}
}

/// Builds the call registry: `"Pallet.Call" -> Type` for every pallet that
/// declares a calls type.
pub fn build_call_registry(metadata: &Metadata) -> Result<CallRegistry, BuildError> {
	let (arena, entries) = build_string_keyed(metadata, "call", |pallet| {
		pallet.calls.as_ref().map(|c| c.ty.id)
	})?;
	Ok(CallRegistry { arena, entries })
}

/// Builds the error registry: `"Pallet.Error" -> Type` for every pallet that
/// declares an errors type.
pub fn build_error_registry(metadata: &Metadata) -> Result<ErrorRegistry, BuildError> {
	let (arena, entries) = build_string_keyed(metadata, "error", |pallet| {
		pallet.error.as_ref().map(|e| e.ty.id)
	})?;
	Ok(ErrorRegistry { arena, entries })
}

/// Builds the event registry, keyed by `(pallet_index, variant_index)`
/// rather than by name, per the Design Notes' anti-collision guidance.
pub fn build_event_registry(metadata: &Metadata) -> Result<EventRegistry, BuildError> {
	let types = metadata.types();
	let mut builder = Builder::new(types);
	let mut entries = HashMap::new();

	for pallet in metadata.pallets() {
		let Some(event) = pallet.event.as_ref() else { continue };
		let ty_index = event.ty.id;
		let ty = types
			.resolve(ty_index)
			.ok_or_else(|| BuildError::UnknownTypeIndex { path: pallet.name.clone(), index: ty_index })?;
		let TypeDef::Variant(variant) = &ty.type_def else {
			return Err(BuildError::NotAVariant { pallet: pallet.name.clone(), kind: "event", index: ty_index });
		};

		for v in &variant.variants {
			let key = format!("{}.{}", pallet.name, v.name);
			let fields = builder.build_top_level_fields(&v.fields, &key)?;
			let id = EventId(pallet.index, v.index);
			if entries.insert(id, Type { name: key, fields }).is_some() {
				return Err(BuildError::DuplicateEventId(id));
			}
		}
	}

	builder.resolve_cycles()?;
	Ok(EventRegistry { arena: builder.into_arena(), entries })
}

fn build_string_keyed(
	metadata: &Metadata,
	kind: &'static str,
	item_type_index: impl Fn(&frame_metadata::v14::PalletMetadata<scale_info::form::PortableForm>) -> Option<u32>,
) -> Result<(DecoderArena, HashMap<String, Type>), BuildError> {
	let types = metadata.types();
	let mut builder = Builder::new(types);
	let mut entries = HashMap::new();

	for pallet in metadata.pallets() {
		let Some(ty_index) = item_type_index(pallet) else { continue };
		let ty = types
			.resolve(ty_index)
			.ok_or_else(|| BuildError::UnknownTypeIndex { path: pallet.name.clone(), index: ty_index })?;
		let TypeDef::Variant(variant) = &ty.type_def else {
			return Err(BuildError::NotAVariant { pallet: pallet.name.clone(), kind, index: ty_index });
		};

		tracing::debug!(pallet = %pallet.name, kind, variants = variant.variants.len(), "building registry entries for pallet");

		for v in &variant.variants {
			let key = format!("{}.{}", pallet.name, v.name);
			let fields = builder.build_top_level_fields(&v.fields, &key)?;
			entries.insert(key.clone(), Type { name: key, fields });
		}
	}

	builder.resolve_cycles()?;
	Ok((builder.into_arena(), entries))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn event_id_distinguishes_pallet_and_variant() {
		let a = EventId(6, 2);
		let b = EventId(2, 6);
		assert_ne!(a, b);
	}
}
