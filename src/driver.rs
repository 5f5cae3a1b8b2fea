use crate::error::DecodeError;
use crate::node::DecoderArena;
use crate::registry::Type;
use crate::value::Composite;

/// Executes a registry [`Type`]'s ordered fields against `input`, producing
/// a mapping from field name to decoded value. The first failing field
/// aborts the whole decode; earlier fields' decoded values are discarded
/// rather than returned partially.
pub fn decode_type(arena: &DecoderArena, ty: &Type, input: &mut &[u8]) -> Result<Composite, DecodeError> {
	tracing::trace!(name = %ty.name, fields = ty.fields.len(), "decoding registry entry");

	let mut out = Composite::with_capacity(ty.fields.len());
	for field in &ty.fields {
		let value = arena.decode(field.node, input, &field.name)?;
		out.insert(field.name.clone(), value);
	}
	Ok(out)
}
