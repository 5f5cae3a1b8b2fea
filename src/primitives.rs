use codec::{Compact, Decode};
use scale_info::TypeDefPrimitive;

use crate::value::Value;

/// The sixteen primitive wire shapes a metadata type table can reference.
///
/// Rather than generating one monomorphic decoder per primitive, the builder
/// holds a single `Value<PrimitiveTag>` node and dispatches on this tag at
/// decode time; the observable behaviour is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTag {
	Bool,
	Char,
	Str,
	U8,
	U16,
	U32,
	U64,
	U128,
	U256,
	I8,
	I16,
	I32,
	I64,
	I128,
	I256,
}

impl PrimitiveTag {
	pub fn from_type_def(def: &TypeDefPrimitive) -> Self {
		match def {
			TypeDefPrimitive::Bool => Self::Bool,
			TypeDefPrimitive::Char => Self::Char,
			TypeDefPrimitive::Str => Self::Str,
			TypeDefPrimitive::U8 => Self::U8,
			TypeDefPrimitive::U16 => Self::U16,
			TypeDefPrimitive::U32 => Self::U32,
			TypeDefPrimitive::U64 => Self::U64,
			TypeDefPrimitive::U128 => Self::U128,
			TypeDefPrimitive::U256 => Self::U256,
			TypeDefPrimitive::I8 => Self::I8,
			TypeDefPrimitive::I16 => Self::I16,
			TypeDefPrimitive::I32 => Self::I32,
			TypeDefPrimitive::I64 => Self::I64,
			TypeDefPrimitive::I128 => Self::I128,
			TypeDefPrimitive::I256 => Self::I256,
		}
	}

	/// Whether this tag can legally appear underneath a `Compact<_>` wrapper.
	/// Only unsigned integers support the compact encoding.
	pub fn supports_compact(self) -> bool {
		matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128)
	}
}

fn decode_32_bytes(input: &mut &[u8]) -> Result<[u8; 32], codec::Error> {
	let mut buf = [0u8; 32];
	if input.len() < 32 {
		return Err("not enough bytes to decode a 256-bit integer".into());
	}
	buf.copy_from_slice(&input[..32]);
	*input = &input[32..];
	Ok(buf)
}

/// Decode a plain (non-compact) primitive value from the front of `input`.
pub fn decode(tag: PrimitiveTag, input: &mut &[u8]) -> Result<Value, codec::Error> {
	Ok(match tag {
		PrimitiveTag::Bool => Value::Bool(bool::decode(input)?),
		PrimitiveTag::Char => {
			let code_point = u32::decode(input)?;
			Value::Char(char::from_u32(code_point).ok_or("invalid char code point")?)
		},
		PrimitiveTag::Str => Value::Str(String::decode(input)?),
		PrimitiveTag::U8 => Value::U8(u8::decode(input)?),
		PrimitiveTag::U16 => Value::U16(u16::decode(input)?),
		PrimitiveTag::U32 => Value::U32(u32::decode(input)?),
		PrimitiveTag::U64 => Value::U64(u64::decode(input)?),
		PrimitiveTag::U128 => Value::U128(u128::decode(input)?),
		PrimitiveTag::U256 => Value::Bytes32(decode_32_bytes(input)?),
		PrimitiveTag::I8 => Value::I8(i8::decode(input)?),
		PrimitiveTag::I16 => Value::I16(i16::decode(input)?),
		PrimitiveTag::I32 => Value::I32(i32::decode(input)?),
		PrimitiveTag::I64 => Value::I64(i64::decode(input)?),
		PrimitiveTag::I128 => Value::I128(i128::decode(input)?),
		PrimitiveTag::I256 => Value::Bytes32(decode_32_bytes(input)?),
	})
}

/// Decode a compact-encoded unsigned integer from the front of `input`.
///
/// Only called for tags where [`PrimitiveTag::supports_compact`] holds; the
/// builder rejects any other primitive underneath a `Compact<_>` wrapper
/// before this is ever reached.
pub fn decode_compact(tag: PrimitiveTag, input: &mut &[u8]) -> Result<Value, codec::Error> {
	Ok(match tag {
		PrimitiveTag::U8 => Value::U8(Compact::<u8>::decode(input)?.0),
		PrimitiveTag::U16 => Value::U16(Compact::<u16>::decode(input)?.0),
		PrimitiveTag::U32 => Value::U32(Compact::<u32>::decode(input)?.0),
		PrimitiveTag::U64 => Value::U64(Compact::<u64>::decode(input)?.0),
		PrimitiveTag::U128 => Value::U128(Compact::<u128>::decode(input)?.0),
		_ => return Err("primitive type does not support compact encoding".into()),
	})
}
