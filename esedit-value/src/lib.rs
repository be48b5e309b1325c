//! Literal value codec for esedit.
//!
//! [`decode`] turns an arena node into a [`PropertyValue`]; [`encode`] renders
//! a value back to source text. Decoding is total: expressions outside the
//! literal grammar come back as [`PropertyValue::Opaque`] and re-encode to
//! exactly the text they were read from.

mod codec;
mod value;

pub use codec::{decode, decode_object, encode};
pub use value::{is_spread_key, spread_key, Mapping, PropertyValue, SPREAD_MARKER};
