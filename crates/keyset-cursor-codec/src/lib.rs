//! # keyset-cursor-codec
//!
//! Opaque cursor tokens for keyset pagination.
//!
//! A token is built in two independently replaceable layers:
//!
//! - **[`Serializer`]**: record ⇄ text (default: compact JSON)
//! - **[`Transport`]**: text ⇄ token (default: standard base64 over UTF-8)
//!
//! The [`Codec`] wraps both with a projection onto the configured sort-key names, and
//! normalizes temporal values: date-times and ISO-8601 strings are written as
//! `YYYY-MM-DDTHH:MM:SS.sssZ`, and any such string is read back as a
//! [`CursorValue::DateTime`].
//!
//! ```
//! use keyset_cursor_codec::{Codec, CursorValue, RowSnapshot, TokenCodec};
//!
//! let mut row = RowSnapshot::new();
//! row.insert("id".into(), CursorValue::from(1));
//! row.insert("birthday".into(), CursorValue::from("1990-01-01"));
//!
//! let codec = Codec::new();
//! let token = codec.serialize(&["id", "birthday"], Some(&row)).unwrap().unwrap();
//! let parsed = codec.parse(&["id", "birthday"], Some(&token)).unwrap().unwrap();
//!
//! assert!(parsed["birthday"].as_date_time().is_some());
//! ```

mod codec;
mod error;
mod serializer;
mod transport;
mod value;

pub use codec::{Codec, TokenCodec};
pub use error::{Error, Result};
pub use keyset_cursor_iso8601::{
   HostDateGrammar, Iso8601Validator, PermissiveGrammar, Rfc3339Grammar,
};
pub use serializer::{FnSerializer, JsonSerializer, Serializer};
pub use transport::{Base64Transport, Base64UrlTransport, FnTransport, Transport};
pub use value::{CursorValue, Record, RowSnapshot, canonical_instant, format_canonical};
