//! Scalar values carried in a cursor.

use indexmap::IndexMap;
use serde_json::{Number, Value as JsonValue};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, Result};

/// Sort-key values of the last row on a page, keyed by sort-key name.
///
/// Insertion order is preserved, which keeps encoded tokens deterministic.
pub type RowSnapshot = IndexMap<String, CursorValue>;

/// Generic text-level record handed to a [`Serializer`](crate::Serializer).
pub type Record = IndexMap<String, JsonValue>;

/// A single sort-key value.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorValue {
   Null,
   Bool(bool),
   Number(Number),
   String(String),
   /// Calendar date or date-time.
   DateTime(OffsetDateTime),
   /// Arrays and objects, carried through untouched.
   Json(JsonValue),
}

impl CursorValue {
   pub fn is_null(&self) -> bool {
      matches!(self, CursorValue::Null)
   }

   pub fn as_date_time(&self) -> Option<OffsetDateTime> {
      match self {
         CursorValue::DateTime(dt) => Some(*dt),
         _ => None,
      }
   }

   /// Convert to JSON, writing date-times in the canonical form.
   pub fn to_json(&self) -> Result<JsonValue> {
      Ok(match self {
         CursorValue::Null => JsonValue::Null,
         CursorValue::Bool(b) => JsonValue::Bool(*b),
         CursorValue::Number(n) => JsonValue::Number(n.clone()),
         CursorValue::String(s) => JsonValue::String(s.clone()),
         CursorValue::DateTime(dt) => JsonValue::String(format_canonical(*dt)?),
         CursorValue::Json(v) => v.clone(),
      })
   }
}

impl From<JsonValue> for CursorValue {
   fn from(value: JsonValue) -> Self {
      match value {
         JsonValue::Null => CursorValue::Null,
         JsonValue::Bool(b) => CursorValue::Bool(b),
         JsonValue::Number(n) => CursorValue::Number(n),
         JsonValue::String(s) => CursorValue::String(s),
         other => CursorValue::Json(other),
      }
   }
}

impl From<bool> for CursorValue {
   fn from(value: bool) -> Self {
      CursorValue::Bool(value)
   }
}

impl From<&str> for CursorValue {
   fn from(value: &str) -> Self {
      CursorValue::String(value.to_string())
   }
}

impl From<String> for CursorValue {
   fn from(value: String) -> Self {
      CursorValue::String(value)
   }
}

impl From<OffsetDateTime> for CursorValue {
   fn from(value: OffsetDateTime) -> Self {
      CursorValue::DateTime(value)
   }
}

/// Non-finite floats have no JSON representation and become `Null`.
impl From<f64> for CursorValue {
   fn from(value: f64) -> Self {
      Number::from_f64(value).map_or(CursorValue::Null, CursorValue::Number)
   }
}

macro_rules! impl_from_integer {
   ($($ty:ty),*) => {
      $(
         impl From<$ty> for CursorValue {
            fn from(value: $ty) -> Self {
               CursorValue::Number(Number::from(value))
            }
         }
      )*
   };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32, u64);

impl<T: Into<CursorValue>> From<Option<T>> for CursorValue {
   fn from(value: Option<T>) -> Self {
      value.map_or(CursorValue::Null, Into::into)
   }
}

/// The instant `value` denotes, in UTC and truncated to whole milliseconds.
///
/// This is exactly what survives [`format_canonical`] and a parse back. Instants whose
/// UTC year falls outside `0000..=9999` have no canonical form.
pub fn canonical_instant(value: OffsetDateTime) -> Result<OffsetDateTime> {
   let utc = value
      .checked_to_offset(UtcOffset::UTC)
      .filter(|utc| (0..=9999).contains(&utc.year()))
      .ok_or(Error::DateOutOfRange)?;

   utc.replace_nanosecond(u32::from(utc.millisecond()) * 1_000_000)
      .map_err(|_| Error::DateOutOfRange)
}

/// Write `value` as UTC with millisecond precision and a `Z` suffix,
/// e.g. `1990-01-01T00:00:00.000Z`.
pub fn format_canonical(value: OffsetDateTime) -> Result<String> {
   let format =
      format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

   Ok(canonical_instant(value)?.format(&format)?)
}
