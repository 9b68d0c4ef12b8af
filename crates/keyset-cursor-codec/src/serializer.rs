//! Serializer layer: structured record ⇄ text.

use std::fmt;

use crate::Result;
use crate::value::Record;

/// Inner encoding of a cursor token.
///
/// The default [`JsonSerializer`] keeps numbers, strings, booleans and null, but has no
/// date-time type; the codec normalizes dates to canonical strings before calling it.
pub trait Serializer: Send + Sync {
   /// Write a record as text.
   fn serialize(&self, record: &Record) -> Result<String>;

   /// Read a record back from text.
   fn deserialize(&self, text: &str) -> Result<Record>;
}

/// Compact JSON, keys in record order.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
   fn serialize(&self, record: &Record) -> Result<String> {
      Ok(serde_json::to_string(record)?)
   }

   fn deserialize(&self, text: &str) -> Result<Record> {
      Ok(serde_json::from_str(text)?)
   }
}

/// Serializer built from a pair of closures.
pub struct FnSerializer<S, D> {
   serialize: S,
   deserialize: D,
}

impl<S, D> FnSerializer<S, D>
where
   S: Fn(&Record) -> Result<String> + Send + Sync,
   D: Fn(&str) -> Result<Record> + Send + Sync,
{
   pub fn new(serialize: S, deserialize: D) -> Self {
      Self {
         serialize,
         deserialize,
      }
   }
}

impl<S, D> fmt::Debug for FnSerializer<S, D> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("FnSerializer")
   }
}

impl<S, D> Serializer for FnSerializer<S, D>
where
   S: Fn(&Record) -> Result<String> + Send + Sync,
   D: Fn(&str) -> Result<Record> + Send + Sync,
{
   fn serialize(&self, record: &Record) -> Result<String> {
      (self.serialize)(record)
   }

   fn deserialize(&self, text: &str) -> Result<Record> {
      (self.deserialize)(text)
   }
}
