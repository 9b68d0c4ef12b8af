//! Projection codec between row snapshots and cursor tokens.

use std::fmt;
use std::sync::Arc;

use keyset_cursor_iso8601::Iso8601Validator;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::serializer::{JsonSerializer, Serializer};
use crate::transport::{Base64Transport, Transport};
use crate::value::{CursorValue, Record, RowSnapshot, canonical_instant, format_canonical};
use crate::Result;

/// Turns row snapshots into tokens and back, keeping only the configured keys.
///
/// Both operations treat a missing input as "nothing to do" and return `Ok(None)`.
pub trait TokenCodec: Send + Sync {
   /// Encode the values of `keys` found in `row`.
   fn serialize(&self, keys: &[&str], row: Option<&RowSnapshot>) -> Result<Option<String>>;

   /// Decode `token` and keep the values of `keys`.
   fn parse(&self, keys: &[&str], token: Option<&str>) -> Result<Option<RowSnapshot>>;
}

/// Default [`TokenCodec`]: a serializer layer wrapped in a transport layer, with
/// date-time normalization on both sides.
///
/// Out of the box this is JSON inside standard base64, compatible with tokens like
/// `eyJpZCI6MSwibGFzdE5hbWUiOiJTbWl0aCJ9` (`{"id":1,"lastName":"Smith"}`).
#[derive(Clone)]
pub struct Codec {
   transport: Arc<dyn Transport>,
   serializer: Arc<dyn Serializer>,
   validator: Iso8601Validator,
}

impl Default for Codec {
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Debug for Codec {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Codec")
         .field("validator", &self.validator)
         .finish_non_exhaustive()
   }
}

impl Codec {
   /// JSON serializer, standard base64 transport, permissive date validation.
   pub fn new() -> Self {
      Self {
         transport: Arc::new(Base64Transport),
         serializer: Arc::new(JsonSerializer),
         validator: Iso8601Validator::default(),
      }
   }

   /// Replace the transport layer.
   pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
      self.transport = Arc::new(transport);
      self
   }

   /// Replace the serializer layer.
   pub fn with_serializer(mut self, serializer: impl Serializer + 'static) -> Self {
      self.serializer = Arc::new(serializer);
      self
   }

   /// Replace the validator that decides which strings are dates.
   pub fn with_validator(mut self, validator: Iso8601Validator) -> Self {
      self.validator = validator;
      self
   }

   /// Prepare a value for the serializer layer.
   ///
   /// Date-times and date-like strings are written in the canonical UTC form; everything
   /// else passes through.
   pub fn encode_value(&self, value: &CursorValue) -> Result<JsonValue> {
      if let CursorValue::String(s) = value
         && let Some(instant) = self.validator.parse(s)
      {
         return Ok(JsonValue::String(format_canonical(instant)?));
      }
      value.to_json()
   }

   /// Restore a value read from the serializer layer, turning date-like strings into
   /// date-times.
   pub fn decode_value(&self, value: JsonValue) -> CursorValue {
      if let JsonValue::String(s) = &value
         && let Some(instant) = self.validator.parse(s)
      {
         return CursorValue::DateTime(instant);
      }
      CursorValue::from(value)
   }

   /// The value a trip through a token would produce, computed without one.
   ///
   /// Date-like strings become date-times, and date-times are reduced to their canonical
   /// UTC millisecond instant.
   pub fn normalize_value(&self, value: &CursorValue) -> Result<CursorValue> {
      Ok(match value {
         CursorValue::String(s) => self
            .validator
            .parse(s)
            .map_or_else(|| value.clone(), CursorValue::DateTime),
         CursorValue::DateTime(dt) => CursorValue::DateTime(canonical_instant(*dt)?),
         _ => value.clone(),
      })
   }
}

impl TokenCodec for Codec {
   fn serialize(&self, keys: &[&str], row: Option<&RowSnapshot>) -> Result<Option<String>> {
      let Some(row) = row else {
         return Ok(None);
      };

      let mut record = Record::with_capacity(keys.len());
      for key in keys {
         if let Some(value) = row.get(*key) {
            record.insert((*key).to_string(), self.encode_value(value)?);
         }
      }

      let text = self.serializer.serialize(&record)?;
      let token = self.transport.encode(&text)?;

      debug!(keys = record.len(), "Serialized cursor token");
      Ok(Some(token))
   }

   fn parse(&self, keys: &[&str], token: Option<&str>) -> Result<Option<RowSnapshot>> {
      let Some(token) = token.filter(|t| !t.is_empty()) else {
         return Ok(None);
      };

      let text = self.transport.decode(token)?;
      let mut record = self.serializer.deserialize(&text)?;

      let mut row = RowSnapshot::with_capacity(keys.len());
      for key in keys {
         if let Some(value) = record.swap_remove(*key) {
            row.insert((*key).to_string(), self.decode_value(value));
         }
      }

      debug!(keys = row.len(), dropped = record.len(), "Parsed cursor token");
      Ok(Some(row))
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use keyset_cursor_iso8601::Rfc3339Grammar;
   use serde_json::json;
   use time::macros::datetime;

   const KEYS: &[&str] = &["id", "lastName"];

   fn row(pairs: &[(&str, CursorValue)]) -> RowSnapshot {
      pairs
         .iter()
         .map(|(k, v)| (k.to_string(), v.clone()))
         .collect()
   }

   // ─── absent input ───

   #[test]
   fn serialize_without_row_is_none() {
      assert_eq!(Codec::new().serialize(KEYS, None).unwrap(), None);
   }

   #[test]
   fn parse_without_token_is_none() {
      let codec = Codec::new();
      assert_eq!(codec.parse(KEYS, None).unwrap(), None);
      assert_eq!(codec.parse(KEYS, Some("")).unwrap(), None);
   }

   // ─── projection ───

   #[test]
   fn serialize_follows_key_order_and_drops_extras() {
      let data = row(&[
         ("email", "j@doe.com".into()),
         ("lastName", "Smith".into()),
         ("id", 1.into()),
      ]);

      let token = Codec::new().serialize(KEYS, Some(&data)).unwrap().unwrap();
      assert_eq!(token, "eyJpZCI6MSwibGFzdE5hbWUiOiJTbWl0aCJ9");
   }

   #[test]
   fn serialize_skips_missing_keys() {
      let data = row(&[("id", 7.into())]);
      let codec = Codec::new();

      let token = codec.serialize(KEYS, Some(&data)).unwrap().unwrap();
      let parsed = codec.parse(KEYS, Some(&token)).unwrap().unwrap();

      assert_eq!(parsed, data);
   }

   #[test]
   fn parse_drops_unconfigured_fields() {
      // {"id":1,"lastName":"Smith","phone":"123"}
      let token = Base64Transport
         .encode(r#"{"id":1,"lastName":"Smith","phone":"123"}"#)
         .unwrap();

      let parsed = Codec::new().parse(KEYS, Some(&token)).unwrap().unwrap();
      assert_eq!(parsed, row(&[("id", 1.into()), ("lastName", "Smith".into())]));
   }

   // ─── dates ───

   #[test]
   fn date_strings_are_normalized_on_encode() {
      let codec = Codec::new();
      assert_eq!(
         codec.encode_value(&"1990-01-01".into()).unwrap(),
         json!("1990-01-01T00:00:00.000Z")
      );
      assert_eq!(
         codec.encode_value(&"2022-03-29 14:30+02:00".into()).unwrap(),
         json!("2022-03-29T12:30:00.000Z")
      );
      assert_eq!(
         codec.encode_value(&"not a date".into()).unwrap(),
         json!("not a date")
      );
   }

   #[test]
   fn date_strings_become_date_times_on_decode() {
      let codec = Codec::new();
      assert_eq!(
         codec.decode_value(json!("1990-01-01T00:00:00.000Z")),
         CursorValue::DateTime(datetime!(1990-01-01 0:00 UTC))
      );
      assert_eq!(
         codec.decode_value(json!("12:00:00")),
         CursorValue::from("12:00:00")
      );
   }

   #[test]
   fn validator_controls_what_counts_as_a_date() {
      let codec = Codec::new().with_validator(Iso8601Validator::with_host(Rfc3339Grammar));

      assert_eq!(
         codec.decode_value(json!("2022-03-29T12:30Z")),
         CursorValue::from("2022-03-29T12:30Z")
      );
      assert_eq!(
         codec.normalize_value(&"2022-03-29".into()).unwrap(),
         CursorValue::DateTime(datetime!(2022-03-29 0:00 UTC))
      );
   }

   #[test]
   fn normalize_matches_a_token_round_trip_for_date_times() {
      let codec = Codec::new();
      let keys = ["at"];

      for at in [
         datetime!(2022-03-29 12:30:45.123456 UTC),
         datetime!(2022-03-29 12:30:45.999999999 -05:30),
         datetime!(1969-12-31 23:59:59.000001 UTC),
      ] {
         let data = row(&[("at", at.into())]);
         let token = codec.serialize(&keys, Some(&data)).unwrap();
         let parsed = codec.parse(&keys, token.as_deref()).unwrap().unwrap();

         assert_eq!(codec.normalize_value(&data["at"]).unwrap(), parsed["at"]);
      }
      assert_eq!(
         codec
            .normalize_value(&datetime!(2022-03-29 12:30:45.123456 +02:00).into())
            .unwrap(),
         CursorValue::DateTime(datetime!(2022-03-29 10:30:45.123 UTC))
      );
   }

   // ─── malformed tokens ───

   #[test]
   fn parse_rejects_malformed_tokens() {
      let codec = Codec::new();

      assert!(codec.parse(KEYS, Some("%%%")).is_err());
      // "[1]" is valid JSON but not an object
      assert!(codec.parse(KEYS, Some("WzFd")).is_err());
   }
}
