//! Keyset predicate generation.
//!
//! For sort keys `k1, k2, …, kN` (secondary keys first, primary key last) and the last
//! row of the previous page, the next page is every row that satisfies
//!
//! ```text
//! (k1 ≻ v1)
//! OR (k1 = v1 AND k2 ≻ v2)
//! OR …
//! OR (k1 = v1 AND … AND kN-1 = vN-1 AND kN ≻ vN)
//! ```
//!
//! where `≻` is `>` for ascending keys and `<` for descending ones.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use keyset_cursor_codec::{
   Codec, CursorValue, Iso8601Validator, RowSnapshot, Serializer, TokenCodec, Transport,
};
use tracing::{debug, trace};

use crate::config::{CursorConfig, SortKey};
use crate::predicate::{OrderTerm, Predicate};
use crate::sequence::expand;
use crate::{Error, Result};

/// Reference to the last row of the previous page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviousRow<'a> {
   /// Cursor token produced by [`CursorGenerator::serialize`]
   Token(&'a str),
   /// Row values already in memory
   Snapshot(&'a RowSnapshot),
}

impl<'a> From<&'a str> for PreviousRow<'a> {
   fn from(token: &'a str) -> Self {
      PreviousRow::Token(token)
   }
}

impl<'a> From<&'a String> for PreviousRow<'a> {
   fn from(token: &'a String) -> Self {
      PreviousRow::Token(token)
   }
}

impl<'a> From<&'a RowSnapshot> for PreviousRow<'a> {
   fn from(row: &'a RowSnapshot) -> Self {
      PreviousRow::Snapshot(row)
   }
}

/// Build a generator with the default codec (JSON inside standard base64).
pub fn generate_cursor<C: Clone>(config: CursorConfig<C>) -> Result<CursorGenerator<C>> {
   CursorGenerator::builder(config).build()
}

/// Builder for [`CursorGenerator`] with replaceable codec layers.
pub struct CursorGeneratorBuilder<C> {
   config: CursorConfig<C>,
   codec: Codec,
   custom_codec: Option<Arc<dyn TokenCodec>>,
}

impl<C: Clone> CursorGeneratorBuilder<C> {
   /// Replace the transport layer (token ⇄ text).
   pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
      self.codec = self.codec.with_transport(transport);
      self
   }

   /// Replace the serializer layer (text ⇄ record).
   pub fn serializer(mut self, serializer: impl Serializer + 'static) -> Self {
      self.codec = self.codec.with_serializer(serializer);
      self
   }

   /// Replace the validator that decides which strings are dates.
   pub fn validator(mut self, validator: Iso8601Validator) -> Self {
      self.codec = self.codec.with_validator(validator);
      self
   }

   /// Replace token parsing and serialization wholesale.
   ///
   /// Transport and serializer settings are ignored once a custom codec is set.
   pub fn codec(mut self, codec: impl TokenCodec + 'static) -> Self {
      self.custom_codec = Some(Arc::new(codec));
      self
   }

   /// Validate the configuration and build the generator.
   pub fn build(self) -> Result<CursorGenerator<C>> {
      self.config.validate()?;

      let order_by = self
         .config
         .sort_sequence()
         .into_iter()
         .map(|key| OrderTerm {
            column: key.column.clone(),
            direction: key.direction,
         })
         .collect::<Vec<_>>();

      let token_codec = match self.custom_codec {
         Some(codec) => codec,
         None => Arc::new(self.codec.clone()),
      };

      debug!(keys = order_by.len(), "Built cursor generator");

      Ok(CursorGenerator {
         config: self.config,
         order_by,
         token_codec,
         normalizer: self.codec,
      })
   }
}

/// Ordering terms, seek predicates, and cursor tokens for one pagination sequence.
///
/// Cheap to share across threads; every method is a pure computation apart from
/// whatever the configured codec layers do.
#[derive(Clone)]
pub struct CursorGenerator<C> {
   config: CursorConfig<C>,
   order_by: Vec<OrderTerm<C>>,
   token_codec: Arc<dyn TokenCodec>,
   normalizer: Codec,
}

impl<C: fmt::Debug> fmt::Debug for CursorGenerator<C> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("CursorGenerator")
         .field("config", &self.config)
         .field("order_by", &self.order_by)
         .finish_non_exhaustive()
   }
}

impl<C: Clone> CursorGenerator<C> {
   pub fn builder(config: CursorConfig<C>) -> CursorGeneratorBuilder<C> {
      CursorGeneratorBuilder {
         config,
         codec: Codec::new(),
         custom_codec: None,
      }
   }

   pub fn config(&self) -> &CursorConfig<C> {
      &self.config
   }

   /// One term per sort key: secondary keys in order, then the primary key.
   pub fn order_by(&self) -> &[OrderTerm<C>] {
      &self.order_by
   }

   /// Predicate selecting the rows strictly after `previous`.
   ///
   /// Returns `None` for the first page (`previous` is `None` or an empty token).
   /// Date-like strings in a snapshot are read as date-times, exactly as they would be
   /// after a trip through a token, so a row and its token produce the same predicate.
   pub fn where_clause(
      &self,
      previous: Option<PreviousRow<'_>>,
   ) -> Result<Option<Predicate<C>>> {
      let row: Cow<'_, RowSnapshot> = match previous {
         None => {
            debug!("No previous row, first page");
            return Ok(None);
         }
         Some(PreviousRow::Snapshot(row)) => Cow::Borrowed(row),
         Some(PreviousRow::Token(token)) => match self.parse(Some(token))? {
            Some(row) => Cow::Owned(row),
            None => {
               debug!("Empty cursor token, first page");
               return Ok(None);
            }
         },
      };

      let sequence = self.config.sort_sequence();
      let mut terms = Vec::with_capacity(sequence.len());

      for prefix in expand(&sequence) {
         let Some((last, ties)) = prefix.split_last() else {
            continue;
         };

         let mut parts = Vec::with_capacity(prefix.len());
         for key in ties {
            parts.push(Predicate::Equals(key.column.clone(), self.value_of(&row, key)?));
         }
         parts.push(Predicate::past(
            last.direction,
            last.column.clone(),
            self.value_of(&row, last)?,
         ));

         if let Some(term) = Predicate::and(parts) {
            trace!(depth = prefix.len(), key = %last.name, "Built keyset term");
            terms.push(term);
         }
      }

      Ok(Predicate::or(terms))
   }

   /// Key names carried by tokens: the primary key, then secondary keys.
   pub fn keys(&self) -> Vec<&str> {
      self.config.token_keys()
   }

   /// Shorthand for `where_clause(Some(PreviousRow::Snapshot(row)))`.
   pub fn where_after_row(&self, row: &RowSnapshot) -> Result<Option<Predicate<C>>> {
      self.where_clause(Some(PreviousRow::Snapshot(row)))
   }

   /// Shorthand for `where_clause(Some(PreviousRow::Token(token)))`.
   pub fn where_after_token(&self, token: &str) -> Result<Option<Predicate<C>>> {
      self.where_clause(Some(PreviousRow::Token(token)))
   }

   /// Decode a token into the configured keys' values.
   pub fn parse(&self, token: Option<&str>) -> Result<Option<RowSnapshot>> {
      Ok(self.token_codec.parse(&self.keys(), token)?)
   }

   /// Encode the configured keys' values of `row` into a token.
   pub fn serialize(&self, row: Option<&RowSnapshot>) -> Result<Option<String>> {
      Ok(self.token_codec.serialize(&self.keys(), row)?)
   }

   fn value_of(&self, row: &RowSnapshot, key: &SortKey<C>) -> Result<CursorValue> {
      let value = row.get(&key.name).ok_or_else(|| Error::CursorValueNotFound {
         key: key.name.clone(),
      })?;

      Ok(self.normalizer.normalize_value(value)?)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::config::SortDirection;

   fn row(pairs: &[(&str, CursorValue)]) -> RowSnapshot {
      pairs
         .iter()
         .map(|(k, v)| (k.to_string(), v.clone()))
         .collect()
   }

   fn by_id(direction: SortDirection) -> CursorGenerator<&'static str> {
      let primary = SortKey {
         name: "id".into(),
         direction,
         column: "id",
      };
      generate_cursor(CursorConfig::new(primary)).unwrap()
   }

   // ─── first page ───

   #[test]
   fn no_previous_row_means_no_filter() {
      assert_eq!(by_id(SortDirection::Asc).where_clause(None).unwrap(), None);
      assert_eq!(by_id(SortDirection::Desc).where_clause(None).unwrap(), None);
   }

   #[test]
   fn empty_token_means_no_filter() {
      assert_eq!(by_id(SortDirection::Asc).where_after_token("").unwrap(), None);
   }

   // ─── primary key only ───

   #[test]
   fn ascending_primary_key_is_greater_than() {
      let prev = row(&[("id", 1.into()), ("name", "x".into())]);
      assert_eq!(
         by_id(SortDirection::Asc).where_after_row(&prev).unwrap(),
         Some(Predicate::greater_than("id", 1))
      );
   }

   #[test]
   fn descending_primary_key_is_less_than() {
      let prev = row(&[("id", 1.into())]);
      assert_eq!(
         by_id(SortDirection::Desc).where_after_row(&prev).unwrap(),
         Some(Predicate::less_than("id", 1))
      );
   }

   // ─── validation ───

   #[test]
   fn build_rejects_duplicate_keys() {
      let config =
         CursorConfig::new(SortKey::asc("id", "id")).with_cursor(SortKey::desc("id", "id"));
      assert!(matches!(
         generate_cursor(config).err(),
         Some(Error::DuplicateCursorKey { .. })
      ));
   }

   #[test]
   fn missing_value_is_an_error() {
      let cursor = generate_cursor(
         CursorConfig::new(SortKey::asc("id", "id")).with_cursor(SortKey::asc("name", "name")),
      )
      .unwrap();

      let err = cursor.where_after_row(&row(&[("id", 1.into())])).unwrap_err();
      assert!(matches!(err, Error::CursorValueNotFound { key } if key == "name"));
   }

   #[test]
   fn keys_put_primary_first() {
      let cursor = generate_cursor(
         CursorConfig::new(SortKey::desc("id", "id")).with_cursor(SortKey::asc("name", "name")),
      )
      .unwrap();

      assert_eq!(cursor.keys(), vec!["id", "name"]);
   }

   #[test]
   fn order_by_follows_sort_sequence() {
      let cursor = generate_cursor(
         CursorConfig::new(SortKey::desc("id", "id")).with_cursor(SortKey::asc("name", "name")),
      )
      .unwrap();

      assert_eq!(
         cursor.order_by(),
         &[OrderTerm::asc("name"), OrderTerm::desc("id")]
      );
   }
}
