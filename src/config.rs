//! Sort-key configuration for a pagination sequence.
//!
//! A configuration is built once per query shape and reused for every page. It
//! deserializes from the shape clients already send:
//!
//! ```json
//! {
//!    "primaryCursor": { "key": "id", "schema": "users.id" },
//!    "cursors": [{ "key": "lastName", "order": "DESC", "schema": "users.last_name" }]
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sort direction for a cursor key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
   /// Ascending order (smallest first)
   #[default]
   Asc,
   /// Descending order (largest first)
   Desc,
}

/// A named sort key bound to a column handle.
///
/// `name` is the field name in row snapshots and tokens; `column` is whatever the caller's
/// query layer uses to refer to the column and is never inspected here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey<C> {
   /// Field name in row snapshots and cursor tokens
   #[serde(rename = "key")]
   pub name: String,
   /// Sort direction, ascending unless stated
   #[serde(rename = "order", default)]
   pub direction: SortDirection,
   /// Opaque column handle passed through to predicates and ordering terms
   #[serde(rename = "schema")]
   pub column: C,
}

impl<C> SortKey<C> {
   /// Create a sort key with the default (ascending) direction.
   pub fn new(name: impl Into<String>, column: C) -> Self {
      Self::asc(name, column)
   }

   /// Create a sort key with ascending sort direction.
   pub fn asc(name: impl Into<String>, column: C) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Asc,
         column,
      }
   }

   /// Create a sort key with descending sort direction.
   pub fn desc(name: impl Into<String>, column: C) -> Self {
      Self {
         name: name.into(),
         direction: SortDirection::Desc,
         column,
      }
   }
}

/// Primary key plus optional secondary keys.
///
/// Rows are ordered by the secondary keys in order, then by the primary key, which must
/// be unique so the order is total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorConfig<C> {
   pub primary_cursor: SortKey<C>,
   #[serde(default)]
   pub cursors: Vec<SortKey<C>>,
}

impl<C> CursorConfig<C> {
   /// Configuration ordered by the primary key alone.
   pub fn new(primary_cursor: SortKey<C>) -> Self {
      Self {
         primary_cursor,
         cursors: Vec::new(),
      }
   }

   /// Append a secondary key. Earlier secondary keys take precedence.
   pub fn with_cursor(mut self, cursor: SortKey<C>) -> Self {
      self.cursors.push(cursor);
      self
   }

   /// Keys in sort precedence: secondary keys, then the primary key.
   pub fn sort_sequence(&self) -> Vec<&SortKey<C>> {
      self
         .cursors
         .iter()
         .chain(std::iter::once(&self.primary_cursor))
         .collect()
   }

   /// Key names in token order: the primary key, then secondary keys.
   pub fn token_keys(&self) -> Vec<&str> {
      std::iter::once(&self.primary_cursor)
         .chain(&self.cursors)
         .map(|key| key.name.as_str())
         .collect()
   }

   /// Reject empty or repeated key names.
   pub fn validate(&self) -> Result<()> {
      let mut seen = HashSet::new();
      for key in self.sort_sequence() {
         if key.name.is_empty() {
            return Err(Error::EmptyKeyName);
         }
         if !seen.insert(key.name.as_str()) {
            return Err(Error::DuplicateCursorKey {
               key: key.name.clone(),
            });
         }
      }
      Ok(())
   }
}
