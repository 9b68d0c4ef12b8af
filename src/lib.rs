//! # keyset-cursor
//!
//! Keyset (seek) pagination. Given a primary sort key and optional secondary sort keys,
//! a [`CursorGenerator`] produces:
//!
//! - the **ordering terms** for the query (secondary keys in order, then the primary key)
//! - the **seek predicate** selecting every row strictly after the last row of the previous
//!   page, from either that row or an opaque cursor token
//! - **cursor tokens** that carry just the sort-key values of a row
//!
//! Column handles are generic: the crate never inspects them, so they can be column
//! names, query-builder expressions, or anything else the caller's query layer uses. For
//! column-name handles, [`sql`] renders predicates and ordering as parameterized SQL.
//!
//! ## Example
//!
//! ```
//! use keyset_cursor::{CursorConfig, CursorValue, RowSnapshot, SortKey, generate_cursor};
//!
//! let config = CursorConfig::new(SortKey::asc("id", "id"))
//!    .with_cursor(SortKey::asc("lastName", "last_name"))
//!    .with_cursor(SortKey::asc("firstName", "first_name"));
//! let cursor = generate_cursor(config).unwrap();
//!
//! // First page: no filter
//! assert!(cursor.where_clause(None).unwrap().is_none());
//!
//! let mut last = RowSnapshot::new();
//! last.insert("id".into(), CursorValue::from(1));
//! last.insert("firstName".into(), CursorValue::from("John"));
//! last.insert("lastName".into(), CursorValue::from("Smith"));
//!
//! let token = cursor.serialize(Some(&last)).unwrap().unwrap();
//! let fragment = cursor.where_sql(Some((&token).into()), 0).unwrap().unwrap();
//!
//! assert_eq!(
//!    fragment.sql,
//!    r#"("last_name" > $1) OR ("last_name" = $2 AND "first_name" > $3) OR ("last_name" = $4 AND "first_name" = $5 AND "id" > $6)"#
//! );
//! assert_eq!(
//!    cursor.order_by_sql().unwrap(),
//!    r#"ORDER BY "last_name" ASC, "first_name" ASC, "id" ASC"#
//! );
//! ```

mod config;
mod error;
mod generator;
mod predicate;
mod sequence;
pub mod sql;

pub use config::{CursorConfig, SortDirection, SortKey};
pub use error::{Error, Result};
pub use generator::{CursorGenerator, CursorGeneratorBuilder, PreviousRow, generate_cursor};
pub use predicate::{OrderTerm, Predicate};
pub use sequence::expand;
pub use sql::SqlFragment;

// Re-export codec and date types so callers need a single dependency
pub use keyset_cursor_codec::{
   Base64Transport, Base64UrlTransport, Codec, CursorValue, FnSerializer, FnTransport,
   JsonSerializer, Record, RowSnapshot, Serializer, TokenCodec, Transport, canonical_instant,
   format_canonical,
};
pub use keyset_cursor_iso8601::{
   HostDateGrammar, Iso8601Validator, PermissiveGrammar, Rfc3339Grammar,
   is_valid_date_or_date_time, parse_date_or_date_time,
};
