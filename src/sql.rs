//! SQL rendering for predicates and ordering terms.
//!
//! Works for column handles that are column names (`C: AsRef<str>`). Values are never
//! interpolated: comparisons become `$N` placeholders, numbered from
//! `param_offset + 1` so they never collide with the caller's own `$1`, `$2`, …
//! parameters, and the values come back in placeholder order.
//!
//! ```
//! use keyset_cursor::{Predicate, sql::render_predicate};
//!
//! let predicate = Predicate::Or(vec![
//!    Predicate::greater_than("a", 1),
//!    Predicate::And(vec![Predicate::equals("a", 1), Predicate::less_than("b", 2)]),
//! ]);
//!
//! let fragment = render_predicate(&predicate, 0).unwrap();
//! assert_eq!(fragment.sql, r#"("a" > $1) OR ("a" = $2 AND "b" < $3)"#);
//! ```

use serde_json::Value as JsonValue;

use crate::config::SortDirection;
use crate::generator::{CursorGenerator, PreviousRow};
use crate::predicate::{OrderTerm, Predicate};
use crate::{Error, Result};

/// A parameterized SQL fragment and its bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
   pub sql: String,
   /// Bind values for `$param_offset + 1`, `$param_offset + 2`, …
   pub values: Vec<JsonValue>,
}

/// Validate that a column name is safe for SQL interpolation.
///
/// Accepts names matching `[a-zA-Z_][a-zA-Z0-9_.]*`, which covers plain column
/// names, qualified names (e.g., `table.column`), and underscored identifiers.
pub(crate) fn validate_column_name(name: &str) -> Result<()> {
   let mut chars = name.chars();
   let valid_start = chars
      .next()
      .is_some_and(|first| first.is_ascii_alphabetic() || first == '_');
   let valid_rest = chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.');

   if !valid_start || !valid_rest {
      return Err(Error::InvalidColumnName {
         name: name.to_string(),
      });
   }

   Ok(())
}

/// Quote a column name with double-quote identifiers.
///
/// Any embedded double quotes are doubled per SQL standard (`"` → `""`).
pub(crate) fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render `predicate` as a `WHERE` condition body.
///
/// `OR` branches are parenthesized; an `AND` or `OR` with no parts renders as the
/// identity of its operator (`1 = 1` or `1 = 0`).
pub fn render_predicate<C: AsRef<str>>(
   predicate: &Predicate<C>,
   param_offset: usize,
) -> Result<SqlFragment> {
   let mut renderer = Renderer {
      next_param: param_offset + 1,
      values: Vec::new(),
   };
   let sql = renderer.render(predicate)?;

   Ok(SqlFragment {
      sql,
      values: renderer.values,
   })
}

/// Render ordering terms as an `ORDER BY` clause.
pub fn render_order_by<C: AsRef<str>>(terms: &[OrderTerm<C>]) -> Result<String> {
   let mut parts = Vec::with_capacity(terms.len());
   for term in terms {
      let name = term.column.as_ref();
      validate_column_name(name)?;
      let dir = match term.direction {
         SortDirection::Asc => "ASC",
         SortDirection::Desc => "DESC",
      };
      parts.push(format!("{} {}", quote_identifier(name), dir));
   }

   Ok(format!("ORDER BY {}", parts.join(", ")))
}

impl<C: Clone + AsRef<str>> CursorGenerator<C> {
   /// The generator's ordering as an `ORDER BY` clause.
   pub fn order_by_sql(&self) -> Result<String> {
      render_order_by(self.order_by())
   }

   /// [`where_clause`](CursorGenerator::where_clause) rendered as SQL.
   pub fn where_sql(
      &self,
      previous: Option<PreviousRow<'_>>,
      param_offset: usize,
   ) -> Result<Option<SqlFragment>> {
      self
         .where_clause(previous)?
         .map(|predicate| render_predicate(&predicate, param_offset))
         .transpose()
   }
}

struct Renderer {
   next_param: usize,
   values: Vec<JsonValue>,
}

impl Renderer {
   fn render<C: AsRef<str>>(&mut self, predicate: &Predicate<C>) -> Result<String> {
      match predicate {
         Predicate::Equals(column, value) => self.comparison(column.as_ref(), "=", value),
         Predicate::GreaterThan(column, value) => self.comparison(column.as_ref(), ">", value),
         Predicate::LessThan(column, value) => self.comparison(column.as_ref(), "<", value),
         Predicate::And(parts) if parts.is_empty() => Ok("1 = 1".to_string()),
         Predicate::Or(parts) if parts.is_empty() => Ok("1 = 0".to_string()),
         Predicate::And(parts) => {
            let mut rendered = Vec::with_capacity(parts.len());
            for part in parts {
               let sql = self.render(part)?;
               rendered.push(match part {
                  Predicate::Or(_) => format!("({sql})"),
                  _ => sql,
               });
            }
            Ok(rendered.join(" AND "))
         }
         Predicate::Or(parts) => {
            let mut rendered = Vec::with_capacity(parts.len());
            for part in parts {
               rendered.push(format!("({})", self.render(part)?));
            }
            Ok(rendered.join(" OR "))
         }
      }
   }

   fn comparison(
      &mut self,
      column: &str,
      op: &str,
      value: &keyset_cursor_codec::CursorValue,
   ) -> Result<String> {
      validate_column_name(column)?;
      let sql = format!("{} {} ${}", quote_identifier(column), op, self.next_param);
      self.next_param += 1;
      self.values.push(value.to_json()?);
      Ok(sql)
   }
}
