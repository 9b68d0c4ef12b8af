//! Ordering terms and boolean predicates over column handles.
//!
//! Both types are plain data. They are generic over the column handle `C` so any query
//! layer can consume them; [`sql`](crate::sql) renders them for handles that name a
//! column directly.

use keyset_cursor_codec::CursorValue;

use crate::config::SortDirection;

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderTerm<C> {
   pub column: C,
   pub direction: SortDirection,
}

impl<C> OrderTerm<C> {
   pub fn asc(column: C) -> Self {
      Self {
         column,
         direction: SortDirection::Asc,
      }
   }

   pub fn desc(column: C) -> Self {
      Self {
         column,
         direction: SortDirection::Desc,
      }
   }
}

/// Boolean expression tree built from comparisons, `AND` and `OR`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate<C> {
   /// `column = value`
   Equals(C, CursorValue),
   /// `column > value`
   GreaterThan(C, CursorValue),
   /// `column < value`
   LessThan(C, CursorValue),
   /// All parts hold
   And(Vec<Predicate<C>>),
   /// At least one part holds
   Or(Vec<Predicate<C>>),
}

impl<C> Predicate<C> {
   pub fn equals(column: C, value: impl Into<CursorValue>) -> Self {
      Predicate::Equals(column, value.into())
   }

   pub fn greater_than(column: C, value: impl Into<CursorValue>) -> Self {
      Predicate::GreaterThan(column, value.into())
   }

   pub fn less_than(column: C, value: impl Into<CursorValue>) -> Self {
      Predicate::LessThan(column, value.into())
   }

   /// The strict comparison that moves past `value` in `direction`: `>` when ascending,
   /// `<` when descending.
   pub fn past(direction: SortDirection, column: C, value: impl Into<CursorValue>) -> Self {
      match direction {
         SortDirection::Asc => Self::greater_than(column, value),
         SortDirection::Desc => Self::less_than(column, value),
      }
   }

   /// Conjunction of `parts`. No parts gives `None`; a single part is returned as-is.
   pub fn and(parts: impl IntoIterator<Item = Self>) -> Option<Self> {
      Self::group(parts, Predicate::And)
   }

   /// Disjunction of `parts`. No parts gives `None`; a single part is returned as-is.
   pub fn or(parts: impl IntoIterator<Item = Self>) -> Option<Self> {
      Self::group(parts, Predicate::Or)
   }

   fn group(parts: impl IntoIterator<Item = Self>, wrap: fn(Vec<Self>) -> Self) -> Option<Self> {
      let mut parts: Vec<Self> = parts.into_iter().collect();
      match parts.len() {
         0 => None,
         1 => parts.pop(),
         _ => Some(wrap(parts)),
      }
   }

   /// Number of comparisons in the tree.
   pub fn comparison_count(&self) -> usize {
      match self {
         Predicate::Equals(..) | Predicate::GreaterThan(..) | Predicate::LessThan(..) => 1,
         Predicate::And(parts) | Predicate::Or(parts) => {
            parts.iter().map(Predicate::comparison_count).sum()
         }
      }
   }

   /// Column handles in the order they are compared.
   pub fn columns(&self) -> Vec<&C> {
      let mut columns = Vec::new();
      self.collect_columns(&mut columns);
      columns
   }

   fn collect_columns<'a>(&'a self, out: &mut Vec<&'a C>) {
      match self {
         Predicate::Equals(column, _)
         | Predicate::GreaterThan(column, _)
         | Predicate::LessThan(column, _) => out.push(column),
         Predicate::And(parts) | Predicate::Or(parts) => {
            for part in parts {
               part.collect_columns(out);
            }
         }
      }
   }
}
