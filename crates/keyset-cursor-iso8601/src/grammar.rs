//! Host date grammars consulted as the last validation step.
//!
//! Different platforms disagree on which ISO-8601 spellings their native date parsers
//! accept (for example, a space instead of `T`). A [`HostDateGrammar`] captures that
//! platform's answer so the divergence is explicit rather than guessed.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Final acceptance check applied to the original, unmodified input string.
pub trait HostDateGrammar: Send + Sync {
   /// Whether the host's own date parser accepts `value`.
   fn accepts(&self, value: &str) -> bool;

   /// Short name used in debug output.
   fn name(&self) -> &'static str;
}

/// Accepts everything the structural checks accept.
///
/// Rust has no ambient "generic" date parser, so by default the host step adds no
/// constraint. Inputs such as `2022-03-29 12:30` are therefore accepted here even though
/// some JavaScript engines reject them.
#[derive(Debug, Default, Clone, Copy)]
pub struct PermissiveGrammar;

impl HostDateGrammar for PermissiveGrammar {
   fn accepts(&self, _value: &str) -> bool {
      true
   }

   fn name(&self) -> &'static str {
      "permissive"
   }
}

/// Accepts plain `YYYY-MM-DD` dates and complete RFC 3339 timestamps only.
///
/// Date-times without seconds or without a zone are rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rfc3339Grammar;

impl HostDateGrammar for Rfc3339Grammar {
   fn accepts(&self, value: &str) -> bool {
      if Date::parse(value, format_description!("[year]-[month]-[day]")).is_ok() {
         return true;
      }
      OffsetDateTime::parse(value, &Rfc3339).is_ok()
   }

   fn name(&self) -> &'static str {
      "rfc3339"
   }
}
