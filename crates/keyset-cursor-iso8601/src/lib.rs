//! # keyset-cursor-iso8601
//!
//! Recognizes the ISO-8601 profile that keyset cursors treat as temporal data:
//!
//! - **Full date**: `YYYY-MM-DD`
//! - **Date-time**: a full date, a `T` or single-space separator, then `HH:MM`, optionally
//!   `:SS`, optionally `.` plus 1–3 fractional-second digits, optionally a zone (`Z` or
//!   `±HH:MM`)
//!
//! Validation is layered: the string must match the grammar, every time field must be in
//! bounds, the calendar fields must survive a round-trip through a real UTC instant (which
//! is what rejects `2022-02-29` or `2022-04-31`), and finally the configured
//! [`HostDateGrammar`] must accept the untouched input.
//!
//! ```
//! use keyset_cursor_iso8601::is_valid_date_or_date_time;
//!
//! assert!(is_valid_date_or_date_time("2000-02-29"));
//! assert!(is_valid_date_or_date_time("2022-03-29T12:30:45.123Z"));
//! assert!(!is_valid_date_or_date_time("2022-02-29"));
//! ```

mod grammar;

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

pub use grammar::{HostDateGrammar, PermissiveGrammar, Rfc3339Grammar};

/// Largest accepted zone offset, in hours. `+14:00` is allowed, `+14:01` is not.
const MAX_OFFSET_HOURS: u8 = 14;

fn date_time_pattern() -> &'static Regex {
   static RE: OnceLock<Regex> = OnceLock::new();
   RE.get_or_init(|| {
      Regex::new(
         r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?:[T ]([0-9]{2}):([0-9]{2})(?::([0-9]{2})(?:\.([0-9]{1,3}))?)?(Z|[+-][0-9]{2}:[0-9]{2})?)?$",
      )
      .expect("invalid regex")
   })
}

/// Zone designator captured from a date-time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
   Utc,
   Offset { negative: bool, hours: u8, minutes: u8 },
}

/// Numeric fields extracted by the grammar. Missing time fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fields {
   year: i32,
   month: u8,
   day: u8,
   hour: u8,
   minute: u8,
   second: u8,
   millisecond: u16,
   zone: Option<Zone>,
}

impl Fields {
   /// Match `value` against the grammar and pull out its numeric fields.
   fn capture(value: &str) -> Option<Self> {
      let caps = date_time_pattern().captures(value)?;
      let number = |idx: usize| caps.get(idx).map(|m| m.as_str());

      // A fraction of "5" means 500 ms, "12" means 120 ms.
      let millisecond = match number(7) {
         Some(frac) => format!("{frac:0<3}").parse().ok()?,
         None => 0,
      };

      let zone = match number(8) {
         None => None,
         Some("Z") => Some(Zone::Utc),
         Some(offset) => Some(Zone::Offset {
            negative: offset.starts_with('-'),
            hours: offset[1..3].parse().ok()?,
            minutes: offset[4..6].parse().ok()?,
         }),
      };

      Some(Self {
         year: number(1)?.parse().ok()?,
         month: number(2)?.parse().ok()?,
         day: number(3)?.parse().ok()?,
         hour: number(4).map_or(Some(0), |h| h.parse().ok())?,
         minute: number(5).map_or(Some(0), |m| m.parse().ok())?,
         second: number(6).map_or(Some(0), |s| s.parse().ok())?,
         millisecond,
         zone,
      })
   }

   /// Clock fields stay within a day and the offset within `±14:00`.
   fn in_bounds(&self) -> bool {
      if self.hour > 23 || self.minute > 59 || self.second > 59 {
         return false;
      }

      match self.zone {
         Some(Zone::Offset { hours, minutes, .. }) => {
            hours <= MAX_OFFSET_HOURS
               && minutes <= 59
               && (hours < MAX_OFFSET_HOURS || minutes == 0)
         }
         _ => true,
      }
   }

   /// Build the UTC instant and check it decomposes back into the same fields.
   fn to_utc_instant(self) -> Option<OffsetDateTime> {
      let month = Month::try_from(self.month).ok()?;
      let date = Date::from_calendar_date(self.year, month, self.day).ok()?;
      let time =
         Time::from_hms_milli(self.hour, self.minute, self.second, self.millisecond).ok()?;
      let instant = PrimitiveDateTime::new(date, time).assume_utc();

      let round_trips = instant.year() == self.year
         && u8::from(instant.month()) == self.month
         && instant.day() == self.day
         && instant.hour() == self.hour
         && instant.minute() == self.minute
         && instant.second() == self.second
         && instant.millisecond() == self.millisecond;

      round_trips.then_some(instant)
   }
}

/// Local wall-clock time minus the offset gives UTC. The result must stay within
/// UTC years `0000..=9999`.
fn apply_zone(instant: OffsetDateTime, zone: Option<Zone>) -> Option<OffsetDateTime> {
   let Some(Zone::Offset {
      negative,
      hours,
      minutes,
   }) = zone
   else {
      return Some(instant);
   };

   let sign: i8 = if negative { -1 } else { 1 };
   let offset = UtcOffset::from_hms(sign * hours as i8, sign * minutes as i8, 0).ok()?;

   instant
      .replace_offset(offset)
      .checked_to_offset(UtcOffset::UTC)
      .filter(|utc| (0..=9999).contains(&utc.year()))
}

/// Classifies strings as ISO-8601 dates or date-times and converts them to UTC instants.
///
/// The final acceptance gate is delegated to a [`HostDateGrammar`]. The default is
/// [`PermissiveGrammar`], which adds no constraints beyond the grammar above.
#[derive(Clone)]
pub struct Iso8601Validator {
   host: Arc<dyn HostDateGrammar>,
}

impl Default for Iso8601Validator {
   fn default() -> Self {
      Self::new()
   }
}

impl fmt::Debug for Iso8601Validator {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Iso8601Validator")
         .field("host", &self.host.name())
         .finish()
   }
}

impl Iso8601Validator {
   /// Create a validator using the permissive host grammar.
   pub fn new() -> Self {
      Self {
         host: Arc::new(PermissiveGrammar),
      }
   }

   /// Create a validator whose last step consults `host`.
   pub fn with_host(host: impl HostDateGrammar + 'static) -> Self {
      Self {
         host: Arc::new(host),
      }
   }

   /// Whether `value` is a valid ISO-8601 date or date-time.
   pub fn is_valid(&self, value: &str) -> bool {
      self.parse(value).is_some()
   }

   /// Convert `value` to a UTC instant, or `None` if it is not a valid date or date-time.
   ///
   /// Date-only values and date-times without a zone are read as UTC.
   pub fn parse(&self, value: &str) -> Option<OffsetDateTime> {
      let fields = Fields::capture(value)?;
      if !fields.in_bounds() {
         return None;
      }

      let instant = apply_zone(fields.to_utc_instant()?, fields.zone)?;

      self.host.accepts(value).then_some(instant)
   }
}

/// Whether `value` is a valid ISO-8601 date or date-time, using the default validator.
pub fn is_valid_date_or_date_time(value: &str) -> bool {
   Iso8601Validator::new().is_valid(value)
}

/// Convert `value` to a UTC instant using the default validator.
pub fn parse_date_or_date_time(value: &str) -> Option<OffsetDateTime> {
   Iso8601Validator::new().parse(value)
}
