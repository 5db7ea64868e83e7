#![crate_name = "isochron"]
#![crate_type = "rlib"]

#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]

#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused_qualifications)]
#![warn(unused_results)]

//! Hand-written [ ISO-8601 ](https://www.iso.org/iso-8601-date-and-time-format.html)
//! date and time parsing and formatting.
//!
//! The parser accepts the calendar-date, week-date, and ordinal-date
//! notations in both their extended (`2016-01-01`) and basic
//! (`20160101`) forms, an optional time of day down to milliseconds,
//! and an optional numeric or Zulu zone offset. The formatter renders
//! a single canonical form, `yyyy-MM-ddTHH:mm:ss.SSS` followed by `Z`
//! or `±HH:mm`. Intervals are not implemented.
//!
//! Parsing writes individual fields into a [`FieldSet`](fields/struct.FieldSet.html)
//! as it advances through the string, so `"2016"` on its own is a
//! complete, valid input that sets nothing but the year. Turning a
//! field set into an epoch millisecond - including the defaulting of
//! fields the input never mentioned - is the job of the [`cal`](cal/index.html)
//! module, not of the parser.
//!
//! # Examples
//!
//! ```
//! let millis = isochron::parse_to_millis("2016-01-01T04:22:30.123Z").unwrap();
//! assert_eq!(millis, 1_451_622_150_123);
//! assert_eq!(isochron::millis_to_string(millis), "2016-01-01T04:22:30.123Z");
//! ```

extern crate num_traits;
extern crate pad;

pub mod cal;
pub mod fields;
pub mod iso;
pub mod parse;
mod scan;
mod util;

pub use cal::CivilDateTime;
pub use fields::FieldSet;
pub use iso::{millis_to_string, format_with_offset, parse_to_millis, Error};
pub use parse::{parse, Malformed};
