//! Canonical ISO-8601 rendering, and the convenience entry points
//! that tie parsing, resolution, and formatting together.
//!
//! There is exactly one output form and nothing to configure:
//! `yyyy-MM-ddTHH:mm:ss.SSS` followed by `Z` for a zero offset or a
//! signed `±HH:mm` otherwise. Every numeric field is zero-padded to
//! its fixed width.
//!
//! The default rendering is deliberately lossy on nonsense input: a
//! negative field renders as nothing at all and a field too wide for
//! its slot renders as all nines, silently. The `*_strict` variants
//! report those cases as errors instead.

use std::error::Error as ErrorTrait;
use std::fmt;
use std::fmt::Display;

use num_traits::PrimInt;
use pad::{PadStr, Alignment};

use cal::{self, CivilDateTime};
use fields::FieldSet;
use parse::{self, Malformed};


/// Parses a complete ISO-8601 string and resolves it to a Unix epoch
/// millisecond, using a fresh field store for the call.
///
/// ### Examples
///
/// ```
/// use isochron::parse_to_millis;
///
/// let millis = parse_to_millis("20160101T042230.123Z").unwrap();
/// assert_eq!(millis, 1_451_622_150_123);
///
/// assert!(parse_to_millis("2016-13-01").is_err());
/// ```
pub fn parse_to_millis(input: &str) -> Result<i64, Error> {
    let mut fields = FieldSet::new();
    let _ = parse::parse(input, 0, &mut fields).map_err(Error::Malformed)?;
    cal::resolve(&fields).map_err(Error::Resolve)
}

/// Renders a Unix epoch millisecond in the canonical form, on the UTC
/// timeline, so the result always ends in `Z`.
///
/// ### Examples
///
/// ```
/// use isochron::millis_to_string;
///
/// assert_eq!(millis_to_string(1_451_622_150_123), "2016-01-01T04:22:30.123Z");
/// assert_eq!(millis_to_string(0), "1970-01-01T00:00:00.000Z");
/// ```
pub fn millis_to_string(millis: i64) -> String {
    format_with_offset(millis, 0)
}

/// Renders a Unix epoch millisecond as wall-clock time in the given
/// zone offset, with the matching `±HH:mm` suffix (or `Z` when the
/// offset is zero).
///
/// ### Examples
///
/// ```
/// use isochron::format_with_offset;
///
/// assert_eq!(format_with_offset(1_451_622_150_123, -3 * 3_600_000),
///            "2016-01-01T01:22:30.123-03:00");
/// ```
pub fn format_with_offset(millis: i64, offset_millis: i32) -> String {
    let mut out = String::with_capacity(29);
    format_with_offset_into(&mut out, millis, offset_millis);
    out
}

/// The appending form of [`format_with_offset`](fn.format_with_offset.html),
/// for callers that reuse a buffer.
pub fn format_with_offset_into(out: &mut String, millis: i64, offset_millis: i32) {
    let civil = CivilDateTime::from_epoch_millis(millis + i64::from(offset_millis));
    format_civil_into(out, &civil, offset_millis);
}

/// Renders already broken-down civil fields with the given offset
/// suffix, lossy fallbacks and all.
pub fn format_civil(civil: &CivilDateTime, offset_millis: i32) -> String {
    let mut out = String::with_capacity(29);
    format_civil_into(&mut out, civil, offset_millis);
    out
}

/// The appending form of [`format_civil`](fn.format_civil.html).
pub fn format_civil_into(out: &mut String, civil: &CivilDateTime, offset_millis: i32) {
    // Lenient rendering cannot fail.
    let _ = render(out, civil, offset_millis, false);
}

/// Like [`format_civil`](fn.format_civil.html), but a negative field
/// or a field too wide for its slot is an error rather than silently
/// corrupted output.
pub fn format_civil_strict(civil: &CivilDateTime, offset_millis: i32) -> Result<String, FormatError> {
    let mut out = String::with_capacity(29);
    render(&mut out, civil, offset_millis, true)?;
    Ok(out)
}

/// Like [`millis_to_string`](fn.millis_to_string.html) with an offset,
/// but strict: an instant whose civil fields cannot be rendered
/// faithfully (such as a negative year) is an error.
pub fn format_with_offset_strict(millis: i64, offset_millis: i32) -> Result<String, FormatError> {
    let civil = CivilDateTime::from_epoch_millis(millis + i64::from(offset_millis));
    format_civil_strict(&civil, offset_millis)
}


fn render(out: &mut String, civil: &CivilDateTime, offset_millis: i32, strict: bool) -> Result<(), FormatError> {
    push_number(out, civil.year, 4, strict)?;
    out.push('-');
    push_number(out, i32::from(civil.month0) + 1, 2, strict)?;
    out.push('-');
    push_number(out, civil.day_of_month, 2, strict)?;
    out.push('T');
    push_number(out, civil.hour, 2, strict)?;
    out.push(':');
    push_number(out, civil.minute, 2, strict)?;
    out.push(':');
    push_number(out, civil.second, 2, strict)?;
    out.push('.');
    push_number(out, civil.millisecond, 3, strict)?;

    if offset_millis == 0 {
        out.push('Z');
        return Ok(());
    }

    let positive = offset_millis > 0;
    let magnitude = offset_millis.abs();
    let hours = magnitude / (60 * 60 * 1000);
    let minutes = (magnitude % (60 * 60 * 1000)) / (60 * 1000);

    // An offset of less than a whole minute leaves nothing to render,
    // so it collapses to Zulu.
    if hours == 0 && minutes == 0 {
        out.push('Z');
        return Ok(());
    }

    out.push(if positive { '+' } else { '-' });
    push_number(out, hours, 2, strict)?;
    out.push(':');
    push_number(out, minutes, 2, strict)?;
    Ok(())
}

/// Writes `value` zero-padded to exactly `width` digits.
///
/// When not strict, a negative value writes no digits at all and a
/// value too wide for the field writes all nines, both without
/// complaint.
fn push_number<N: PrimInt + Display>(out: &mut String, value: N, width: usize, strict: bool) -> Result<(), FormatError> {
    if value < N::zero() {
        if strict {
            return Err(FormatError::NegativeField);
        }
        return Ok(());
    }

    let digits = value.to_string();
    if digits.len() > width {
        if strict {
            return Err(FormatError::FieldTooWide);
        }
        for _ in 0 .. width {
            out.push('9');
        }
        return Ok(());
    }

    out.push_str(&digits.pad(width, '0', Alignment::Right, false));
    Ok(())
}


/// Failures of the strict rendering variants.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum FormatError {
    NegativeField,
    FieldTooWide,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FormatError::NegativeField  => write!(f, "field value is negative"),
            FormatError::FieldTooWide   => write!(f, "field value does not fit its width"),
        }
    }
}

impl ErrorTrait for FormatError {
}


/// Everything that can go wrong between a string and an epoch
/// millisecond.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Error {

    /// The string was not well-formed ISO-8601.
    Malformed(Malformed),

    /// The string was well-formed, but a field was outside the range
    /// the calendar gives it.
    Resolve(cal::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Malformed(ref e)  => write!(f, "parse error: {}", e),
            Error::Resolve(ref e)    => write!(f, "parsing resulted in an invalid date: {}", e),
        }
    }
}

impl ErrorTrait for Error {
    fn cause(&self) -> Option<&dyn ErrorTrait> {
        match *self {
            Error::Malformed(ref e)  => Some(e),
            Error::Resolve(ref e)    => Some(e),
        }
    }
}
