//! The hand-written ISO-8601 parsers.
//!
//! Each parser walks the input left to right, writing every field it
//! recognises straight into a [`FieldSet`](../fields/struct.FieldSet.html),
//! and reports either the position just past the last character it
//! consumed or the exact position where the input stopped making
//! sense. There is no recovery: the first malformed character aborts
//! the whole parse.
//!
//! The sub-parsers are happy to stop early at a component boundary -
//! `"2016"` is a complete date - but the top-level [`parse`](fn.parse.html)
//! only succeeds once the entire input has been consumed.

use std::error::Error as ErrorTrait;
use std::fmt;

use fields::FieldSet;
use scan::{scan_number, count_digits};


/// The one way parsing can fail: a malformed character (or missing
/// data) at a known position.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct Malformed {
    position: usize,
}

impl Malformed {
    pub(crate) fn at(position: usize) -> Self {
        Self { position }
    }

    /// The 0-based byte offset at which the mismatch was detected.
    /// For input that ends too early, this is the input length.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "malformed ISO-8601 input at offset {}", self.position)
    }
}

impl ErrorTrait for Malformed {
}


/// Parses a complete ISO-8601 string into `out`, which is cleared
/// first. Valid inputs are a date, optionally followed by a separator
/// (`T`, `t`, or a space), a time, and a zone offset.
///
/// Returns the position just past the last consumed character, which
/// on success is always the end of the input: anything left over after
/// the zone offset is an error at the first unconsumed position.
///
/// ### Examples
///
/// ```
/// use isochron::{parse, FieldSet};
///
/// let mut fields = FieldSet::new();
/// assert_eq!(parse("2016-W09-4T04:05", 0, &mut fields), Ok(16));
/// assert_eq!(fields.week_of_year(), Some(9));
/// assert_eq!(fields.hour(), Some(4));
/// ```
pub fn parse(s: &str, off: usize, out: &mut FieldSet) -> Result<usize, Malformed> {
    let bytes = s.as_bytes();
    let end = bytes.len();

    out.clear();
    let mut pos = parse_date(s, off, out)?;
    if pos == end {
        return Ok(pos);
    }

    // Formally only a 'T' may separate date and time, but a lower-case
    // 't' and a single space are accepted here too.
    match bytes[pos] {
        b' ' | b'T' | b't'  => pos += 1,
        _                   => return Err(Malformed::at(pos)),
    }

    pos = parse_time(s, pos, out)?;
    if pos == end {
        return Ok(pos);
    }

    pos = parse_zone_offset(s, pos, out)?;
    if pos == end {
        return Ok(pos);
    }

    // Trailing input the zone offset did not account for.
    Err(Malformed::at(pos))
}

/// Parses the date component. Valid forms:
///
/// - `yyyy`
/// - `yyyy-MM`
/// - `yyyy-MM-dd`
/// - `yyyy-Www`
/// - `yyyy-Www-d`
/// - `yyyy-DDD`
/// - `yyyyMMdd`
/// - `yyyyWww`
/// - `yyyyWwwd`
/// - `yyyyDDD`
///
/// Note that `yyyyMM` is *not* a valid form: without dashes, a month
/// must have a day attached.
///
/// The fields written to `out` are assumed to be clear.
pub fn parse_date(s: &str, pos: usize, out: &mut FieldSet) -> Result<usize, Malformed> {
    let s = s.as_bytes();
    let end = s.len();
    let mut pos = pos;

    let year = scan_number(s, pos, 4)?;
    out.set_year(i64::from(year));
    pos += 4;
    if pos == end {
        // Done at year.
        return Ok(pos);
    }

    // One peek decides dashed or compact mode for the whole date.
    let dashed = s[pos] == b'-';
    if dashed {
        pos += 1;
        if pos == end {
            // A trailing dash promised another component.
            return Err(Malformed::at(pos));
        }
    }

    if s[pos] == b'w' || s[pos] == b'W' {
        // Week format: yyyy-Www or yyyyWww.
        pos += 1;
        let week = scan_number(s, pos, 2)?;
        pos += 2;
        out.set_week_of_year(week as i8);

        if pos == end {
            // Done at week.
            return Ok(pos);
        }

        // Day of week: yyyy-Www-d or yyyyWwwd.
        if dashed {
            if s[pos] != b'-' {
                // Stop at week.
                return Ok(pos);
            }
            pos += 1;
            let day = scan_number(s, pos, 1)?;
            pos += 1;
            out.set_day_of_week(wrap_weekday(day));
        }
        else {
            match scan_number(s, pos, 1) {
                Ok(day) => {
                    pos += 1;
                    out.set_day_of_week(wrap_weekday(day));
                }
                // A week alone is a valid terminal date.
                Err(_) => {}
            }
        }

        return Ok(pos);
    }

    // Month (MM) or day-of-year (DDD). The count of digits remaining
    // decides: two or four mean a month (four when a compact day is
    // attached to it), three mean an ordinal date. This check is what
    // makes a bare yyyyMM unreachable: a compact month must bring its
    // day along.
    match count_digits(s, pos, 4) {
        0 => {
            // Done at year.
            return Ok(pos);
        }
        1 => {
            // Neither a month nor the start of anything longer.
            return Err(Malformed::at(pos));
        }
        2 if !dashed => {
            // A compact month with no day attached.
            return Err(Malformed::at(pos));
        }
        3 => {
            let day = scan_number(s, pos, 3)?;
            pos += 3;
            out.set_day_of_year(day as i16);
            // Nothing follows an ordinal date.
            return Ok(pos);
        }
        _ => {
            let month = scan_number(s, pos, 2)?;
            pos += 2;
            out.set_month0(month as i8 - 1);
        }
    }

    if pos == end {
        // Done at month.
        return Ok(pos);
    }

    // Day of month.
    if dashed {
        if s[pos] != b'-' {
            // Done at month.
            return Ok(pos);
        }
        pos += 1;
        let day = scan_number(s, pos, 2)?;
        pos += 2;
        out.set_day_of_month(day as i8);
    }
    else {
        match scan_number(s, pos, 2) {
            Ok(day) => {
                pos += 2;
                out.set_day_of_month(day as i8);
            }
            // Done at month.
            Err(_) => {}
        }
    }

    Ok(pos)
}

/// Maps a raw day-of-week digit onto the canonical 1-to-7 range that
/// begins at Sunday: the ISO digits use 7 for Sunday, so 7 wraps
/// around to 1 and every other digit shifts up by one.
fn wrap_weekday(digit: u32) -> i8 {
    ((digit % 7) + 1) as i8
}

/// Parses the time component. Valid forms:
///
/// - `HH`
/// - `HH:mm`
/// - `HH:mm:ss`
/// - `HH:mm:ss.SSS`
/// - `HHmm`
/// - `HHmmss`
/// - `HHmmss.SSS`
///
/// The fields written to `out` are assumed to be clear.
pub fn parse_time(s: &str, pos: usize, out: &mut FieldSet) -> Result<usize, Malformed> {
    let s = s.as_bytes();
    let end = s.len();
    let mut pos = pos;

    let hour = scan_number(s, pos, 2)?;
    pos += 2;
    out.set_hour(hour as i8);

    if pos == end {
        // Done at hour.
        return Ok(pos);
    }

    // One peek decides colon or compact mode for the whole time.
    let colons = s[pos] == b':';

    let minute = if colons {
        pos += 1;
        // The colon committed to a minute.
        scan_number(s, pos, 2)?
    }
    else {
        match scan_number(s, pos, 2) {
            Ok(minute) => minute,
            // Done at hour. No error.
            Err(_) => return Ok(pos),
        }
    };
    pos += 2;
    out.set_minute(minute as i8);

    if pos == end {
        // Done at minute.
        return Ok(pos);
    }

    let second = if colons {
        if s[pos] != b':' {
            // Done at minute.
            return Ok(pos);
        }
        pos += 1;
        scan_number(s, pos, 2)?
    }
    else {
        match scan_number(s, pos, 2) {
            Ok(second) => second,
            // Done at minute.
            Err(_) => return Ok(pos),
        }
    };
    pos += 2;
    out.set_second(second as i8);

    if pos == end || s[pos] != b'.' {
        // Done at seconds, whichever mode we were in.
        return Ok(pos);
    }

    // The dot committed to exactly three millisecond digits.
    pos += 1;
    let millisecond = scan_number(s, pos, 3)?;
    pos += 3;
    out.set_millisecond(millisecond as i16);

    Ok(pos)
}

/// Parses the zone offset component. Valid forms:
///
/// - `Z` (and a lower-case `z`, which is not 8601-compliant but
///   accepted here)
/// - `±HH`
/// - `±HH:mm`
/// - `±HHmm`
///
/// A zone offset, once invoked, must consume at least one character:
/// empty input is an error. Zulu time sets nothing, since a zero
/// offset is exactly what an unset slot means to the resolver.
pub fn parse_zone_offset(s: &str, pos: usize, out: &mut FieldSet) -> Result<usize, Malformed> {
    let s = s.as_bytes();
    let end = s.len();
    let mut pos = pos;

    if pos == end {
        // No data.
        return Err(Malformed::at(pos));
    }

    let sign: i32 = match s[pos] {
        b'z' | b'Z'  => return Ok(pos + 1),
        b'+'         => 1,
        b'-'         => -1,
        _            => return Err(Malformed::at(pos)),
    };
    pos += 1;

    let hours = scan_number(s, pos, 2)?;
    pos += 2;
    let mut offset = hours as i32 * (60 * 60 * 1000);

    if pos == end {
        // Done at hours.
        out.set_zone_offset_millis(sign * offset);
        return Ok(pos);
    }

    if s[pos] == b':' {
        pos += 1;
        // The colon committed to minutes.
        let minutes = scan_number(s, pos, 2)?;
        pos += 2;
        offset += minutes as i32 * (60 * 1000);
    }
    else {
        match scan_number(s, pos, 2) {
            Ok(minutes) => {
                pos += 2;
                offset += minutes as i32 * (60 * 1000);
            }
            Err(_) => {
                // Done at hours.
                out.set_zone_offset_millis(sign * offset);
                return Ok(pos);
            }
        }
    }

    out.set_zone_offset_millis(sign * offset);
    Ok(pos)
}


#[cfg(test)]
mod test {
    use super::{parse, Malformed};
    use fields::FieldSet;

    fn parsed(input: &str) -> FieldSet {
        let mut fields = FieldSet::new();
        let result = parse(input, 0, &mut fields);
        assert_eq!(result, Ok(input.len()), "{:?} should parse fully", input);
        fields
    }

    fn failure(input: &str) -> usize {
        let mut fields = FieldSet::new();
        match parse(input, 0, &mut fields) {
            Ok(pos) => panic!("{:?} parsed to {} but should fail", input, pos),
            Err(e)  => e.position(),
        }
    }

    #[test]
    fn year_alone() {
        let fields = parsed("2016");
        assert_eq!(fields.year(), Some(2016));
        assert_eq!(fields, {
            let mut only_year = FieldSet::new();
            only_year.set_year(2016);
            only_year
        });
    }

    #[test]
    fn year_and_month() {
        let fields = parsed("2016-03");
        assert_eq!(fields.year(), Some(2016));
        assert_eq!(fields.month0(), Some(2));
        assert_eq!(fields.day_of_month(), None);
    }

    #[test]
    fn calendar_dates() {
        for input in &["2016-03-03", "20160303"] {
            let fields = parsed(input);
            assert_eq!(fields.year(), Some(2016));
            assert_eq!(fields.month0(), Some(2));
            assert_eq!(fields.day_of_month(), Some(3));
        }
    }

    #[test]
    fn ordinal_dates() {
        for input in &["2016-063", "2016063"] {
            let fields = parsed(input);
            assert_eq!(fields.year(), Some(2016));
            assert_eq!(fields.day_of_year(), Some(63));
            assert_eq!(fields.month0(), None);
        }
    }

    #[test]
    fn week_dates() {
        for input in &["2016-W09", "2016W09"] {
            let fields = parsed(input);
            assert_eq!(fields.week_of_year(), Some(9));
            assert_eq!(fields.day_of_week(), None);
        }

        for input in &["2016-W09-4", "2016W094"] {
            let fields = parsed(input);
            assert_eq!(fields.week_of_year(), Some(9));
            assert_eq!(fields.day_of_week(), Some(5));
        }
    }

    // Raw day 7 wraps around to canonical day 1, and days 1 to 6 map
    // to 2 to 7. Deliberate behaviour, pinned here; see DESIGN.md.
    #[test]
    fn weekday_wrap_around() {
        assert_eq!(parsed("2016-W01-7").day_of_week(), Some(1));
        for digit in 1 .. 7 {
            let fields = parsed(&format!("2016-W01-{}", digit));
            assert_eq!(fields.day_of_week(), Some(digit as i8 + 1));
        }
    }

    #[test]
    fn compact_month_without_day_is_invalid() {
        // yyyyMM is not a valid form: without dashes a month must have
        // a day attached. The dashed grammar has no such restriction.
        assert_eq!(failure("201601"), 4);
        assert_eq!(failure("201603T04"), 4);
        assert_eq!(parsed("2016-03").month0(), Some(2));
    }

    #[test]
    fn lone_digit_after_year() {
        assert_eq!(failure("2016-1"), 5);
        assert_eq!(failure("20161"), 4);
    }

    #[test]
    fn dangling_dash() {
        assert_eq!(failure("2016-"), 5);
    }

    #[test]
    fn times() {
        let fields = parsed("2016-03-03T04");
        assert_eq!(fields.hour(), Some(4));
        assert_eq!(fields.minute(), None);

        for input in &["2016-03-03T04:05", "2016-03-03T0405"] {
            let fields = parsed(input);
            assert_eq!(fields.hour(), Some(4));
            assert_eq!(fields.minute(), Some(5));
            assert_eq!(fields.second(), None);
        }

        for input in &["2016-03-03T04:05:06", "2016-03-03T040506"] {
            let fields = parsed(input);
            assert_eq!(fields.second(), Some(6));
            assert_eq!(fields.millisecond(), None);
        }

        for input in &["2016-03-03T04:05:06.123", "2016-03-03T040506.123"] {
            let fields = parsed(input);
            assert_eq!(fields.millisecond(), Some(123));
        }
    }

    #[test]
    fn separators() {
        for input in &["2016-03-03T04", "2016-03-03t04", "2016-03-03 04"] {
            assert_eq!(parsed(input).hour(), Some(4));
        }

        // Anything else in the separator slot fails right there.
        assert_eq!(failure("2016-03-03x04"), 10);
    }

    #[test]
    fn committed_colon_needs_minutes() {
        assert_eq!(failure("2016-03-03T04:"), 14);
        assert_eq!(failure("2016-03-03T04:0"), 15);
        assert_eq!(failure("2016-03-03T04:xx"), 14);
    }

    #[test]
    fn committed_dot_needs_three_millisecond_digits() {
        assert_eq!(failure("2016-03-03T04:05:06."), 20);
        assert_eq!(failure("2016-03-03T04:05:06.12"), 22);
        assert_eq!(failure("2016-03-03T04:05:06.1234"), 23);
    }

    #[test]
    fn zulu_sets_no_offset() {
        for input in &["2016-03-03T04:05:06.123Z", "2016-03-03T04:05:06.123z"] {
            assert_eq!(parsed(input).zone_offset_millis(), None);
        }
    }

    #[test]
    fn numeric_offsets() {
        assert_eq!(parsed("2016-03-03T04+05").zone_offset_millis(),
                   Some(5 * 3_600_000));
        assert_eq!(parsed("2016-03-03T04+05:30").zone_offset_millis(),
                   Some(5 * 3_600_000 + 30 * 60_000));
        assert_eq!(parsed("2016-03-03T04+0530").zone_offset_millis(),
                   Some(5 * 3_600_000 + 30 * 60_000));
        assert_eq!(parsed("2016-03-03T04-08:30").zone_offset_millis(),
                   Some(-(8 * 3_600_000 + 30 * 60_000)));
    }

    #[test]
    fn bad_offsets() {
        assert_eq!(failure("2016-03-03T04:05:06.123Z+00:00"), 24);
        assert_eq!(failure("2016-03-03T04+Z00"), 14);
        assert_eq!(failure("2016-03-03T04+"), 14);
        assert_eq!(failure("2016-03-03T04+05:"), 17);
    }

    // A dash consumed after the year commits the date to dashed mode,
    // but a later missing dash is a component boundary, not an error;
    // the separator check then decides.
    #[test]
    fn dashed_mode_boundaries() {
        assert_eq!(parsed("2016-03T04").hour(), Some(4));
        assert_eq!(parsed("2016-W09T04").hour(), Some(4));
        assert_eq!(failure("2016-03x04"), 7);
    }

    #[test]
    fn out_of_range_values_still_scan() {
        // Range policy lives in the calendar resolver, not here.
        let fields = parsed("2016-13-01");
        assert_eq!(fields.month0(), Some(12));
        assert_eq!(parsed("2016-03-03T29").hour(), Some(29));
    }

    #[test]
    fn empty_input() {
        assert_eq!(failure(""), 0);
    }

    #[test]
    fn truncated_year() {
        assert_eq!(failure("20"), 2);
    }

    #[test]
    fn stale_fields_are_cleared() {
        let mut fields = FieldSet::new();
        assert!(parse("2016-03-03T04:05:06.123+01:00", 0, &mut fields).is_ok());
        assert!(parse("2017", 0, &mut fields).is_ok());

        let mut expected = FieldSet::new();
        expected.set_year(2017);
        assert_eq!(fields, expected);
    }

    #[test]
    fn parse_at_offset() {
        let mut fields = FieldSet::new();
        let input = "ts=2016-063";
        assert_eq!(parse(input, 3, &mut fields), Ok(input.len()));
        assert_eq!(fields.day_of_year(), Some(63));
    }

    #[test]
    fn error_display() {
        let error = Malformed::at(14);
        assert_eq!(error.to_string(), "malformed ISO-8601 input at offset 14");
    }
}
