//! Gregorian calendar arithmetic.
//!
//! This is the collaborator that gives parsed fields a meaning: it
//! resolves a populated [`FieldSet`](../fields/struct.FieldSet.html)
//! to a Unix epoch millisecond, filling in defaults for the slots the
//! input never set, and it breaks an epoch millisecond back into the
//! civil fields the formatter renders. Range policy lives here too -
//! the parser happily scans a thirteenth month, and it is this module
//! that rejects it.

use std::cmp;
use std::error::Error as ErrorTrait;
use std::fmt;

use fields::FieldSet;
use util::RangeExt;


/// Number of days guaranteed to be in four years.
const DAYS_IN_4Y: i64 = 365 * 4 + 1;

/// Number of days guaranteed to be in a hundred years.
const DAYS_IN_100Y: i64 = 365 * 100 + 24;

/// Number of days guaranteed to be in four hundred years.
const DAYS_IN_400Y: i64 = 365 * 400 + 97;

/// Number of milliseconds in a day. As everywhere in this library,
/// leap seconds are simply ignored.
const MILLIS_IN_DAY: i64 = 86_400_000;

/// Number of days between **1st January, 1970** and **1st March, 2000**.
///
/// The reference point sits immediately after a possible leap day at
/// the very end of a 400-year Gregorian cycle, which reduces the
/// civil-date calculations below to plain division. Day counts
/// exchanged with callers are always relative to the Unix epoch; this
/// constant shifts them onto the reference point and back.
const EPOCH_DIFFERENCE: i64 = 30 * 365   // 30 years between 2000 and 1970...
                            + 7          // plus seven days for leap years...
                            + 31 + 29;   // plus all the days in January and February in 2000.

/// Number of days elapsed in a year *before* each month begins, with
/// no leap day counted.
const DAYS_BEFORE_MONTH: [i64; 12] = [
      0,  31,  59,  90, 120, 151,
    181, 212, 243, 273, 304, 334,
];

/// The length of each month in a non-leap year.
const DAYS_IN_MONTH: [i64; 12] = [
    31, 28, 31, 30, 31, 30,
    31, 31, 30, 31, 30, 31,
];

/// This rather strange triangle is an array of the number of days
/// elapsed at the end of each month, starting at the beginning of
/// March (the month right after the reference point above), going
/// backwards, ignoring February.
const TIME_TRIANGLE: [i64; 11] =
    [31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30 + 31 + 31,  // January
     31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30 + 31,  // December
     31 + 30 + 31 + 30 + 31 + 31 + 30 + 31 + 30,  // November
     31 + 30 + 31 + 30 + 31 + 31 + 30 + 31,  // October
     31 + 30 + 31 + 30 + 31 + 31 + 30,  // September
     31 + 30 + 31 + 30 + 31 + 31,  // August
     31 + 30 + 31 + 30 + 31,  // July
     31 + 30 + 31 + 30,  // June
     31 + 30 + 31,  // May
     31 + 30,  // April
     31]; // March


/// Resolution failures: some field, after defaulting, was outside the
/// range the Gregorian calendar gives it.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Error {
    OutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "datetime field out of range")
    }
}

impl ErrorTrait for Error {
}


/// Resolves a populated field set to a Unix epoch millisecond.
///
/// Unset slots fall back to their defaults: 1970 for the year, the
/// first day of January for the date, midnight for the time, and zero
/// for the zone offset. When more than one date notation was set,
/// day-of-year wins over week-of-year, which wins over month and
/// day-of-month. An unset day-of-week in a week date defaults to
/// Monday, the first day of an ISO week.
///
/// Date fields are range-checked; time fields combine arithmetically,
/// so a lenient hour of 24 simply rolls into the next day.
///
/// ### Examples
///
/// ```
/// use isochron::{parse, FieldSet};
/// use isochron::cal;
///
/// let mut fields = FieldSet::new();
/// parse("1970-003", 0, &mut fields).unwrap();
/// assert_eq!(cal::resolve(&fields), Ok(2 * 86_400_000));
/// ```
pub fn resolve(fields: &FieldSet) -> Result<i64, Error> {
    let year = fields.year().unwrap_or(1970);

    let days = if let Some(yearday) = fields.day_of_year() {
        days_from_yd(year, i64::from(yearday))?
    }
    else if let Some(week) = fields.week_of_year() {
        // The canonical day-of-week range begins at Sunday; week
        // resolution wants days counted from Monday.
        let weekday = match fields.day_of_week() {
            Some(1)  => 7,
            Some(d)  => i64::from(d) - 1,
            None     => 1,
        };
        days_from_ywd(year, i64::from(week), weekday)?
    }
    else {
        let month0 = i64::from(fields.month0().unwrap_or(0));
        let day = i64::from(fields.day_of_month().unwrap_or(1));
        days_from_ymd(year, month0, day)?
    };

    let wall = days * MILLIS_IN_DAY
        + i64::from(fields.hour().unwrap_or(0)) * 3_600_000
        + i64::from(fields.minute().unwrap_or(0)) * 60_000
        + i64::from(fields.second().unwrap_or(0)) * 1_000
        + i64::from(fields.millisecond().unwrap_or(0));

    Ok(wall - i64::from(fields.zone_offset_millis().unwrap_or(0)))
}


/// A broken-down civil date and time, the formatter's input.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct CivilDateTime {
    pub year: i64,
    pub month0: i8,
    pub day_of_month: i8,
    pub hour: i8,
    pub minute: i8,
    pub second: i8,
    pub millisecond: i16,
}

impl CivilDateTime {

    /// Computes the civil fields of the given Unix epoch millisecond,
    /// read on the UTC timeline.
    ///
    /// ### Examples
    ///
    /// ```
    /// use isochron::CivilDateTime;
    ///
    /// let civil = CivilDateTime::from_epoch_millis(1_451_622_150_123);
    /// assert_eq!(civil.year, 2016);
    /// assert_eq!(civil.month0, 0);
    /// assert_eq!(civil.hour, 4);
    /// assert_eq!(civil.millisecond, 123);
    /// ```
    pub fn from_epoch_millis(millis: i64) -> Self {
        // Split the value into days and milliseconds-of-day, and let
        // the civil-date calculation handle the rest.
        let (days, millis_of_day) = split_cycles(millis, MILLIS_IN_DAY);
        let (year, month0, day_of_month) = civil_from_days(days - EPOCH_DIFFERENCE);

        Self {
            year,
            month0,
            day_of_month,
            hour: (millis_of_day / 3_600_000) as i8,
            minute: (millis_of_day / 60_000 % 60) as i8,
            second: (millis_of_day / 1_000 % 60) as i8,
            millisecond: (millis_of_day % 1_000) as i16,
        }
    }
}


/// Performs two related calculations for leap years, returning the
/// number of leap years elapsed between 2000 and this year, and
/// whether this year is itself a leap year.
fn leap_year_calculations(year: i64) -> (i64, bool) {
    let year = year - 2000;

    let (num_400y_cycles, mut remainder) = split_cycles(year, 400);

    // Standard leap-year calculations, performed on the remainder.
    let currently_leap_year = remainder == 0 || (remainder % 100 != 0 && remainder % 4 == 0);

    let num_100y_cycles = remainder / 100;
    remainder -= num_100y_cycles * 100;

    let leap_years_elapsed = remainder / 4
        + 97 * num_400y_cycles  // There are 97 leap years in 400 years
        + 24 * num_100y_cycles  // There are 24 leap years in 100 years
        - if currently_leap_year { 1 } else { 0 };

    (leap_years_elapsed, currently_leap_year)
}

fn is_leap_year(year: i64) -> bool {
    leap_year_calculations(year).1
}

/// The number of days between the Unix epoch and the given calendar
/// date, validating the month and the day against the month's length.
fn days_from_ymd(year: i64, month0: i64, day: i64) -> Result<i64, Error> {
    if !month0.is_within(0..12) {
        return Err(Error::OutOfRange);
    }

    let (leap_days_elapsed, is_leap) = leap_year_calculations(year);
    let month_length = if month0 == 1 && is_leap { 29 } else { DAYS_IN_MONTH[month0 as usize] };
    if !day.is_within(1 .. month_length + 1) {
        return Err(Error::OutOfRange);
    }

    // Work out the number of days from the start of 1970, which is a
    // multiple of the number of years...
    let days = (year - 2000) * 365

        // Plus the number of days between the start of 1970 and the
        // start of 2000, because years here are relative to 2000 and
        // day counts are relative to 1970...
        + 10958

        // Plus the number of leap years elapsed between now and the
        // start of 2000...
        + leap_days_elapsed

        // Plus the days in all the months leading up to this one...
        + DAYS_BEFORE_MONTH[month0 as usize]

        // Plus an extra leap day for *this* year...
        + if is_leap && month0 >= 2 { 1 } else { 0 }

        // Plus the number of days into the month (days are 1-indexed,
        // so they become 0-indexed here).
        + (day - 1);

    Ok(days)
}

/// The number of days between the Unix epoch and the given ordinal
/// date, validating the day-of-year against the year's length.
fn days_from_yd(year: i64, yearday: i64) -> Result<i64, Error> {
    let days_in_year = if is_leap_year(year) { 366 } else { 365 };
    if !yearday.is_within(1 .. days_in_year + 1) {
        return Err(Error::OutOfRange);
    }

    let jan_1 = days_from_ymd(year, 0, 1)?;
    Ok(jan_1 + yearday - 1)
}

/// The number of days between the Unix epoch and the given week date,
/// using the ISO week rules: weeks begin on Monday, and week 1 is the
/// week containing January 4th. Early days of week 1 and late days of
/// week 53 can land in the neighbouring year.
fn days_from_ywd(year: i64, week: i64, weekday_from_monday: i64) -> Result<i64, Error> {
    if !week.is_within(1..54) || !weekday_from_monday.is_within(1..8) {
        return Err(Error::OutOfRange);
    }

    let jan_4 = days_from_ymd(year, 0, 4)?;
    let correction = weekday_from_monday_of(jan_4) + 3;
    let yearday = 7 * week + weekday_from_monday - correction;

    if yearday <= 0 {
        let days_in_year = if is_leap_year(year - 1) { 366 } else { 365 };
        days_from_yd(year - 1, days_in_year + yearday)
    }
    else {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if yearday > days_in_year {
            days_from_yd(year + 1, yearday - days_in_year)
        }
        else {
            days_from_yd(year, yearday)
        }
    }
}

/// Computes the weekday of a Unix epoch day count, as days from Monday
/// counting from one (Monday is 1, Sunday is 7).
fn weekday_from_monday_of(days: i64) -> i64 {
    // The reference day, 1st March 2000, was a Wednesday.
    let (_, weekday) = split_cycles(days - EPOCH_DIFFERENCE + 3, 7);

    // That remainder counts from Sunday as zero.
    if weekday == 0 { 7 } else { weekday }
}

/// Computes a civil year, 0-based month, and day-of-month, given the
/// number of days that have passed since the reference point.
fn civil_from_days(days: i64) -> (i64, i8, i8) {
    // The Gregorian calendar works in 400-year cycles which repeat
    // themselves ever after, so the calculation peels off the number
    // of 400-year, 100-year, and 4-year cycles, continually reducing
    // the number of days left to think about.
    let (num_400y_cycles, mut remainder) = split_cycles(days, DAYS_IN_400Y);

    let num_100y_cycles = remainder / DAYS_IN_100Y;
    remainder -= num_100y_cycles * DAYS_IN_100Y;  // days left in this 100-year cycle

    let num_4y_cycles = remainder / DAYS_IN_4Y;
    remainder -= num_4y_cycles * DAYS_IN_4Y;  // days left in this 4-year cycle

    let mut years = cmp::min(remainder / 365, 3);
    remainder -= years * 365;  // days left in this year

    // Turn all those cycles into an actual number of years.
    years += 4 * num_4y_cycles
         + 100 * num_100y_cycles
         + 400 * num_400y_cycles;

    // Work out the month and the days into the month by scanning the
    // time triangle for the month with the correct number of days
    // elapsed at the end of it. (It's "11 - index" below because the
    // triangle goes backwards.)
    let result = TIME_TRIANGLE.iter()
                              .enumerate()
                              .find(|&(_, days)| *days <= remainder);

    let (mut month, month_days) = match result {
        Some((index, days)) => (11 - index, remainder - *days),
        None => (0, remainder),  // No month found? Then it's February.
    };

    // Add 2 to the month to compensate for the reference point being
    // in March, wrapping January and February into the next year.
    month += 2;
    if month >= 12 {
        years += 1;
        month -= 12;
    }

    // Adjust the day for human reasons: the first of the month is the
    // 1st, not the 0th.
    (years + 2000, month as i8, (month_days + 1) as i8)
}

/// Splits a count of days (or any other period) into a number of
/// complete cycles and a leftover, with a negative count wrapping
/// around to a positive leftover, owing to how the modulo operator
/// treats negative values.
fn split_cycles(number_of_periods: i64, cycle_length: i64) -> (i64, i64) {
    let mut cycles    = number_of_periods / cycle_length;
    let mut remainder = number_of_periods % cycle_length;

    if remainder < 0 {
        remainder += cycle_length;
        cycles    -= 1;
    }

    (cycles, remainder)
}


#[cfg(test)]
mod test {
    use super::{resolve, CivilDateTime, Error, days_from_ymd, weekday_from_monday_of};
    use fields::FieldSet;
    use parse::parse;

    fn millis_of(input: &str) -> Result<i64, Error> {
        let mut fields = FieldSet::new();
        assert!(parse(input, 0, &mut fields).is_ok(), "{:?} should parse", input);
        resolve(&fields)
    }

    #[test]
    fn year_defaults_to_its_first_instant() {
        assert_eq!(millis_of("2016"), Ok(1_451_606_400_000));
        assert_eq!(millis_of("1970"), Ok(0));
    }

    #[test]
    fn calendar_date() {
        assert_eq!(millis_of("2016-03-03"), Ok(1_456_963_200_000));
        assert_eq!(millis_of("20160303"), Ok(1_456_963_200_000));
    }

    #[test]
    fn ordinal_date() {
        assert_eq!(millis_of("2016-063"), Ok(1_456_963_200_000));
        assert_eq!(millis_of("2016-001"), millis_of("2016"));
        assert_eq!(millis_of("2016-366"), Ok(1_451_606_400_000 + 365 * 86_400_000));
    }

    #[test]
    fn week_date() {
        // Thursday of week 9 of 2016 is the 3rd of March.
        assert_eq!(millis_of("2016-W09-4"), Ok(1_456_963_200_000));

        // A week alone resolves to its Monday.
        assert_eq!(millis_of("2016-W09"), Ok(1_456_963_200_000 - 3 * 86_400_000));
    }

    #[test]
    fn week_dates_crossing_year_boundaries() {
        // Monday of week 1 of 2009 is late in December 2008...
        assert_eq!(millis_of("2009-W01-1"), millis_of("2008-12-29"));

        // ...and Sunday of week 53 lands in January 2010.
        assert_eq!(millis_of("2009-W53-7"), millis_of("2010-01-03"));
    }

    #[test]
    fn sunday_wraps_around() {
        // Sunday of week 1 of 2016 - raw day digit 7 - is January 10th.
        assert_eq!(millis_of("2016-W01-7"), millis_of("2016-01-10"));
        assert_eq!(millis_of("2016-W01-1"), millis_of("2016-01-04"));
    }

    #[test]
    fn time_of_day() {
        assert_eq!(millis_of("2016-01-01T04:22:30.123"), Ok(1_451_622_150_123));
        assert_eq!(millis_of("1970-01-01T00:00:00.001"), Ok(1));
    }

    #[test]
    fn offsets_shift_the_instant() {
        assert_eq!(millis_of("2016-01-01T04:22:30.123+00:00"), Ok(1_451_622_150_123));
        assert_eq!(millis_of("2016-01-01T04:22:30.123-03:00"),
                   Ok(1_451_622_150_123 + 3 * 3_600_000));
        assert_eq!(millis_of("2016-01-01T04:22:30.123+05:30"),
                   Ok(1_451_622_150_123 - (5 * 3_600_000 + 30 * 60_000)));
    }

    #[test]
    fn out_of_range_dates_are_rejected_here() {
        assert_eq!(millis_of("2016-13-01"), Err(Error::OutOfRange));
        assert_eq!(millis_of("2016-00-01"), Err(Error::OutOfRange));
        assert_eq!(millis_of("2016-02-30"), Err(Error::OutOfRange));
        assert_eq!(millis_of("2015-366"), Err(Error::OutOfRange));
        assert_eq!(millis_of("2016-000"), Err(Error::OutOfRange));
    }

    #[test]
    fn leap_years() {
        assert_eq!(millis_of("2016-02-29"), Ok(1_456_704_000_000));
        assert_eq!(millis_of("2000-02-29"), millis_of("2000-060"));
        assert_eq!(millis_of("1900-02-29"), Err(Error::OutOfRange));
    }

    #[test]
    fn time_fields_combine_arithmetically() {
        // Range policy only covers dates; a lenient hour rolls over.
        assert_eq!(millis_of("2016-01-01T24"), millis_of("2016-01-02"));
    }

    #[test]
    fn known_weekdays() {
        // 1st January 1970 was a Thursday.
        assert_eq!(weekday_from_monday_of(0), 4);
        // 3rd March 2016 was also a Thursday.
        assert_eq!(weekday_from_monday_of(days_from_ymd(2016, 2, 3).unwrap()), 4);
        // 10th January 2016 was a Sunday.
        assert_eq!(weekday_from_monday_of(days_from_ymd(2016, 0, 10).unwrap()), 7);
    }

    #[test]
    fn civil_round_trips() {
        let civil = CivilDateTime::from_epoch_millis(1_456_963_200_000);
        assert_eq!(civil, CivilDateTime {
            year: 2016, month0: 2, day_of_month: 3,
            hour: 0, minute: 0, second: 0, millisecond: 0,
        });

        let civil = CivilDateTime::from_epoch_millis(-1);
        assert_eq!(civil, CivilDateTime {
            year: 1969, month0: 11, day_of_month: 31,
            hour: 23, minute: 59, second: 59, millisecond: 999,
        });
    }
}
