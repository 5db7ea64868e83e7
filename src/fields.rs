//! The mutable store of fields that parsing populates and resolution
//! reads.

use std::fmt;


/// A sparse, mutable record of ISO-8601 fields.
///
/// Every slot starts out unset, and a parse only sets the slots the
/// input actually mentions: `"2016"` sets the year and nothing else.
/// What an unset slot *means* is decided by whoever reads the record
/// afterwards - see [`cal::resolve`](../cal/fn.resolve.html) for the
/// defaulting rules this crate applies - so the store itself never
/// invents values.
///
/// The month slot is 0-based (January is 0) and the canonical
/// day-of-week range is 1 to 7 beginning at Sunday.
#[derive(PartialEq, Eq, Copy, Clone, Default)]
pub struct FieldSet {
    year: Option<i64>,
    month0: Option<i8>,
    day_of_month: Option<i8>,
    day_of_year: Option<i16>,
    week_of_year: Option<i8>,
    day_of_week: Option<i8>,
    hour: Option<i8>,
    minute: Option<i8>,
    second: Option<i8>,
    millisecond: Option<i16>,
    zone_offset_millis: Option<i32>,
}

impl FieldSet {

    /// Creates a store with every slot unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unsets every slot.
    ///
    /// [`parse`](../parse/fn.parse.html) calls this before touching the
    /// store, so values from an earlier parse never leak into a later
    /// one.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn year(&self) -> Option<i64> { self.year }
    pub fn month0(&self) -> Option<i8> { self.month0 }
    pub fn day_of_month(&self) -> Option<i8> { self.day_of_month }
    pub fn day_of_year(&self) -> Option<i16> { self.day_of_year }
    pub fn week_of_year(&self) -> Option<i8> { self.week_of_year }
    pub fn day_of_week(&self) -> Option<i8> { self.day_of_week }
    pub fn hour(&self) -> Option<i8> { self.hour }
    pub fn minute(&self) -> Option<i8> { self.minute }
    pub fn second(&self) -> Option<i8> { self.second }
    pub fn millisecond(&self) -> Option<i16> { self.millisecond }
    pub fn zone_offset_millis(&self) -> Option<i32> { self.zone_offset_millis }

    pub fn set_year(&mut self, year: i64) { self.year = Some(year); }
    pub fn set_month0(&mut self, month0: i8) { self.month0 = Some(month0); }
    pub fn set_day_of_month(&mut self, day: i8) { self.day_of_month = Some(day); }
    pub fn set_day_of_year(&mut self, day: i16) { self.day_of_year = Some(day); }
    pub fn set_week_of_year(&mut self, week: i8) { self.week_of_year = Some(week); }
    pub fn set_day_of_week(&mut self, day: i8) { self.day_of_week = Some(day); }
    pub fn set_hour(&mut self, hour: i8) { self.hour = Some(hour); }
    pub fn set_minute(&mut self, minute: i8) { self.minute = Some(minute); }
    pub fn set_second(&mut self, second: i8) { self.second = Some(second); }
    pub fn set_millisecond(&mut self, millisecond: i16) { self.millisecond = Some(millisecond); }
    pub fn set_zone_offset_millis(&mut self, millis: i32) { self.zone_offset_millis = Some(millis); }
}

impl fmt::Debug for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut out = f.debug_struct("FieldSet");

        // Only the slots that are actually set get printed, since the
        // whole point of the record is which slots a parse touched.
        if let Some(v) = self.year               { let _ = out.field("year", &v); }
        if let Some(v) = self.month0             { let _ = out.field("month0", &v); }
        if let Some(v) = self.day_of_month       { let _ = out.field("day_of_month", &v); }
        if let Some(v) = self.day_of_year        { let _ = out.field("day_of_year", &v); }
        if let Some(v) = self.week_of_year       { let _ = out.field("week_of_year", &v); }
        if let Some(v) = self.day_of_week        { let _ = out.field("day_of_week", &v); }
        if let Some(v) = self.hour               { let _ = out.field("hour", &v); }
        if let Some(v) = self.minute             { let _ = out.field("minute", &v); }
        if let Some(v) = self.second             { let _ = out.field("second", &v); }
        if let Some(v) = self.millisecond        { let _ = out.field("millisecond", &v); }
        if let Some(v) = self.zone_offset_millis { let _ = out.field("zone_offset_millis", &v); }

        out.finish()
    }
}


#[cfg(test)]
mod test {
    use super::FieldSet;

    #[test]
    fn starts_clear() {
        let fields = FieldSet::new();
        assert_eq!(fields.year(), None);
        assert_eq!(fields.zone_offset_millis(), None);
    }

    #[test]
    fn clearing_unsets_everything() {
        let mut fields = FieldSet::new();
        fields.set_year(2016);
        fields.set_hour(4);
        fields.clear();
        assert_eq!(fields, FieldSet::new());
    }

    #[test]
    fn debug_lists_only_set_slots() {
        let mut fields = FieldSet::new();
        fields.set_year(2016);
        fields.set_week_of_year(9);
        let debugged = format!("{:?}", fields);
        assert_eq!(debugged, "FieldSet { year: 2016, week_of_year: 9 }");
    }
}
