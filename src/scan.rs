//! Fixed-width digit scanning, the only numeric primitives in the crate.

use std::cmp;

use parse::Malformed;


/// Reads exactly `len` consecutive ASCII digits starting at `off` and
/// returns their unsigned value.
///
/// There are no variable-width reads: the grammar position always
/// dictates the width, so anything short of `len` digits is a failure.
/// A window that runs past the end of the input reports the input
/// length; a non-digit inside the window reports its own offset.
pub(crate) fn scan_number(s: &[u8], off: usize, len: usize) -> Result<u32, Malformed> {
    if off + len > s.len() {
        return Err(Malformed::at(s.len()));
    }

    let mut value = 0;
    for i in off .. off + len {
        match s[i] {
            d @ b'0' ..= b'9'  => value = 10 * value + u32::from(d - b'0'),
            _                  => return Err(Malformed::at(i)),
        }
    }

    Ok(value)
}


/// Counts the consecutive ASCII digits starting at `off`, capped at
/// `max` or at the end of the input.
pub(crate) fn count_digits(s: &[u8], off: usize, max: usize) -> usize {
    let end = cmp::min(s.len(), off + max);
    s[off .. end].iter().take_while(|d| d.is_ascii_digit()).count()
}
