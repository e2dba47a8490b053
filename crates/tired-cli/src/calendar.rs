//! Contracted working hours per month.

/// Hours expected in `month` (1-12) of `year`, if the calendar covers it.
pub fn working_hours(year: i32, month: u32) -> Option<u32> {
    let hours = match year {
        2024 => [136, 159, 159, 168, 159, 151, 184, 176, 168, 184, 167, 168],
        2025 => [136, 160, 167, 175, 144, 151, 184, 168, 176, 184, 151, 176],
        _ => return None,
    };
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    hours.get(index).copied()
}
