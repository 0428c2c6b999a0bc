use super::domain::{ShiftRecord, ShiftSlot, ShiftType};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes past midnight for an `HH:MM` string. Malformed input resolves to midnight.
pub fn minutes_of_day(value: &str) -> u32 {
    let mut parts = value.trim().splitn(2, ':');
    let hours = parts
        .next()
        .and_then(|raw| raw.trim().parse::<u32>().ok())
        .filter(|hours| *hours < 24);
    let minutes = parts
        .next()
        .map(|raw| raw.trim().parse::<u32>().ok().filter(|minutes| *minutes < 60))
        .unwrap_or(Some(0));

    match (hours, minutes) {
        (Some(hours), Some(minutes)) => hours * 60 + minutes,
        _ => 0,
    }
}

/// Hours between two `HH:MM` times. An end before the start wraps past midnight.
pub fn duration_hours(start_time: &str, end_time: &str) -> f64 {
    let start = minutes_of_day(start_time);
    let mut end = minutes_of_day(end_time);
    if end < start {
        end += MINUTES_PER_DAY;
    }
    f64::from(end - start) / 60.0
}

/// Classify a shift by its start hour: `[6,14)` morning, `[14,22)` afternoon, else night.
pub fn shift_type(start_time: &str) -> ShiftType {
    match minutes_of_day(start_time) / 60 {
        6..=13 => ShiftType::Morning,
        14..=21 => ShiftType::Afternoon,
        _ => ShiftType::Night,
    }
}

impl ShiftSlot {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(&self.start_time, &self.end_time)
    }

    pub fn shift_type(&self) -> ShiftType {
        shift_type(&self.start_time)
    }
}

impl ShiftRecord {
    pub fn duration_hours(&self) -> f64 {
        duration_hours(&self.start_time, &self.end_time)
    }
}
