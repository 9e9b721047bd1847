//! Week window arithmetic
//!
//! Competition weeks run Monday 00:00 to Monday 00:00 in a fixed
//! UTC-8 offset (no daylight-saving adjustment; the offset is
//! deliberately constant for stable week boundaries year-round).
//! Week codes are ISO: "2024-W01".

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};

const ANCHOR_OFFSET_SECONDS: i32 = 8 * 3600;

fn anchor_offset() -> FixedOffset {
    FixedOffset::west_opt(ANCHOR_OFFSET_SECONDS).expect("offset within a day")
}

/// The Monday 00:00 (anchor offset) strictly after `now`.
///
/// Always the following week's Monday, so an in-flight week is never
/// re-anchored; at exactly Monday 00:00 the result is seven days out.
pub fn next_monday(now: DateTime<Utc>) -> DateTime<Utc> {
    let local = now.with_timezone(&anchor_offset());
    let days_from_monday = local.weekday().num_days_from_monday() as i64;
    let this_monday = local.date_naive() - Duration::days(days_from_monday);
    let next_monday = this_monday + Duration::days(7);
    let midnight = next_monday
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    anchor_offset()
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offsets have no gaps")
        .with_timezone(&Utc)
}

/// Start of the week after the given week start
pub fn following_week(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::days(7)
}

/// End of the week starting at `start` (the next Monday 00:00)
pub fn week_end(start: DateTime<Utc>) -> DateTime<Utc> {
    following_week(start)
}

/// ISO week code for a week start, e.g. "2024-W01"
pub fn week_code(start: DateTime<Utc>) -> String {
    let local = start.with_timezone(&anchor_offset());
    let iso = local.date_naive().iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
