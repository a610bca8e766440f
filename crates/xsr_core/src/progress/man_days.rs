//! Worker-day accounting from the project process log.

use crate::model::project::{ProcessStatusType, ProcessTime};
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Sums worker days over the status change log.
///
/// Changes are replayed in date order. `start` and `continue` set the active
/// worker count, `suspend` and `finish` drop it to zero. Each interval adds
/// its length in days, rounded up, times the workers active during it. An
/// interval still open at the end runs until `today`.
pub fn man_days(process_time: &ProcessTime, today: DateTime<Utc>) -> u64 {
    let mut changes: Vec<_> = process_time.status_changes.iter().collect();
    changes.sort_by_key(|change| change.date);

    let mut total = 0_u64;
    let mut workers = 0_u32;
    let mut last_date: Option<DateTime<Utc>> = None;

    for change in changes {
        if let Some(last) = last_date {
            total += interval_days(last, change.date) * u64::from(workers);
        }
        workers = match change.kind {
            ProcessStatusType::Start | ProcessStatusType::Continue => {
                change.worker_count.unwrap_or(0)
            }
            ProcessStatusType::Suspend | ProcessStatusType::Finish => 0,
        };
        last_date = Some(change.date);
    }

    if let Some(last) = last_date {
        total += interval_days(last, today) * u64::from(workers);
    }
    total
}

/// Whole days between two instants, rounded up; never negative.
fn interval_days(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    let millis = (to - from).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u64::try_from(days).unwrap_or(0)
}
