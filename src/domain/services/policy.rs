use chrono::{DateTime, Duration, NaiveDate, Utc};
use crate::domain::models::booking::{Booking, STATUS_CONFIRMED};

pub const RATE_LIMIT_WINDOW_HOURS: i64 = 24;

/// Outcome of evaluating a public submission against the current store snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Persist with status "pending" for admin review.
    Accept,
    /// Same email already submitted within the 24-hour window.
    RateLimited,
    /// The requested date range collides with a confirmed booking.
    Overlap,
}

/// A structurally validated submission, not yet decided.
pub struct Candidate<'a> {
    /// Lower-cased before evaluation.
    pub email: &'a str,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Decides whether a candidate submission is accepted, rate limited, or
/// rejected for overlapping dates.
///
/// Pure over the given snapshot: the same `existing` slice and `now` always
/// produce the same decision. The repository re-runs both guards inside the
/// insert transaction, so a race between two submissions passing this check
/// is rejected at write time with the same error.
pub fn evaluate_submission(
    candidate: &Candidate,
    existing: &[Booking],
    now: DateTime<Utc>,
    skip_rate_limit: bool,
) -> Decision {
    if !skip_rate_limit {
        let window_start = now - Duration::hours(RATE_LIMIT_WINDOW_HOURS);
        let recent = existing
            .iter()
            .any(|b| b.email == candidate.email && b.created_at >= window_start);
        if recent {
            return Decision::RateLimited;
        }
    }

    let conflict = existing.iter().any(|b| {
        b.status == STATUS_CONFIRMED
            && ranges_overlap(candidate.from_date, candidate.to_date, b.from_date, b.to_date)
    });
    if conflict {
        return Decision::Overlap;
    }

    Decision::Accept
}

/// Inclusive interval overlap on whole calendar days. Sharing a single day
/// counts as a conflict.
pub fn ranges_overlap(a_from: NaiveDate, a_to: NaiveDate, b_from: NaiveDate, b_to: NaiveDate) -> bool {
    a_from <= b_to && a_to >= b_from
}
