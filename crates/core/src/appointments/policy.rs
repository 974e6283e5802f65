//! Grace-window policy and next-appointment selection.
//!
//! Appointment checks run periodically, so an appointment whose time has just passed is still
//! treated as the current one until the grace window elapses.

use super::{role_index, Appointment, AppointmentData};
use crate::constants::GRACE_WINDOW_SECS;
use chrono::{DateTime, Duration, Utc};

pub fn grace_window() -> Duration {
    Duration::seconds(GRACE_WINDOW_SECS)
}

/// `true` while `now` is before `scheduled` plus the grace window.
///
/// A scheduled time so far out that adding the window overflows is always current.
pub fn is_still_current(scheduled: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    scheduled
        .checked_add_signed(grace_window())
        .map_or(true, |end| now < end)
}

/// The soonest appointment across all roles that is still current at `now`.
///
/// Ties on time go to the role listed first in [`super::APPOINTMENT_ROLES`], then to the earlier
/// entry within that role. Codes outside the role list sort after every known role.
pub fn select_next(data: &AppointmentData, now: DateTime<Utc>) -> Option<Appointment> {
    data.iter()
        .flat_map(|(code, appointments)| {
            let rank = role_index(code).unwrap_or(usize::MAX);
            appointments
                .iter()
                .enumerate()
                .map(move |(position, appt)| (appt.time, rank, code, position, appt))
        })
        .filter(|(time, ..)| is_still_current(*time, now))
        .min_by(|a, b| (a.0, a.1, a.2, a.3).cmp(&(b.0, b.1, b.2, b.3)))
        .map(|(.., appt)| appt.clone())
}
