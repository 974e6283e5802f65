//! Upcoming appointments across a fixed set of doctor roles.
//!
//! The cache holds the load lifecycle and the last loaded data. Loading itself is done by an
//! [`AppointmentSource`]; [`refresh`] drives one complete load cycle against a cache.

mod cache;
mod policy;
mod roles;
mod source;

pub use cache::{AppointmentCache, AppointmentCacheState};
pub use policy::{grace_window, is_still_current, select_next};
pub use roles::{find_role, role_index, role_label, AppointmentRole, APPOINTMENT_ROLES};
pub use source::{group_by_role, refresh, AppointmentSource, YamlAppointmentSource};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scheduled appointment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    /// Role code, one of [`APPOINTMENT_ROLES`].
    pub role: String,
    pub time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Appointment {
    pub fn new(role: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            role: role.into(),
            time,
            location: None,
            note: None,
        }
    }
}

/// Loaded appointments keyed by role code.
pub type AppointmentData = BTreeMap<String, Vec<Appointment>>;
