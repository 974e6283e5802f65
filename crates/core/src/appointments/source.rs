use super::{find_role, select_next, Appointment, AppointmentCache, AppointmentData};
use crate::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Backing data source for appointments.
pub trait AppointmentSource: Send + Sync {
    fn fetch(&self) -> CoreResult<Vec<Appointment>>;
}

/// Reads appointments from a YAML list on disk.
///
/// ```yaml
/// - role: nephro
///   time: 2026-05-02T14:30:00Z
///   location: Renal clinic, room 4
/// ```
#[derive(Clone, Debug)]
pub struct YamlAppointmentSource {
    path: PathBuf,
}

impl YamlAppointmentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AppointmentSource for YamlAppointmentSource {
    fn fetch(&self) -> CoreResult<Vec<Appointment>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no appointments file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(CoreError::FileRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&contents).map_err(CoreError::YamlDeserialization)
    }
}

/// Group appointments by role, keeping known roles only, each role sorted by time.
pub fn group_by_role(appointments: Vec<Appointment>) -> AppointmentData {
    let mut data = AppointmentData::new();
    for appt in appointments {
        if find_role(&appt.role).is_none() {
            tracing::warn!("skipping appointment with unknown role: {}", appt.role);
            continue;
        }
        data.entry(appt.role.clone()).or_default().push(appt);
    }
    for list in data.values_mut() {
        list.sort_by_key(|appt| appt.time);
    }
    data
}

/// Run one load cycle: fetch, group, pick the next appointment and publish both.
///
/// # Errors
///
/// Returns the source's error after clearing the loading state. Earlier data is left in place.
pub fn refresh(
    cache: &mut AppointmentCache,
    source: &dyn AppointmentSource,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    cache.begin_load();
    match source.fetch() {
        Ok(appointments) => {
            let data = group_by_role(appointments);
            let next = select_next(&data, now);
            cache.complete_load(data, next);
            Ok(())
        }
        Err(e) => {
            cache.fail_load();
            Err(e)
        }
    }
}
