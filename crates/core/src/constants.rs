//! Constants used throughout the healthboard core crate.
//!
//! File names and defaults live here so the server, the CLI and the tests agree on where data
//! is read from.

/// Default directory for health data files when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "health_data";

/// Filename for the appointment list read by [`crate::YamlAppointmentSource`].
pub const APPOINTMENTS_FILENAME: &str = "appointments.yaml";

/// Filename for the legacy flag globals.
pub const LEGACY_FLAGS_FILENAME: &str = "legacy_flags.yaml";

/// Seconds after a scheduled appointment during which it is still treated as upcoming.
pub const GRACE_WINDOW_SECS: i64 = 5 * 60;

/// Feature flags enabled when `HEALTHBOARD_FEATURES` is not set.
pub const DEFAULT_FEATURES: &str = "live_capture,appointments";
