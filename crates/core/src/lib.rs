//! # Healthboard Core
//!
//! Shared state behind the health-tracking page:
//! - Flag resolution: a snapshot of the active health-tracking flags, read from the live capture
//!   module when it is registered and from the legacy globals otherwise
//! - Appointment cache: the load lifecycle for upcoming appointments plus the grace-window policy
//!   that decides whether a stored "next" appointment is still current
//! - Runtime configuration and feature flags resolved once at startup
//!
//! **No transport concerns**: the REST surface lives in the `healthboard-run` binary and the
//! inspection commands in `healthboard-cli`.

pub mod appointments;
pub mod config;
pub mod constants;
pub mod error;
pub mod flags;

pub use appointments::{
    grace_window, is_still_current, refresh, role_label, select_next, Appointment,
    AppointmentCache, AppointmentCacheState, AppointmentData, AppointmentRole, AppointmentSource,
    YamlAppointmentSource, APPOINTMENT_ROLES,
};
pub use config::{CoreConfig, Feature, FeatureFlags};
pub use constants::DEFAULT_DATA_DIR;
pub use error::{CaptureError, CoreError, CoreResult};
pub use flags::{
    CaptureRegistry, CaptureState, CaptureStateAccessor, FlagName, FlagResolution, FlagResolver,
    FlagSnapshot, LegacyFlagSource, LegacyGlobals, ResolvedVia,
};
