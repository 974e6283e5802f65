//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the resolver and the
//! appointment services. Request handling never reads process-wide environment variables.

use crate::constants::{APPOINTMENTS_FILENAME, DEFAULT_FEATURES, LEGACY_FLAGS_FILENAME};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// A named runtime feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Resolve flags from the live capture module when it is registered.
    LiveCapture,
    /// Serve and refresh appointment data.
    Appointments,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::LiveCapture, Feature::Appointments];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::LiveCapture => "live_capture",
            Feature::Appointments => "appointments",
        }
    }
}

impl FromStr for Feature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFeature(s.to_string()))
    }
}

/// The set of enabled runtime features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    live_capture: bool,
    appointments: bool,
}

impl FeatureFlags {
    /// Every feature switched on.
    pub fn all() -> Self {
        Self {
            live_capture: true,
            appointments: true,
        }
    }

    /// Parse a comma separated list such as `"live_capture,appointments"`.
    ///
    /// Whitespace around entries and blank entries are ignored, so an empty string disables
    /// everything.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownFeature`] for any entry that is not a known feature name.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let mut flags = Self::default();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            flags.set(entry.parse()?, true);
        }
        Ok(flags)
    }

    /// Parse an optional environment value, falling back to [`DEFAULT_FEATURES`] when unset.
    pub fn from_env_value(value: Option<String>) -> CoreResult<Self> {
        match value {
            Some(v) => Self::parse(&v),
            None => Self::parse(DEFAULT_FEATURES),
        }
    }

    pub fn set(&mut self, feature: Feature, enabled: bool) {
        match feature {
            Feature::LiveCapture => self.live_capture = enabled,
            Feature::Appointments => self.appointments = enabled,
        }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::LiveCapture => self.live_capture,
            Feature::Appointments => self.appointments,
        }
    }

    /// Names of the enabled features, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        Feature::ALL
            .into_iter()
            .filter(|f| self.is_enabled(*f))
            .map(Feature::as_str)
            .collect()
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    features: FeatureFlags,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidInput`] if `data_dir` is empty.
    pub fn new(data_dir: PathBuf, features: FeatureFlags) -> CoreResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self { data_dir, features })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn features(&self) -> FeatureFlags {
        self.features
    }

    pub fn appointments_file(&self) -> PathBuf {
        self.data_dir.join(APPOINTMENTS_FILENAME)
    }

    pub fn legacy_flags_file(&self) -> PathBuf {
        self.data_dir.join(LEGACY_FLAGS_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_features_with_whitespace() {
        let flags = FeatureFlags::parse(" appointments , live_capture ,").expect("valid");
        assert!(flags.is_enabled(Feature::Appointments));
        assert!(flags.is_enabled(Feature::LiveCapture));
        assert_eq!(flags.enabled(), vec!["live_capture", "appointments"]);
    }

    #[test]
    fn parse_empty_string_disables_everything() {
        let flags = FeatureFlags::parse("").expect("valid");
        assert_eq!(flags, FeatureFlags::default());
        assert!(flags.enabled().is_empty());
    }

    #[test]
    fn parse_rejects_unknown_feature() {
        let err = FeatureFlags::parse("live_capture,telemetry").expect_err("should reject");
        assert!(matches!(err, CoreError::UnknownFeature(name) if name == "telemetry"));
    }

    #[test]
    fn unset_env_value_uses_defaults() {
        let flags = FeatureFlags::from_env_value(None).expect("defaults parse");
        assert_eq!(flags, FeatureFlags::all());
    }

    #[test]
    fn config_rejects_empty_data_dir() {
        let err = CoreConfig::new(PathBuf::new(), FeatureFlags::all()).expect_err("empty dir");
        assert!(matches!(err, CoreError::InvalidInput(msg) if msg.contains("data_dir")));
    }

    #[test]
    fn config_derives_file_paths_from_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("/tmp/hb"), FeatureFlags::all()).expect("valid");
        assert_eq!(
            cfg.appointments_file(),
            PathBuf::from("/tmp/hb/appointments.yaml")
        );
        assert_eq!(
            cfg.legacy_flags_file(),
            PathBuf::from("/tmp/hb/legacy_flags.yaml")
        );
    }
}
