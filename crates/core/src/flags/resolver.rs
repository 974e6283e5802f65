use super::{CaptureRegistry, FlagSnapshot, FlagSource, LegacyFlagSource, LiveFlagSource};
use crate::CaptureError;
use serde::Serialize;

/// How a [`FlagResolution`] was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolvedVia {
    /// The live capture module answered.
    Live,
    /// No live module is registered; the legacy globals are the configured source.
    Legacy,
    /// The live module is registered but failed, so the legacy globals answered instead.
    Fallback(CaptureError),
}

impl ResolvedVia {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedVia::Live => "live",
            ResolvedVia::Legacy => "legacy",
            ResolvedVia::Fallback(_) => "fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolvedVia::Fallback(_))
    }
}

impl Serialize for ResolvedVia {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A resolved snapshot together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlagResolution {
    pub snapshot: FlagSnapshot,
    pub origin: ResolvedVia,
}

/// Produces flag snapshots from a strategy chosen at construction time.
///
/// Resolution never fails. When the primary (live) source errors, the legacy globals answer for
/// that call and the error is reported in [`ResolvedVia::Fallback`].
pub struct FlagResolver {
    primary: Option<Box<dyn FlagSource>>,
    legacy: LegacyFlagSource,
}

impl FlagResolver {
    /// Resolver that only ever reads the legacy globals.
    pub fn legacy_only(legacy: LegacyFlagSource) -> Self {
        Self {
            primary: None,
            legacy,
        }
    }

    /// Resolver that prefers `primary` and falls back to `legacy` when it fails.
    pub fn with_primary(primary: Box<dyn FlagSource>, legacy: LegacyFlagSource) -> Self {
        Self {
            primary: Some(primary),
            legacy,
        }
    }

    /// Select the strategy from the registration slot: the live source when an accessor is
    /// registered, the legacy globals otherwise.
    pub fn from_registry(registry: &CaptureRegistry, legacy: LegacyFlagSource) -> Self {
        match registry.accessor() {
            Some(accessor) => Self::with_primary(Box::new(LiveFlagSource::new(accessor)), legacy),
            None => Self::legacy_only(legacy),
        }
    }

    /// Name of the configured primary strategy.
    pub fn strategy(&self) -> &'static str {
        self.primary
            .as_ref()
            .map(|p| p.name())
            .unwrap_or_else(|| self.legacy.name())
    }

    pub fn resolve(&self) -> FlagResolution {
        let Some(primary) = &self.primary else {
            return FlagResolution {
                snapshot: self.legacy.snapshot(),
                origin: ResolvedVia::Legacy,
            };
        };

        match primary.current_flags() {
            Ok(snapshot) => FlagResolution {
                snapshot,
                origin: ResolvedVia::Live,
            },
            Err(e) => FlagResolution {
                snapshot: self.legacy.snapshot(),
                origin: ResolvedVia::Fallback(e),
            },
        }
    }

    /// Resolve and return only the snapshot, logging a warning when the live source failed.
    pub fn snapshot(&self) -> FlagSnapshot {
        let resolution = self.resolve();
        if let ResolvedVia::Fallback(e) = &resolution.origin {
            tracing::warn!("live capture flags unavailable, using legacy globals: {}", e);
        }
        resolution.snapshot
    }
}

impl std::fmt::Debug for FlagResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagResolver")
            .field("strategy", &self.strategy())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{CaptureState, FlagName, LegacyGlobals};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn legacy_with(name: &str, value: serde_json::Value) -> LegacyFlagSource {
        let mut globals = LegacyGlobals::new();
        globals.set(name, value);
        LegacyFlagSource::new(globals)
    }

    #[test]
    fn legacy_path_returns_all_eight_keys() {
        let resolver = FlagResolver::from_registry(
            &CaptureRegistry::new(),
            legacy_with("sickActive", json!(true)),
        );

        let resolution = resolver.resolve();
        assert_eq!(resolution.origin, ResolvedVia::Legacy);
        assert_eq!(resolution.snapshot.len(), 8);
        for flag in FlagName::ALL {
            assert_eq!(
                resolution.snapshot.get(flag.as_str()),
                Some(flag == FlagName::SickActive),
                "{flag}"
            );
        }
    }

    #[test]
    fn live_mapping_is_returned_unpadded() {
        let state = Arc::new(CaptureState::new());
        state.set("trainingActive", true).expect("set");
        let mut registry = CaptureRegistry::new();
        registry.register(state);

        let resolver =
            FlagResolver::from_registry(&registry, legacy_with("sickActive", json!(true)));
        let resolution = resolver.resolve();

        assert_eq!(resolution.origin, ResolvedVia::Live);
        assert_eq!(
            resolution.snapshot.into_inner(),
            BTreeMap::from([("trainingActive".to_string(), true)])
        );
    }

    #[test]
    fn live_source_is_read_on_every_call() {
        let state = Arc::new(CaptureState::new());
        let mut registry = CaptureRegistry::new();
        registry.register(state.clone());
        let resolver = FlagResolver::from_registry(&registry, LegacyFlagSource::default());

        assert!(resolver.snapshot().is_empty());
        state.set("saltHigh", true).expect("set");
        assert!(resolver.snapshot().is_active(FlagName::SaltHigh));
    }

    #[test]
    fn failing_accessor_falls_back_to_legacy() {
        let failing = || -> Result<BTreeMap<String, bool>, CaptureError> {
            Err(CaptureError::Unavailable("module not initialised".into()))
        };
        let mut registry = CaptureRegistry::new();
        registry.register(Arc::new(failing));

        let resolver =
            FlagResolver::from_registry(&registry, legacy_with("forxigaMissed", json!(1)));
        let resolution = resolver.resolve();

        assert!(resolution.origin.is_fallback());
        assert!(matches!(
            resolution.origin,
            ResolvedVia::Fallback(CaptureError::Unavailable(ref msg)) if msg.contains("not initialised")
        ));
        assert_eq!(resolution.snapshot.len(), 8);
        assert!(resolution.snapshot.is_active(FlagName::ForxigaMissed));

        let snapshot = resolver.snapshot();
        assert_eq!(snapshot, resolution.snapshot);
    }

    #[test]
    fn strategy_reflects_construction() {
        let legacy = FlagResolver::legacy_only(LegacyFlagSource::default());
        assert_eq!(legacy.strategy(), "legacy");

        let live = FlagResolver::with_primary(
            Box::new(LiveFlagSource::new(Arc::new(CaptureState::new()))),
            LegacyFlagSource::default(),
        );
        assert_eq!(live.strategy(), "live");
    }

    #[test]
    fn origin_serializes_as_label() {
        let json = serde_json::to_value(ResolvedVia::Fallback(CaptureError::Poisoned))
            .expect("serialize");
        assert_eq!(json, json!("fallback"));
    }
}
