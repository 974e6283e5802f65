use super::{CaptureStateAccessor, FlagSnapshot, LegacyGlobals};
use crate::CaptureError;
use std::sync::Arc;

/// A strategy that can produce the current flag state.
pub trait FlagSource: Send + Sync {
    fn current_flags(&self) -> Result<FlagSnapshot, CaptureError>;

    /// Short label used in diagnostics and in the REST response.
    fn name(&self) -> &'static str;
}

/// Reads the live capture module through its registered accessor.
///
/// The accessor's mapping is returned verbatim: missing keys are not filled in.
#[derive(Clone)]
pub struct LiveFlagSource {
    accessor: Arc<dyn CaptureStateAccessor>,
}

impl LiveFlagSource {
    pub fn new(accessor: Arc<dyn CaptureStateAccessor>) -> Self {
        Self { accessor }
    }
}

impl FlagSource for LiveFlagSource {
    fn current_flags(&self) -> Result<FlagSnapshot, CaptureError> {
        self.accessor
            .capture_flags_state()
            .map(FlagSnapshot::from_map)
    }

    fn name(&self) -> &'static str {
        "live"
    }
}

/// Reads the legacy globals. Never fails.
#[derive(Clone, Debug, Default)]
pub struct LegacyFlagSource {
    globals: LegacyGlobals,
}

impl LegacyFlagSource {
    pub fn new(globals: LegacyGlobals) -> Self {
        Self { globals }
    }

    /// Infallible form of [`FlagSource::current_flags`].
    pub fn snapshot(&self) -> FlagSnapshot {
        self.globals.snapshot()
    }
}

impl FlagSource for LegacyFlagSource {
    fn current_flags(&self) -> Result<FlagSnapshot, CaptureError> {
        Ok(self.snapshot())
    }

    fn name(&self) -> &'static str {
        "legacy"
    }
}
