//! The live capture module and its registration slot.

use crate::CaptureError;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// The capability the live capture module exposes: report its current flag states.
pub trait CaptureStateAccessor: Send + Sync {
    fn capture_flags_state(&self) -> Result<BTreeMap<String, bool>, CaptureError>;
}

impl<F> CaptureStateAccessor for F
where
    F: Fn() -> Result<BTreeMap<String, bool>, CaptureError> + Send + Sync,
{
    fn capture_flags_state(&self) -> Result<BTreeMap<String, bool>, CaptureError> {
        self()
    }
}

/// Well-known slot through which the live capture module makes its accessor reachable.
///
/// Built once at startup and handed to [`super::FlagResolver::from_registry`]. An empty registry
/// means the legacy globals are the only source.
#[derive(Clone, Default)]
pub struct CaptureRegistry {
    accessor: Option<Arc<dyn CaptureStateAccessor>>,
}

impl CaptureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the live accessor, replacing any previous registration.
    pub fn register(&mut self, accessor: Arc<dyn CaptureStateAccessor>) {
        self.accessor = Some(accessor);
    }

    pub fn unregister(&mut self) {
        self.accessor = None;
    }

    pub fn accessor(&self) -> Option<Arc<dyn CaptureStateAccessor>> {
        self.accessor.clone()
    }

    pub fn is_registered(&self) -> bool {
        self.accessor.is_some()
    }
}

impl std::fmt::Debug for CaptureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureRegistry")
            .field("registered", &self.is_registered())
            .finish()
    }
}

/// In-process state owned by the live capture module.
///
/// Writers are the capture UI handlers; the only reader is the flag resolver through
/// [`CaptureStateAccessor`].
#[derive(Debug, Default)]
pub struct CaptureState {
    flags: RwLock<BTreeMap<String, bool>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, name: impl Into<String>, active: bool) -> Result<(), CaptureError> {
        let mut flags = self.flags.write().map_err(|_| CaptureError::Poisoned)?;
        flags.insert(name.into(), active);
        Ok(())
    }

    /// Replace the whole state. Keys not present in `flags` are dropped.
    pub fn replace(&self, flags: BTreeMap<String, bool>) -> Result<(), CaptureError> {
        let mut guard = self.flags.write().map_err(|_| CaptureError::Poisoned)?;
        *guard = flags;
        Ok(())
    }
}

impl CaptureStateAccessor for CaptureState {
    fn capture_flags_state(&self) -> Result<BTreeMap<String, bool>, CaptureError> {
        let flags = self.flags.read().map_err(|_| CaptureError::Poisoned)?;
        Ok(flags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_reports_what_was_set() {
        let state = CaptureState::new();
        state.set("trainingActive", true).expect("set");
        state.set("saltHigh", false).expect("set");

        let flags = state.capture_flags_state().expect("readable");
        assert_eq!(flags.len(), 2);
        assert_eq!(flags.get("trainingActive"), Some(&true));
    }

    #[test]
    fn replace_drops_previous_keys() {
        let state = CaptureState::new();
        state.set("sickActive", true).expect("set");
        state
            .replace(BTreeMap::from([("nsarTaken".to_string(), true)]))
            .expect("replace");

        let flags = state.capture_flags_state().expect("readable");
        assert_eq!(flags, BTreeMap::from([("nsarTaken".to_string(), true)]));
    }

    #[test]
    fn poisoned_lock_surfaces_as_capture_error() {
        let state = Arc::new(CaptureState::new());
        let writer = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = writer.flags.write().expect("lock");
            panic!("poison the capture state");
        })
        .join();

        let err = state.capture_flags_state().expect_err("poisoned");
        assert_eq!(err, CaptureError::Poisoned);
    }

    #[test]
    fn registry_holds_at_most_one_accessor() {
        let mut registry = CaptureRegistry::new();
        assert!(!registry.is_registered());

        registry.register(Arc::new(CaptureState::new()));
        assert!(registry.is_registered());

        registry.unregister();
        assert!(registry.accessor().is_none());
    }
}
