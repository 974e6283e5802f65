use super::FlagName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A point-in-time view of flag state.
///
/// Snapshots are built fresh on every resolution and never mutated afterwards. A snapshot from
/// the legacy path always holds exactly the keys in [`FlagName::ALL`]; a snapshot from the live
/// capture module holds whatever keys the module reported.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSnapshot(BTreeMap<String, bool>);

impl FlagSnapshot {
    /// Wrap a mapping as-is. No keys are added or removed.
    pub fn from_map(map: BTreeMap<String, bool>) -> Self {
        Self(map)
    }

    /// Raw lookup by wire name; `None` when the key is absent.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Whether `flag` is set. An absent key reads as `false`.
    pub fn is_active(&self, flag: FlagName) -> bool {
        self.get(flag.as_str()).unwrap_or(false)
    }

    /// Keys whose value is `true`.
    pub fn active_flags(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, active)| **active)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, bool> {
        self.0
    }
}

impl From<BTreeMap<String, bool>> for FlagSnapshot {
    fn from(map: BTreeMap<String, bool>) -> Self {
        Self::from_map(map)
    }
}
