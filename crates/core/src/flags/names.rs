use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of health-tracking flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlagName {
    TrainingActive,
    LowIntakeActive,
    SickActive,
    ValsartanMissed,
    ForxigaMissed,
    NsarTaken,
    SaltHigh,
    ProteinHigh,
}

impl FlagName {
    /// Every known flag, in declaration order.
    pub const ALL: [FlagName; 8] = [
        FlagName::TrainingActive,
        FlagName::LowIntakeActive,
        FlagName::SickActive,
        FlagName::ValsartanMissed,
        FlagName::ForxigaMissed,
        FlagName::NsarTaken,
        FlagName::SaltHigh,
        FlagName::ProteinHigh,
    ];

    /// The wire name, shared by the live capture module and the legacy globals.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagName::TrainingActive => "trainingActive",
            FlagName::LowIntakeActive => "lowIntakeActive",
            FlagName::SickActive => "sickActive",
            FlagName::ValsartanMissed => "valsartanMissed",
            FlagName::ForxigaMissed => "forxigaMissed",
            FlagName::NsarTaken => "nsarTaken",
            FlagName::SaltHigh => "saltHigh",
            FlagName::ProteinHigh => "proteinHigh",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlagName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CoreError::UnknownFlag(s.to_string()))
    }
}
