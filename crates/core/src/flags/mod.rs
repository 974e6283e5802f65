//! Health-tracking flag resolution.
//!
//! A [`FlagSnapshot`] is produced by one of two strategies chosen when the [`FlagResolver`] is
//! built:
//! - the live capture module's own state accessor, registered in a [`CaptureRegistry`], or
//! - the [`LegacyGlobals`], one ambient value per known flag name.
//!
//! The live strategy supplies the whole snapshot verbatim. When it fails the resolver falls back
//! to the legacy globals for that call and reports the failure through [`ResolvedVia`].

mod capture;
mod legacy;
mod names;
mod resolver;
mod snapshot;
mod source;

pub use capture::{CaptureRegistry, CaptureState, CaptureStateAccessor};
pub use legacy::{truthy, LegacyGlobals};
pub use names::FlagName;
pub use resolver::{FlagResolution, FlagResolver, ResolvedVia};
pub use snapshot::FlagSnapshot;
pub use source::{FlagSource, LegacyFlagSource, LiveFlagSource};
