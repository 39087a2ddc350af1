//! Configuration and input types for signing operations.
//!
//! [`SignerSettings`] carries the fixed signing policy (timestamp authority,
//! digest, timeouts, known install locations, package-manager backends).
//! [`Credential`] and [`ArtifactList`] are the per-batch inputs.

mod artifacts;
mod builder;
mod core;
mod credential;

pub use artifacts::ArtifactList;
pub use builder::SignerSettingsBuilder;
pub use self::core::{PackageBackend, SignerSettings};
pub use credential::Credential;
