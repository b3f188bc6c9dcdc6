#![forbid(unsafe_code)]

//! Recording binary signatures in a Genode run config.
//!
//! [`sign::sign_config`] is the whole procedure: load `<run_dir>/genode/config`,
//! find the `<start>` declaration for a binary, have a [`cfgsign_signer::Signer`]
//! sign the binary, and store the result as `<signature value="…"/>`.

pub mod context;
pub mod sign;

pub use context::SignContext;
pub use sign::{sign_config, SignOutcome};
