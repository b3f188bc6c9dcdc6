#![forbid(unsafe_code)]

//! Producing signature values for run binaries.
//!
//! [`Signer`] is the seam: the config procedure only asks for a signature of
//! a file with a key.  [`ExternalSigner`] fulfils it by running a signer
//! program such as `bin/signfile`.

pub mod external;
pub mod signer;

pub use external::ExternalSigner;
pub use signer::Signer;
