#![forbid(unsafe_code)]

//! Sign context — holds the signer and settings for one invocation.

use cfgsign_core::layout;
use cfgsign_signer::{ExternalSigner, Signer};
use std::path::PathBuf;

/// Context for signing a run config.
pub struct SignContext {
    /// Produces the signature value.
    pub signer: Box<dyn Signer>,
    /// Private key handed to the signer.
    pub key_path: PathBuf,
    /// Report a missing declaration as an error instead of a no-op.
    pub strict: bool,
    /// Compute the updated config without writing it.
    pub dry_run: bool,
}

impl SignContext {
    /// Create a context with the given signer and the default key path.
    pub fn new(signer: Box<dyn Signer>) -> Self {
        Self {
            signer,
            key_path: PathBuf::from(layout::DEFAULT_KEY),
            strict: false,
            dry_run: false,
        }
    }

    /// Set the private key path.
    pub fn with_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.key_path = key_path.into();
        self
    }
}

impl Default for SignContext {
    /// `bin/signfile` with `bin/private.key`.
    fn default() -> Self {
        Self::new(Box::new(ExternalSigner::default()))
    }
}
