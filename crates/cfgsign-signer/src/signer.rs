#![forbid(unsafe_code)]

use cfgsign_core::Error;
use std::path::Path;

/// Produces an opaque signature value for a binary file.
pub trait Signer {
    /// Sign the file at `binary` with the private key at `key`.
    ///
    /// The returned text is stored verbatim in the config.  A signer that
    /// fails returns [`Error::Signing`] or [`Error::SignerSpawn`].
    fn sign(&self, binary: &Path, key: &Path) -> Result<String, Error>;
}

impl<F> Signer for F
where
    F: Fn(&Path, &Path) -> Result<String, Error>,
{
    fn sign(&self, binary: &Path, key: &Path) -> Result<String, Error> {
        self(binary, key)
    }
}
