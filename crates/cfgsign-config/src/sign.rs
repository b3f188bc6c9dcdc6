#![forbid(unsafe_code)]

//! Signature recording for one binary.
//!
//! The config is written only after the signer succeeded; every failure
//! leaves the file as it was.

use crate::context::SignContext;
use cfgsign_core::{layout, Error};
use cfgsign_xml::{find_start, ConfigDocument};
use std::path::Path;

/// Result of a [`sign_config`] call that did not fail.
#[derive(Debug)]
pub enum SignOutcome {
    /// The declaration for the binary now carries the new signature.
    Signed {
        /// Effective binary name of the matched declaration.
        name: String,
        /// Signature value recorded before this run, if any.
        previous: Option<String>,
        /// Value returned by the signer.
        signature: String,
        /// The updated config.
        document: ConfigDocument,
        /// Whether `document` was written back to disk.
        written: bool,
    },
    /// No declaration names the binary; nothing was signed or written.
    NoMatch,
}

/// Sign `binary_name` from `run_dir` and record the signature in
/// `<run_dir>/genode/config`.
pub fn sign_config(
    ctx: &SignContext,
    binary_name: &str,
    run_dir: &Path,
) -> Result<SignOutcome, Error> {
    if binary_name.is_empty() {
        return Err(Error::Usage("binary name must not be empty".into()));
    }

    let config_path = layout::config_path(run_dir);
    tracing::info!(
        binary = binary_name,
        run_dir = %run_dir.display(),
        config = %config_path.display(),
        "signing binary"
    );

    let mut document = ConfigDocument::load(&config_path)?;

    let (previous, signature, edit) = {
        let tree = document.parse_doc()?;

        let Some(decl) = find_start(&tree, binary_name) else {
            if ctx.strict {
                return Err(Error::NoMatch(binary_name.to_owned()));
            }
            tracing::warn!(binary = binary_name, "no start declaration for binary, nothing to do");
            return Ok(SignOutcome::NoMatch);
        };

        tracing::info!(name = binary_name, start = decl.name().unwrap_or(""), "binary found");

        let previous = decl.signature_value().map(str::to_owned);
        match &previous {
            Some(value) => tracing::info!(signature = %value, "existing signature"),
            None => tracing::info!("no existing signature"),
        }

        let binary_path = layout::binary_path(run_dir, binary_name);
        let signature = ctx.signer.sign(&binary_path, &ctx.key_path)?;
        let edit = decl.upsert_signature(&signature);
        (previous, signature, edit)
    };

    document.apply(&edit)?;

    let written = !ctx.dry_run;
    if written {
        document.write_to(&config_path)?;
        tracing::info!(config = %config_path.display(), "signature recorded");
    }

    Ok(SignOutcome::Signed {
        name: binary_name.to_owned(),
        previous,
        signature,
        document,
        written,
    })
}
