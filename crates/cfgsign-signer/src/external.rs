#![forbid(unsafe_code)]

//! Signer backed by an external program.
//!
//! The program is run as `<program> [args...] <binary> <key>` and blocks
//! until it exits.  stdout and stderr share one pipe, so the signature is
//! everything the program printed, in the order it printed it, minus one
//! trailing newline.  Exit status 0 means success.

use crate::signer::Signer;
use cfgsign_core::{layout, Error};
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Runs a signer executable such as `bin/signfile`.
#[derive(Debug, Clone)]
pub struct ExternalSigner {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ExternalSigner {
    /// Use `program`, resolved like any [`Command`] program.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Arguments passed before the binary and key paths.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for ExternalSigner {
    fn default() -> Self {
        Self::new(layout::DEFAULT_SIGNER)
    }
}

impl Signer for ExternalSigner {
    fn sign(&self, binary: &Path, key: &Path) -> Result<String, Error> {
        tracing::debug!(
            program = %self.program.display(),
            binary = %binary.display(),
            key = %key.display(),
            "running signer"
        );

        let (mut reader, writer) = std::io::pipe()?;
        let writer_err = writer.try_clone()?;

        let mut child = {
            // The command owns both pipe writers; it must be dropped before
            // reading or the reader never sees EOF.
            let mut cmd = Command::new(&self.program);
            cmd.args(&self.args)
                .arg(binary)
                .arg(key)
                .stdin(Stdio::null())
                .stdout(writer)
                .stderr(writer_err);
            cmd.spawn().map_err(|source| Error::SignerSpawn {
                program: self.program.clone(),
                source,
            })?
        };

        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let status = child.wait()?;

        let text = match decode_output(raw) {
            Ok(text) => text,
            Err(lossy) => {
                tracing::warn!(status = %status, output = %lossy, "signer output is not valid UTF-8");
                return Err(Error::Signing {
                    status: format!("{status}, output is not valid UTF-8"),
                    output: lossy,
                });
            }
        };
        tracing::info!(status = %status, output = %text, "signer finished");

        if status.success() {
            Ok(text)
        } else {
            Err(Error::Signing {
                status: status.to_string(),
                output: text,
            })
        }
    }
}

/// Decode the captured output and drop one trailing newline.
///
/// Non-UTF-8 output cannot be stored verbatim; it is returned lossily as
/// the error so it can still be reported.
fn decode_output(raw: Vec<u8>) -> Result<String, String> {
    let mut text = match String::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => return Err(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    };
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
