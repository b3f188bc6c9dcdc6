#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Errors produced while signing a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("usage: {0}")]
    Usage(String),

    #[error("configuration not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("XML parsing error: {0}")]
    XmlParse(String),

    #[error("invalid XML structure: {0}")]
    XmlStructure(String),

    #[error("no start declaration for binary: {0}")]
    NoMatch(String),

    #[error("failed to run signer {}: {source}", program.display())]
    SignerSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("signing error ({status}): {output}")]
    Signing { status: String, output: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
