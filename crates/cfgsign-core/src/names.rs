#![forbid(unsafe_code)]

//! Element, attribute and file layout names used across the workspace.

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    pub const START: &str = "start";
    pub const BINARY: &str = "binary";
    pub const SIGNATURE: &str = "signature";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
}

// ── Run directory layout ─────────────────────────────────────────────

pub mod layout {
    use std::path::{Path, PathBuf};

    /// Directory under the run directory holding the config and binaries.
    pub const GENODE_DIR: &str = "genode";

    /// Config file name inside [`GENODE_DIR`].
    pub const CONFIG_FILE: &str = "config";

    /// Default signer executable, relative to the working directory.
    pub const DEFAULT_SIGNER: &str = "bin/signfile";

    /// Default private key, relative to the working directory.
    pub const DEFAULT_KEY: &str = "bin/private.key";

    /// `<run_dir>/genode/config`
    pub fn config_path(run_dir: &Path) -> PathBuf {
        run_dir.join(GENODE_DIR).join(CONFIG_FILE)
    }

    /// `<run_dir>/genode/<binary>`
    pub fn binary_path(run_dir: &Path, binary: &str) -> PathBuf {
        run_dir.join(GENODE_DIR).join(binary)
    }

}
