#![forbid(unsafe_code)]

//! Run config document handling for cfgsign.
//!
//! Provides an owned document over `roxmltree`, a view of the `<start>`
//! declarations under the root, and source-preserving text edits used to
//! record signatures.

pub mod document;
pub mod edit;
pub mod escape;
pub mod start;

pub use document::ConfigDocument;
pub use edit::TextEdit;
pub use start::{find_start, start_declarations, StartDeclaration};

/// Return roxmltree parsing options that allow DTD.
///
/// roxmltree does not resolve external entities, so a DTD in a run config is
/// harmless and is accepted rather than rejected.
pub fn parsing_options() -> roxmltree::ParsingOptions {
    roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    }
}
