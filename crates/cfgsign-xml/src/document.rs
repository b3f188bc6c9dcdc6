#![forbid(unsafe_code)]

//! Owned run config document with validated parsing and atomic save.

use crate::edit::TextEdit;
use cfgsign_core::Error;
use std::io::Write;
use std::path::Path;

/// An owned XML run config.  Stores the source text only.
///
/// To work with the parsed tree, call [`ConfigDocument::parse_doc`] which
/// returns a temporary `roxmltree::Document` borrowing from the text.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    text: String,
}

impl ConfigDocument {
    /// Parse and validate XML from a string, taking ownership.
    pub fn parse(text: String) -> Result<Self, Error> {
        validate(&text)?;
        Ok(Self { text })
    }

    /// Parse and validate XML from bytes.
    pub fn parse_bytes(data: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8: {e}")))?
            .to_owned();
        Self::parse(text)
    }

    /// Read and parse the config at `path`.
    ///
    /// A missing file is reported as [`Error::ConfigNotFound`], distinct from
    /// other read failures.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ConfigNotFound(path.to_path_buf()),
            _ => Error::Io(e),
        })?;
        Self::parse_bytes(&data)
            .map_err(|e| match e {
                Error::XmlParse(msg) => Error::XmlParse(format!("{}: {msg}", path.display())),
                other => other,
            })
    }

    /// Get the raw XML text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the document and return a temporary `roxmltree::Document`.
    pub fn parse_doc(&self) -> Result<roxmltree::Document<'_>, Error> {
        roxmltree::Document::parse_with_options(&self.text, crate::parsing_options())
            .map_err(|e| Error::XmlParse(e.to_string()))
    }

    /// Apply an edit to the source text.
    ///
    /// The edited text must still be well-formed; otherwise the document is
    /// left unchanged and [`Error::XmlStructure`] is returned.
    pub fn apply(&mut self, edit: &TextEdit) -> Result<(), Error> {
        let edited = edit.apply(&self.text)?;
        validate(&edited).map_err(|e| Error::XmlStructure(format!("edit produced invalid XML: {e}")))?;
        self.text = edited;
        Ok(())
    }

    /// Write the document to `path`, replacing the file atomically.
    ///
    /// A symlinked `path` is followed and the target is replaced.  The text
    /// goes to a temporary file next to the target, takes over the existing
    /// file's permissions and is then renamed over it, so readers see either
    /// the old or the new config.
    pub fn write_to(&self, path: &Path) -> Result<(), Error> {
        let target = match std::fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => path.to_path_buf(),
            Err(e) => return Err(Error::Io(e)),
        };
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
        temp_file.write_all(self.text.as_bytes())?;
        if let Ok(existing) = std::fs::metadata(&target) {
            temp_file.as_file().set_permissions(existing.permissions())?;
        }
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(&target)
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!(path = %target.display(), bytes = self.text.len(), "config written");
        Ok(())
    }
}

fn validate(text: &str) -> Result<(), Error> {
    roxmltree::Document::parse_with_options(text, crate::parsing_options())
        .map(|_| ())
        .map_err(|e| Error::XmlParse(e.to_string()))
}
