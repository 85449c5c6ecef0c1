use std::path::Path;

use shared::domain::{Attachment, QueryInput};
use tracing::debug;

use crate::error::InputError;

/// Holds the query text and attachment the user last entered.
#[derive(Debug, Default)]
pub struct InputCollector {
    text: String,
    attachment: Option<Attachment>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attach(&mut self, attachment: Attachment) {
        debug!(
            filename = %attachment.filename,
            size_bytes = attachment.size_bytes(),
            "attachment selected"
        );
        self.attachment = Some(attachment);
    }

    /// Reads `path` into memory and selects it as the attachment. The MIME
    /// type is guessed from the extension; the server decides whether it
    /// accepts the file.
    pub fn attach_file(&mut self, path: impl AsRef<Path>) -> Result<&Attachment, InputError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| InputError::MissingFileName {
                path: path.to_path_buf(),
            })?
            .to_string();
        let bytes = std::fs::read(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mime_type = mime_guess::from_path(path).first_raw().map(str::to_string);

        debug!(
            path = %path.display(),
            size_bytes = bytes.len(),
            mime_type = mime_type.as_deref().unwrap_or("<unknown>"),
            "attachment read from disk"
        );
        let attachment: &Attachment = self.attachment.insert(Attachment {
            filename,
            mime_type,
            bytes,
        });
        Ok(attachment)
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.attachment.take()
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }

    /// Drops the attachment once the request that carried it has resolved.
    /// The text stays so the user can refine the query.
    pub fn release_attachment(&mut self) {
        if self.attachment.take().is_some() {
            debug!("attachment released after request completion");
        }
    }

    pub fn snapshot(&self) -> QueryInput {
        QueryInput {
            text: self.text.clone(),
            attachment: self.attachment.clone(),
        }
    }
}
