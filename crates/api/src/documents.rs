// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Uploaded document storage.
//!
//! Documents live under one upload root. Rows store the path relative to
//! that root, and only relative paths made of plain components resolve.

use std::path::{Component, Path, PathBuf};

use rollcall_domain::DocumentKind;
use rollcall_persistence::DocumentPaths;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::forms::UploadedFile;

/// Document storage errors.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Writing a document to disk failed.
    #[error("Failed to write document '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// How stored documents are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentNaming<'a> {
    /// `<subdir>/<32 hex>_<sanitized name>`; never overwrites.
    Unique { subdir: &'a str },
    /// `profiles/profile_<id>.<ext>` or `documents/<kind>_<id>.<ext>`;
    /// a re-upload replaces the file.
    Deterministic { owner_id: i64 },
}

/// Filesystem store rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes every upload and returns the stored paths by slot.
    ///
    /// If any write fails, files already written by this call are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or file cannot be written.
    pub fn store_all(
        &self,
        uploads: &[(DocumentKind, &UploadedFile)],
        naming: DocumentNaming<'_>,
    ) -> Result<DocumentPaths, DocumentError> {
        let mut stored: DocumentPaths = DocumentPaths::default();

        for (kind, upload) in uploads {
            let relative: String = match naming {
                DocumentNaming::Unique { subdir } => unique_name(subdir, &upload.file_name),
                DocumentNaming::Deterministic { owner_id } => {
                    deterministic_name(*kind, owner_id, &upload.file_name)
                }
            };

            if let Err(err) = self.write(&relative, &upload.bytes) {
                self.discard_all(&stored);
                return Err(err);
            }
            stored.set(*kind, relative);
        }

        Ok(stored)
    }

    /// Removes every stored file in `paths`, logging failures.
    pub fn discard_all(&self, paths: &DocumentPaths) {
        for kind in DocumentKind::ALL {
            if let Some(relative) = paths.get(kind) {
                self.discard(relative);
            }
        }
    }

    /// Removes one stored file, logging failures.
    pub fn discard(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            return;
        };
        if let Err(e) = std::fs::remove_file(&path) {
            warn!(path = %path.display(), error = %e, "Failed to remove document");
        }
    }

    /// Maps a stored relative path to a file under the root.
    ///
    /// # Returns
    ///
    /// `None` for empty, absolute, or parent-relative paths.
    #[must_use]
    pub fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path: &Path = Path::new(relative);
        let plain: bool = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        (!relative.is_empty() && plain).then(|| self.root.join(path))
    }

    fn write(&self, relative: &str, bytes: &[u8]) -> Result<(), DocumentError> {
        let path: PathBuf = self.root.join(relative);
        let to_error = |source: std::io::Error| DocumentError::Write {
            path: relative.to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(to_error)?;
        }
        std::fs::write(&path, bytes).map_err(to_error)?;

        debug!(path = relative, size = bytes.len(), "Document stored");
        Ok(())
    }
}

/// Reduces a client file name to a safe single path component.
///
/// Directory parts are dropped and characters other than ASCII
/// alphanumerics, `.`, `-`, and `_` become `_`.
#[must_use]
pub fn sanitize_file_name(file_name: &str) -> String {
    let base: &str = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed: &str = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        String::from("upload")
    } else {
        trimmed.to_string()
    }
}

fn extension_of(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

fn unique_name(subdir: &str, file_name: &str) -> String {
    format!(
        "{subdir}/{}_{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(file_name)
    )
}

fn deterministic_name(kind: DocumentKind, owner_id: i64, file_name: &str) -> String {
    format!(
        "{}/{}_{owner_id}.{}",
        kind.deterministic_dir(),
        kind.stem(),
        extension_of(file_name)
    )
}

/// `Content-Type` for a stored document.
#[must_use]
pub fn content_type(relative: &str) -> &'static str {
    match extension_of(relative).as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
