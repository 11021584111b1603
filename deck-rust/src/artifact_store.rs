use crate::{DeckError, DeckResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// URL prefix under which the artifact directory is served.
pub const PUBLIC_PREFIX: &str = "/generated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Png,
    Html,
}

impl ArtifactKind {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Html => "html",
        }
    }
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_` so a session id
/// is safe to embed in a file name.
#[must_use]
pub fn sanitize_session_id(session_id: &str) -> String {
    session_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes page artifacts into one directory under deterministic names
/// `page_{session}_{index}.{ext}`. Concurrent pages never share a file.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> DeckResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| DeckError::Io {
                path: self.dir.clone(),
                source,
            })
    }

    #[must_use]
    pub fn file_name(session_id: &str, page_index: usize, kind: ArtifactKind) -> String {
        format!(
            "page_{}_{page_index}.{}",
            sanitize_session_id(session_id),
            kind.extension()
        )
    }

    /// Write `bytes` and return the public URL of the file.
    pub async fn write(
        &self,
        session_id: &str,
        page_index: usize,
        kind: ArtifactKind,
        bytes: &[u8],
    ) -> DeckResult<String> {
        let file_name = Self::file_name(session_id, page_index, kind);
        let path = self.dir.join(&file_name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| DeckError::Io {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    /// Remove the file behind a public URL. URLs outside [`PUBLIC_PREFIX`]
    /// and files that are already gone are ignored.
    pub async fn remove_public(&self, public_url: &str) -> DeckResult<bool> {
        let Some(file_name) = public_url
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && !name.contains(['/', '\\']) && *name != "..")
        else {
            return Ok(false);
        };

        let path = self.dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(DeckError::Io { path, source }),
        }
    }
}
