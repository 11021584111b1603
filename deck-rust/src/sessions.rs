use crate::{Artifact, ArtifactStore, DeckResult};
use futures::future::try_join_all;
use serde::Serialize;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

/// Artifacts of one editing session keyed by page index. Regenerating a page
/// overwrites its entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionArtifacts {
    pages: BTreeMap<usize, Artifact>,
}

impl SessionArtifacts {
    pub fn insert(&mut self, page_index: usize, artifact: Artifact) -> Option<Artifact> {
        self.pages.insert(page_index, artifact)
    }

    #[must_use]
    pub fn get(&self, page_index: usize) -> Option<&Artifact> {
        self.pages.get(&page_index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Entries in page order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Artifact)> {
        self.pages.iter().map(|(index, artifact)| (*index, artifact))
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageArtifact {
    pub page_index: usize,
    #[serde(flatten)]
    pub artifact: Artifact,
}

/// All sessions known to the server, keyed by sanitized session id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionArtifacts>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionArtifacts>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, session_id: &str, page_index: usize, artifact: Artifact) {
        self.sessions()
            .entry(session_id.to_string())
            .or_default()
            .insert(page_index, artifact);
    }

    /// Artifacts of `session_id` in page order; empty for unknown sessions.
    #[must_use]
    pub fn list(&self, session_id: &str) -> Vec<PageArtifact> {
        self.sessions()
            .get(session_id)
            .map(|session| {
                session
                    .iter()
                    .map(|(page_index, artifact)| PageArtifact {
                        page_index,
                        artifact: artifact.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Forget `session_id` and delete its files. Returns the number of files
    /// removed.
    pub async fn reset(&self, session_id: &str, store: &ArtifactStore) -> DeckResult<usize> {
        let Some(session) = self.sessions().remove(session_id) else {
            return Ok(0);
        };

        let removed = try_join_all(
            session
                .iter()
                .map(|(_, artifact)| store.remove_public(&artifact.image_url)),
        )
        .await?;

        Ok(removed.into_iter().filter(|removed| *removed).count())
    }
}
