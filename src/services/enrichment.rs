use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::{
    models::{EnrichedDetail, MovieId},
    services::providers::MetadataProvider,
};

/// Details for one movie plus the failure message when the fetch failed
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichOutcome {
    pub detail: EnrichedDetail,
    pub error: Option<String>,
}

/// Turns movie ids into display-ready details. Never fails outward: fetch
/// errors become placeholder details with the error carried alongside.
#[derive(Clone)]
pub struct Enricher {
    provider: Arc<dyn MetadataProvider>,
    image_base_url: Arc<str>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(provider: Arc<dyn MetadataProvider>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            image_base_url: Arc::from(image_base_url.into()),
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` fetches in flight for one `enrich_all` call
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn enrich(&self, id: MovieId) -> EnrichOutcome {
        match self.provider.fetch(id).await {
            Ok(metadata) => EnrichOutcome {
                detail: EnrichedDetail::from_metadata(metadata, &self.image_base_url),
                error: None,
            },
            Err(e) => {
                tracing::warn!(
                    movie_id = %id,
                    provider = self.provider.name(),
                    error = %e,
                    "Metadata fetch failed, using placeholders"
                );
                EnrichOutcome {
                    detail: EnrichedDetail::fetch_failed(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Enriches each id, returning outcomes in the same order as `ids`
    pub async fn enrich_all(&self, ids: &[MovieId]) -> Vec<EnrichOutcome> {
        if self.concurrency <= 1 || ids.len() <= 1 {
            let mut outcomes = Vec::with_capacity(ids.len());
            for &id in ids {
                outcomes.push(self.enrich(id).await);
            }
            return outcomes;
        }

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = Vec::with_capacity(ids.len());

        for &id in ids {
            let enricher = self.clone();
            let permits = permits.clone();
            let task = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await;
                enricher.enrich(id).await
            });
            tasks.push((id, task));
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (id, task) in tasks {
            let outcome = match task.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(movie_id = %id, error = %e, "Enrichment task join error");
                    EnrichOutcome {
                        detail: EnrichedDetail::fetch_failed(),
                        error: Some(format!("Internal error: {}", e)),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
