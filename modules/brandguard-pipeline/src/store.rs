//! The pipeline's seam onto the Graph Store.
//!
//! Workflows talk to `MentionStore` instead of `GraphWriter` directly, so
//! tests run against `testing::MockMentionStore` with no database.

use async_trait::async_trait;

use brandguard_common::{BrandGuardError, MentionRecord, NewCorrection, NewMention, StoredMention};
use brandguard_graph::GraphWriter;

#[async_trait]
pub trait MentionStore: Send + Sync {
    /// Persist a scored mention and its relationships.
    async fn store_mention(&self, mention: &NewMention) -> Result<StoredMention, BrandGuardError>;

    /// Read a mention back with its brand and cited sources.
    async fn get_mention(&self, id: &str) -> Result<Option<MentionRecord>, BrandGuardError>;

    /// Persist a correction for an existing mention. NotFound when the
    /// mention does not exist.
    async fn store_correction(&self, correction: &NewCorrection)
        -> Result<String, BrandGuardError>;

    /// Attach later-discovered sources to a mention. Returns relationships
    /// created.
    async fn link_mention_sources(
        &self,
        mention_id: &str,
        urls: &[String],
    ) -> Result<u32, BrandGuardError>;
}

#[async_trait]
impl MentionStore for GraphWriter {
    async fn store_mention(&self, mention: &NewMention) -> Result<StoredMention, BrandGuardError> {
        GraphWriter::store_mention(self, mention).await
    }

    async fn get_mention(&self, id: &str) -> Result<Option<MentionRecord>, BrandGuardError> {
        GraphWriter::get_mention(self, id).await
    }

    async fn store_correction(
        &self,
        correction: &NewCorrection,
    ) -> Result<String, BrandGuardError> {
        GraphWriter::store_correction(self, correction).await
    }

    async fn link_mention_sources(
        &self,
        mention_id: &str,
        urls: &[String],
    ) -> Result<u32, BrandGuardError> {
        GraphWriter::link_mention_sources(self, mention_id, urls).await
    }
}
