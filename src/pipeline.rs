use chrono::NaiveDate;
use rand::Rng;

use crate::agent::{ArticleWriter, GenerationError};
use crate::catalog::history::HistoryStore;
use crate::catalog::selector::{select, CooldownPolicy, SelectError};
use crate::catalog::{Catalog, CatalogError};
use crate::content::interleave::{interleave, select_images, Layout};
use crate::content::labels;
use crate::content::normalize::{normalize_or_placeholder, placeholder, ParseOutcome};
use crate::services::blogger::{wrap_body, PostPublisher, PublishError, PublishedPost};
use crate::services::images::ImageHandler;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("publishing {record_id} failed: {source}")]
    Publish {
        record_id: String,
        #[source]
        source: PublishError,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub record_id: String,
    pub title: String,
    pub post: PublishedPost,
    pub outcome: ParseOutcome,
    pub promotion_blocks: usize,
    pub labels: Vec<String>,
}

pub struct Pipeline<W, P> {
    catalog: Catalog,
    history: HistoryStore,
    writer: W,
    publisher: P,
    images: ImageHandler,
    layout: Layout,
    cooldown: CooldownPolicy,
}

impl<W: ArticleWriter, P: PostPublisher> Pipeline<W, P> {
    pub fn new(
        catalog: Catalog,
        history: HistoryStore,
        writer: W,
        publisher: P,
        images: ImageHandler,
        layout: Layout,
    ) -> Self {
        Self {
            catalog,
            history,
            writer,
            publisher,
            images,
            layout,
            cooldown: CooldownPolicy::default(),
        }
    }

    /// Runs one select, write, publish cycle. History is only written once the
    /// post exists.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<RunReport, PipelineError> {
        let ids = self.catalog.ids()?;
        let mut history = self.history.load();
        let record_id = select(&ids, &history, self.cooldown, today, rng)?.to_string();
        log::info!("starting run for {}", record_id);

        let product = self.catalog.load(&record_id)?;

        let normalized = match self.writer.write(&product).await {
            Ok(raw) => normalize_or_placeholder(&raw, &product.name),
            Err(err) => {
                log_generation_failure(&err);
                placeholder(&product.name)
            }
        };
        if normalized.outcome != ParseOutcome::Clean {
            log::info!("article parsed with outcome {:?}", normalized.outcome);
        }
        let article = &normalized.article;

        let candidates = ImageHandler::usable_urls(&product.image_urls);
        if candidates.is_empty() {
            log::warn!("{} has no usable images, publishing text only", record_id);
        }
        let chosen = select_images(&candidates, self.layout.target_images, rng);
        log::debug!(
            "resolving {} images ({:?})",
            chosen.len(),
            self.images.strategy()
        );
        let images = self.images.resolve_all(&chosen).await;

        let body = interleave(
            article.title(),
            article.paragraphs(),
            &images,
            &product.affiliate_link,
            &self.layout,
        );
        let labels = labels::derive(&product);
        let content = wrap_body(&body.html);

        let post = self
            .publisher
            .publish(article.title(), &content, &labels)
            .await
            .map_err(|source| PipelineError::Publish {
                record_id: record_id.clone(),
                source,
            })?;
        log::info!("published {}", post.url);

        self.history
            .record_usage(&mut history, &record_id, today)?;

        Ok(RunReport {
            record_id,
            title: article.title().to_string(),
            post,
            outcome: normalized.outcome,
            promotion_blocks: body.promotion_blocks,
            labels,
        })
    }
}

fn log_generation_failure(err: &GenerationError) {
    match err {
        GenerationError::Timeout(_) | GenerationError::Empty => {
            log::warn!("{}, using placeholder content", err)
        }
        GenerationError::Other(err) => {
            log::warn!("article generation failed: {:#}, using placeholder content", err)
        }
    }
}
