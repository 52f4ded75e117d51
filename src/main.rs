use anyhow::Context;
use autoblog::agent::GeminiWriter;
use autoblog::catalog::history::HistoryStore;
use autoblog::catalog::Catalog;
use autoblog::config::AppConfig;
use autoblog::pipeline::{Pipeline, PipelineError};
use autoblog::services::blogger::BloggerPublisher;
use autoblog::services::images::ImageHandler;
use env_logger::Env;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse the specified (or default) .env file
    let dotenv_path = env::var("AUTOBLOG_DOTENV_PATH").unwrap_or_else(|_| ".env".to_string());
    let dotenv_result = dotenvy::from_path(&dotenv_path);

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match dotenv_result {
        Ok(()) => log::info!("Loaded env from {}", dotenv_path),
        Err(err) => log::debug!("No .env loaded from {}: {}", dotenv_path, err),
    }

    let config = AppConfig::from_env().context("Reading configuration")?;

    // Fatal configuration problems surface here, before anything is selected.
    let publisher =
        BloggerPublisher::new(config.blogger.clone()).context("Configuring Blogger")?;
    let images = ImageHandler::new(config.images.clone()).context("Configuring images")?;
    let writer = GeminiWriter::new(&config).context("Configuring Gemini")?;
    let catalog = Catalog::new(&config.products_dir).context("Opening product catalog")?;
    let history = HistoryStore::new(&config.history_path);

    let pipeline = Pipeline::new(
        catalog,
        history,
        writer,
        publisher,
        images,
        config.layout.layout(),
    );

    let today = chrono::Local::now().date_naive();
    let mut rng = rand::thread_rng();

    match pipeline.run(today, &mut rng).await {
        Ok(report) => {
            log::info!(
                "published '{}' for {} with {} promotion blocks and labels {:?}",
                report.title,
                report.record_id,
                report.promotion_blocks,
                report.labels
            );
            println!("{}", report.post.url);
            Ok(())
        }
        Err(err @ PipelineError::Publish { .. }) => {
            log::error!("{}", err);
            Ok(())
        }
        Err(err) => Err(err).context("Run aborted"),
    }
}
