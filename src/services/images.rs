use anyhow::Context;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::config::deserialize_option_u64;

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Invalid image URL: {0}")]
    InvalidUrl(String),
    #[error("AUTOBLOG_IMAGE_HOST_API_KEY must be set for the rehosted image strategy")]
    MissingApiKey,
    #[error("Image request failed (status {status}): {body}")]
    ApiStatus { status: u16, body: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Where the images in a post are served from.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageStrategy {
    /// Hotlink the record's URLs.
    #[default]
    Direct,
    /// Upload each URL to an ImgBB-compatible host and link the copy.
    Rehosted,
    /// Download each image and inline it as a `data:` URI.
    Embedded,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ImageConfig {
    #[serde(rename = "image_strategy", default)]
    pub strategy: ImageStrategy,
    #[serde(rename = "image_host_api_key")]
    pub host_api_key: Option<String>,
    #[serde(rename = "image_host_url")]
    pub host_url: Option<String>,
    #[serde(
        rename = "image_timeout_secs",
        default,
        deserialize_with = "deserialize_option_u64"
    )]
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Deserialize, Debug)]
struct UploadData {
    url: String,
}

#[derive(Debug, Clone)]
pub struct ImageHandler {
    strategy: ImageStrategy,
    api_key: Option<String>,
    host_url: String,
    client: Client,
}

impl ImageHandler {
    pub fn new(config: ImageConfig) -> Result<Self, ImageError> {
        let api_key = config
            .host_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if config.strategy == ImageStrategy::Rehosted && api_key.is_none() {
            return Err(ImageError::MissingApiKey);
        }

        let host_url = config
            .host_url
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "https://api.imgbb.com".to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.unwrap_or(15)))
            .user_agent("autoblog/0.1")
            .build()
            .context("Failed to build image HTTP client")?;

        Ok(Self {
            strategy: config.strategy,
            api_key,
            host_url,
            client,
        })
    }

    pub fn strategy(&self) -> ImageStrategy {
        self.strategy
    }

    /// Keeps the URLs that [`resolve`](Self::resolve) would accept, in order.
    pub fn usable_urls(urls: &[String]) -> Vec<String> {
        urls.iter()
            .filter(|url| match parse_image_url(url) {
                Ok(_) => true,
                Err(_) => {
                    log::warn!("skipping invalid image URL {}", url);
                    false
                }
            })
            .cloned()
            .collect()
    }

    /// Resolves each distinct image once, in order, and maps the result back
    /// onto every position it appears in. Invalid URLs are dropped; a failed
    /// upload or download keeps the original URL.
    pub async fn resolve_all(&self, urls: &[String]) -> Vec<String> {
        let mut cache: HashMap<&str, Option<String>> = HashMap::new();
        let mut resolved = Vec::with_capacity(urls.len());
        for url in urls {
            if !cache.contains_key(url.as_str()) {
                let src = match self.resolve(url).await {
                    Ok(src) => Some(src),
                    Err(ImageError::InvalidUrl(bad)) => {
                        log::warn!("skipping invalid image URL {}", bad);
                        None
                    }
                    Err(err) => {
                        log::warn!("image {} unavailable ({}), linking original", url, err);
                        Some(url.clone())
                    }
                };
                cache.insert(url.as_str(), src);
            }
            if let Some(Some(src)) = cache.get(url.as_str()) {
                resolved.push(src.clone());
            }
        }
        resolved
    }

    pub async fn resolve(&self, url: &str) -> Result<String, ImageError> {
        let parsed = parse_image_url(url)?;
        match self.strategy {
            ImageStrategy::Direct => Ok(url.to_string()),
            ImageStrategy::Rehosted => self.rehost(&parsed).await,
            ImageStrategy::Embedded => self.embed(&parsed).await,
        }
    }

    async fn rehost(&self, url: &Url) -> Result<String, ImageError> {
        let api_key = self.api_key.as_deref().ok_or(ImageError::MissingApiKey)?;
        log::info!("re-hosting {}...", url);

        let endpoint = format!("{}/1/upload", self.host_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&endpoint)
            .form(&[("key", api_key), ("image", url.as_str())])
            .send()
            .await
            .context("Image upload request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiStatus { status, body });
        }

        let upload: UploadResponse = response.json().await.context("Image upload JSON")?;
        Ok(upload.data.url)
    }

    async fn embed(&self, url: &Url) -> Result<String, ImageError> {
        log::info!("embedding {}...", url);
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .context("Image download failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::ApiStatus { status, body });
        }

        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| value.starts_with("image/"))
            .unwrap_or_else(|| "image/jpeg".to_string());
        let bytes = response.bytes().await.context("Image body")?;

        Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
    }
}

fn parse_image_url(url: &str) -> Result<Url, ImageError> {
    let parsed = Url::parse(url).map_err(|_| ImageError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ImageError::InvalidUrl(url.to_string()));
    }
    Ok(parsed)
}
