pub mod history;
pub mod selector;

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Products directory not found: {0}")]
    MissingDirectory(String),
    #[error("Invalid product record {path}: {reason}")]
    InvalidRecord { path: String, reason: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// One product entry. The identifier comes from the file stem, not the file body.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub niche: String,
    pub target_keywords: String,
    pub affiliate_link: String,
    pub image_urls: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct RecordFile {
    product_name: String,
    #[serde(default = "default_niche")]
    niche: String,
    #[serde(default = "default_target_keywords")]
    target_keywords: String,
    affiliate_link: String,
    #[serde(default)]
    image_urls: Vec<String>,
}

fn default_niche() -> String {
    "General".to_string()
}

fn default_target_keywords() -> String {
    "health enthusiasts".to_string()
}

/// A directory of `<id>.json` product files.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let root = dir.into();
        if !root.is_dir() {
            return Err(CatalogError::MissingDirectory(root.display().to_string()));
        }
        Ok(Self { root })
    }

    /// Record identifiers in lexical order.
    pub fn ids(&self) -> Result<Vec<String>, CatalogError> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Reading {}", self.root.display()))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();

        log::debug!("found {} product records in {}", ids.len(), self.root.display());
        Ok(ids)
    }

    pub fn load(&self, id: &str) -> Result<ProductRecord, CatalogError> {
        let path = self.record_path(id);
        let body =
            fs::read_to_string(&path).with_context(|| format!("Reading {}", path.display()))?;
        let file: RecordFile =
            serde_json::from_str(&body).map_err(|err| CatalogError::InvalidRecord {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?;

        Ok(ProductRecord {
            id: id.to_string(),
            name: file.product_name,
            niche: file.niche,
            target_keywords: file.target_keywords,
            affiliate_link: file.affiliate_link,
            image_urls: file
                .image_urls
                .into_iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
        })
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}
