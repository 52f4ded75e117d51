use crate::agent::prompt::PromptVariant;
use crate::content::interleave::Layout;
use crate::services::blogger::BloggerConfig;
use crate::services::images::ImageConfig;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default)]
    pub prompt_variant: PromptVariant,
    #[serde(default, deserialize_with = "deserialize_option_u64")]
    pub generation_timeout_secs: Option<u64>,

    #[serde(default = "default_products_dir")]
    pub products_dir: String,
    #[serde(default = "default_history_path")]
    pub history_path: String,

    #[serde(flatten)]
    pub blogger: BloggerConfig,
    #[serde(flatten)]
    pub images: ImageConfig,
    #[serde(flatten)]
    pub layout: LayoutConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(envy::prefixed("AUTOBLOG_").from_env::<AppConfig>()?)
    }
}

/// Interleaving knobs. Values arrive as strings because the struct is flattened.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct LayoutConfig {
    #[serde(
        rename = "layout_target_images",
        default,
        deserialize_with = "deserialize_option_usize"
    )]
    pub target_images: Option<usize>,
    #[serde(
        rename = "layout_lead_paragraphs",
        default,
        deserialize_with = "deserialize_option_usize"
    )]
    pub lead_paragraphs: Option<usize>,
    #[serde(
        rename = "layout_min_gap",
        default,
        deserialize_with = "deserialize_option_usize"
    )]
    pub min_gap: Option<usize>,
}

impl LayoutConfig {
    pub fn layout(&self) -> Layout {
        let defaults = Layout::default();
        Layout {
            target_images: self.target_images.unwrap_or(defaults.target_images),
            lead_paragraphs: self
                .lead_paragraphs
                .unwrap_or(defaults.lead_paragraphs)
                .min(Layout::MAX_LEAD_PARAGRAPHS),
            min_gap: self.min_gap.unwrap_or(defaults.min_gap),
        }
    }
}

pub(crate) fn deserialize_option_usize<'de, D>(deserializer: D) -> Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        s.trim()
            .parse::<usize>()
            .map(Some)
            .map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

pub(crate) fn deserialize_option_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    if let Some(s) = s {
        s.trim()
            .parse::<u64>()
            .map(Some)
            .map_err(serde::de::Error::custom)
    } else {
        Ok(None)
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_products_dir() -> String {
    "products".to_string()
}

fn default_history_path() -> String {
    "history.json".to_string()
}
