use anyhow::Context;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DISCLOSURE: &str = "Disclosure: this article contains affiliate links. \
If you buy through them we may earn a commission at no extra cost to you.";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Blogger blog id must contain digits, got {0:?}")]
    InvalidBlogId(String),
    #[error("AUTOBLOG_{0} must be set")]
    MissingCredential(&'static str),
    #[error("Blogger authentication failed (status {status}): {body}")]
    Auth { status: u16, body: String },
    #[error("Blogger API error (status {status}): {body}")]
    ApiStatus { status: u16, body: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Deserialize, Debug, Clone)]
pub struct BloggerConfig {
    #[serde(rename = "blogger_blog_id")]
    pub blog_id: String,
    #[serde(rename = "blogger_client_id")]
    pub client_id: String,
    #[serde(rename = "blogger_client_secret")]
    pub client_secret: String,
    #[serde(rename = "blogger_refresh_token")]
    pub refresh_token: String,
    #[serde(rename = "blogger_api_url", default = "default_api_url")]
    pub api_url: String,
    #[serde(rename = "blogger_token_url", default = "default_token_url")]
    pub token_url: String,
}

fn default_api_url() -> String {
    "https://www.googleapis.com".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    pub id: String,
    pub url: String,
}

#[derive(Serialize, Debug)]
struct NewPost<'a> {
    kind: &'static str,
    title: &'a str,
    content: &'a str,
    labels: &'a [String],
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize, Debug)]
struct PostResponse {
    id: String,
    url: String,
}

/// The create-post boundary.
#[allow(async_fn_in_trait)]
pub trait PostPublisher {
    async fn publish(
        &self,
        title: &str,
        content_html: &str,
        labels: &[String],
    ) -> Result<PublishedPost, PublishError>;
}

#[derive(Debug, Clone)]
pub struct BloggerPublisher {
    config: BloggerConfig,
    blog_id: String,
    client: Client,
}

impl BloggerPublisher {
    pub fn new(mut config: BloggerConfig) -> Result<Self, PublishError> {
        let blog_id = clean_blog_id(&config.blog_id)
            .ok_or_else(|| PublishError::InvalidBlogId(config.blog_id.clone()))?;

        for (name, value) in [
            ("BLOGGER_CLIENT_ID", &mut config.client_id),
            ("BLOGGER_CLIENT_SECRET", &mut config.client_secret),
            ("BLOGGER_REFRESH_TOKEN", &mut config.refresh_token),
        ] {
            *value = value.trim().to_string();
            if value.is_empty() {
                return Err(PublishError::MissingCredential(name));
            }
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("autoblog/0.1")
            .build()
            .context("Failed to build Blogger HTTP client")?;
        Ok(Self {
            config,
            blog_id,
            client,
        })
    }

    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    async fn access_token(&self) -> Result<String, PublishError> {
        log::info!("authenticating with Google...");
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", self.config.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("OAuth token request failed")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Auth { status, body });
        }

        let token: TokenResponse = response.json().await.context("OAuth token JSON")?;
        Ok(token.access_token)
    }
}

impl PostPublisher for BloggerPublisher {
    async fn publish(
        &self,
        title: &str,
        content_html: &str,
        labels: &[String],
    ) -> Result<PublishedPost, PublishError> {
        let token = self.access_token().await?;

        let url = format!(
            "{}/blogger/v3/blogs/{}/posts/",
            self.config.api_url.trim_end_matches('/'),
            self.blog_id
        );
        log::info!("posting to blog {}...", self.blog_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&NewPost {
                kind: "blogger#post",
                title,
                content: content_html,
                labels,
            })
            .send()
            .await
            .context("Blogger create-post request failed")?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Auth {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let post: PostResponse = response.json().await.context("Blogger post JSON")?;
        Ok(PublishedPost {
            id: post.id,
            url: post.url,
        })
    }
}

/// Keeps only the digits, which tolerates quotes and stray whitespace in secrets.
pub fn clean_blog_id(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}

/// Outer container applied to every published body.
pub fn wrap_body(body_html: &str) -> String {
    format!(
        concat!(
            "<div style=\"font-family: Georgia, 'Times New Roman', serif; font-size: 18px; ",
            "line-height: 1.7; color: #222; max-width: 760px; margin: 0 auto;\">",
            "{body}",
            "<p style=\"font-size: 13px; color: #777; margin-top: 40px; font-style: italic;\">",
            "{disclosure}</p></div>"
        ),
        body = body_html,
        disclosure = DISCLOSURE,
    )
}
