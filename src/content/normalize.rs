use crate::agent::prompt::TITLE_SEPARATOR;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_TITLE_CHARS: usize = 60;
pub const MIN_PARAGRAPH_CHARS: usize = 20;

static REASONING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<think>.*?</think>").expect("valid regex"));
static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\*+|#{2,}|^[ \t]*#").expect("valid regex"));
static TITLE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*title[ \t]*:[ \t]*").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*\r?\n").expect("valid regex"));
static BLOCK_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(p|h[1-6]|ul|ol|div|blockquote|table|figure)[\s>]").expect("valid regex")
});
static P_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<p[\s>]").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArticle {
    title: String,
    paragraphs: Vec<String>,
}

impl GeneratedArticle {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Deterministic stand-in used when the model output cannot be used.
    pub fn placeholder(product_name: &str) -> Self {
        Self {
            title: format!("{} Review", product_name),
            paragraphs: vec![format!("<p>Check out {}.</p>", product_name)],
        }
    }
}

/// How the title and body were recovered from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The separator token split title from body.
    Clean,
    /// No separator; the first line became the title.
    FirstLineTitle,
    /// Nothing usable; placeholder content was substituted.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub article: GeneratedArticle,
    pub outcome: ParseOutcome,
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("generated text has no usable {0}")]
    Unusable(&'static str),
}

/// Removes reasoning blocks, markdown markers and `Title:` labels.
pub fn clean(raw: &str) -> String {
    let text = REASONING.replace_all(raw, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = TITLE_LABEL.replace_all(&text, "");
    text.trim().to_string()
}

pub fn normalize(raw: &str) -> Result<Normalized, NormalizeError> {
    let cleaned = clean(raw);

    let (title, body, outcome) = match cleaned.split_once(TITLE_SEPARATOR) {
        Some((title, body)) if !clean_title(title).is_empty() => {
            (clean_title(title), body.to_string(), ParseOutcome::Clean)
        }
        // An empty title before the separator is recovered from the body's first line.
        Some((_, body)) => split_first_line(body),
        None => split_first_line(&cleaned),
    };
    let title = bound_title(&title);

    if title.is_empty() {
        return Err(NormalizeError::Unusable("title"));
    }

    let paragraphs = split_paragraphs(&body);
    if paragraphs.is_empty() {
        return Err(NormalizeError::Unusable("paragraphs"));
    }

    Ok(Normalized {
        article: GeneratedArticle { title, paragraphs },
        outcome,
    })
}

/// Like [`normalize`], falling back to placeholder content instead of failing.
pub fn normalize_or_placeholder(raw: &str, product_name: &str) -> Normalized {
    match normalize(raw) {
        Ok(normalized) => normalized,
        Err(err) => {
            log::warn!("{}, using placeholder content", err);
            placeholder(product_name)
        }
    }
}

pub fn placeholder(product_name: &str) -> Normalized {
    Normalized {
        article: GeneratedArticle::placeholder(product_name),
        outcome: ParseOutcome::Placeholder,
    }
}

const QUOTES: &[char] = &['"', '\'', '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'];

fn split_first_line(text: &str) -> (String, String, ParseOutcome) {
    let mut lines = text.lines().skip_while(|line| line.trim().is_empty());
    let title = lines.next().map(clean_title).unwrap_or_default();
    let body = lines.collect::<Vec<_>>().join("\n");
    (title, body, ParseOutcome::FirstLineTitle)
}

fn bound_title(title: &str) -> String {
    let bounded: String = title.chars().take(MAX_TITLE_CHARS).collect();
    bounded.trim().to_string()
}

fn clean_title(title: &str) -> String {
    let title = TAG.replace_all(title, "");
    title.trim().trim_matches(QUOTES).trim().to_string()
}

/// Splits on `</p>` when the body uses it, otherwise on blank lines.
pub fn split_paragraphs(body: &str) -> Vec<String> {
    let lower = body.to_ascii_lowercase();
    let fragments: Vec<&str> = if lower.contains("</p>") {
        split_on_closing_p(body, &lower)
    } else {
        BLANK_LINES.split(body).collect()
    };

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|fragment| text_len(fragment) >= MIN_PARAGRAPH_CHARS)
        .map(wrap_fragment)
        .collect()
}

/// Visible character count, ignoring markup.
fn text_len(fragment: &str) -> usize {
    TAG.replace_all(fragment, "").trim().chars().count()
}

fn split_on_closing_p<'a>(body: &'a str, lower: &str) -> Vec<&'a str> {
    // `lower` is an ASCII-lowercased copy, so byte offsets line up with `body`.
    let mut fragments = Vec::new();
    let mut start = 0;
    for (idx, _) in lower.match_indices("</p>") {
        fragments.push(&body[start..idx]);
        start = idx + "</p>".len();
    }
    fragments.push(&body[start..]);
    fragments
}

fn wrap_fragment(fragment: &str) -> String {
    if P_OPEN.is_match(fragment) {
        if fragment.to_ascii_lowercase().contains("</p>") {
            fragment.to_string()
        } else {
            format!("{}</p>", fragment)
        }
    } else if BLOCK_OPEN.is_match(fragment) {
        fragment.to_string()
    } else {
        format!("<p>{}</p>", fragment)
    }
}
