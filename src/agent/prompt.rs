use crate::catalog::ProductRecord;
use serde::Deserialize;

/// Separator the `story` preamble asks the model to put between title and body.
pub const TITLE_SEPARATOR: &str = "|||";

pub const REVIEW_PREAMBLE: &str = r#"
You are a professional SEO Health Copywriter.
Write a high-converting, educational blog post.

STRICT GUIDELINES:
1. WORD COUNT: Minimum 1200 words.
2. FORMAT: Use only HTML tags (<p>, <h2>, <ul>, <li>).
3. FORBIDDEN: Do NOT use Markdown symbols like '**', '##', or '*'. Do NOT use hashtags.
4. STRUCTURE:
   - Catchy SEO Title on the first line, on its own
   - Introduction (Hook)
   - The 'Hidden' Problem (Agitation)
   - The Solution (The Product)
   - Scientific Ingredients Analysis
   - Benefits (Bulleted list using <ul>)
   - FAQ Section (Must be sequential and logical)
   - Conclusion with strong CTA.
5. TONE: Trustworthy, Scientific, Empathetic.
"#;

pub const STORY_PREAMBLE: &str = r#"
You are a health blogger who writes warm, story-led articles.
Open with a relatable everyday moment, then explain the underlying cause and how the
product fits into a realistic routine.

STRICT GUIDELINES:
1. WORD COUNT: Minimum 1000 words.
2. FORMAT: Wrap every paragraph in <p></p>. Use <h2> for section headings.
3. FORBIDDEN: No Markdown ('**', '##', '*'), no hashtags, no emojis.
4. OUTPUT: Write the title, then the separator |||, then the HTML body.
   Example: My Title|||<p>First paragraph...</p>
5. TONE: Personal, honest, hopeful.
"#;

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptVariant {
    #[default]
    Review,
    Story,
}

impl PromptVariant {
    pub fn preamble(&self) -> &'static str {
        match self {
            PromptVariant::Review => REVIEW_PREAMBLE,
            PromptVariant::Story => STORY_PREAMBLE,
        }
    }
}

pub fn build_article_prompt(variant: PromptVariant, product: &ProductRecord) -> String {
    let keywords = product.target_keywords.trim();
    let niche = product.niche.trim();

    let niche_hint = if niche.is_empty() {
        String::new()
    } else {
        format!(" The product belongs to the '{}' niche.", niche)
    };

    match variant {
        PromptVariant::Review => format!(
            "Write a detailed review for '{}' targeting {}.{}",
            product.name, keywords, niche_hint
        ),
        PromptVariant::Story => format!(
            "Write a story-led article about '{}' for readers searching for {}.{} Remember the format: TITLE{}BODY.",
            product.name, keywords, niche_hint, TITLE_SEPARATOR
        ),
    }
}
