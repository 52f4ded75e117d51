use autoblog::agent::prompt::{
    build_article_prompt, PromptVariant, REVIEW_PREAMBLE, STORY_PREAMBLE, TITLE_SEPARATOR,
};
use autoblog::catalog::ProductRecord;

fn product() -> ProductRecord {
    ProductRecord {
        id: "glucofit".to_string(),
        name: "GlucoFit".to_string(),
        niche: "sugar".to_string(),
        target_keywords: "people managing blood sugar".to_string(),
        affiliate_link: "http://x/a".to_string(),
        image_urls: Vec::new(),
    }
}

#[test]
fn review_prompt_names_product_and_keywords() {
    let output = build_article_prompt(PromptVariant::Review, &product());

    assert!(output.starts_with("Write a detailed review for 'GlucoFit'"));
    assert!(output.contains("targeting people managing blood sugar."));
    assert!(output.contains("'sugar' niche"));
    assert!(!output.contains(TITLE_SEPARATOR));
}

#[test]
fn story_prompt_asks_for_separator_format() {
    let output = build_article_prompt(PromptVariant::Story, &product());

    assert!(output.contains("'GlucoFit'"));
    assert!(output.contains("TITLE|||BODY"));
}

#[test]
fn prompt_omits_blank_niche() {
    let mut record = product();
    record.niche = "  ".to_string();

    let output = build_article_prompt(PromptVariant::Review, &record);

    assert!(!output.contains("niche"));
}

#[test]
fn variants_select_their_preamble() {
    assert_eq!(PromptVariant::Review.preamble(), REVIEW_PREAMBLE);
    assert_eq!(PromptVariant::Story.preamble(), STORY_PREAMBLE);
    assert!(STORY_PREAMBLE.contains(TITLE_SEPARATOR));
    assert!(REVIEW_PREAMBLE.contains("Do NOT use Markdown"));
}
