use html_escape::{encode_double_quoted_attribute, encode_text};
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// How many promotion blocks a post should carry.
    pub target_images: usize,
    /// Paragraphs emitted after the heading before the first promotion block.
    pub lead_paragraphs: usize,
    pub min_gap: usize,
}

impl Layout {
    pub const MAX_LEAD_PARAGRAPHS: usize = 2;
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            target_images: 3,
            lead_paragraphs: 1,
            min_gap: 2,
        }
    }
}

const BUTTON_STYLE: &str = "background-color: #ff0000; color: white !important; padding: 16px 32px; \
font-size: 22px; font-weight: 900; text-transform: uppercase; text-decoration: none; \
border-radius: 6px; display: inline-block; margin: 20px 0; \
box-shadow: 0 4px 8px rgba(0,0,0,0.2); font-family: Arial, sans-serif;";

const IMAGE_STYLE: &str =
    "width: 100%; max-width: 700px; height: auto; border: 1px solid #ddd; margin-bottom: 15px;";

/// Image plus call-to-action button, both pointing at the affiliate link.
pub fn promotion_block(image_url: &str, affiliate_link: &str) -> String {
    let link = encode_double_quoted_attribute(affiliate_link);
    let src = encode_double_quoted_attribute(image_url);
    format!(
        concat!(
            "<div style=\"text-align: center; margin: 40px 0; clear: both;\">",
            "<a href=\"{link}\" target=\"_blank\" rel=\"nofollow\">",
            "<img src=\"{src}\" style=\"{img_style}\" alt=\"Official Product Image\">",
            "</a><br>",
            "<a href=\"{link}\" target=\"_blank\" rel=\"nofollow\" style=\"{btn_style}\">",
            "BUY NOW (OFFICIAL SITE)",
            "</a></div>"
        ),
        link = link,
        src = src,
        img_style = IMAGE_STYLE,
        btn_style = BUTTON_STYLE,
    )
}

/// Chooses `target` images in random order, cycling short lists up to the target.
pub fn select_images<R: Rng + ?Sized>(candidates: &[String], target: usize, rng: &mut R) -> Vec<String> {
    if candidates.is_empty() || target == 0 {
        return Vec::new();
    }

    let mut selected: Vec<String> = if candidates.len() < target {
        candidates.iter().cycle().take(target).cloned().collect()
    } else {
        candidates
            .choose_multiple(rng, target)
            .cloned()
            .collect()
    };
    selected.shuffle(rng);
    selected
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interleaved {
    pub html: String,
    pub promotion_blocks: usize,
}

/// Lays out heading, lead paragraphs and promotion blocks. Every paragraph is
/// emitted exactly once and in order; each image yields exactly one block.
pub fn interleave(
    title: &str,
    paragraphs: &[String],
    images: &[String],
    affiliate_link: &str,
    layout: &Layout,
) -> Interleaved {
    let mut html = format!("<h2>{}</h2>", encode_text(title));

    let Some((first_image, rest_images)) = images.split_first() else {
        for paragraph in paragraphs {
            html.push_str(paragraph);
        }
        return Interleaved {
            html,
            promotion_blocks: 0,
        };
    };

    let lead = layout.lead_paragraphs.min(paragraphs.len());
    for paragraph in &paragraphs[..lead] {
        html.push_str(paragraph);
    }
    html.push_str(&promotion_block(first_image, affiliate_link));

    let remaining = &paragraphs[lead..];
    let gap = layout
        .min_gap
        .max(remaining.len() / (rest_images.len() + 1));

    let mut emitted = 0;
    for image in rest_images {
        let end = (emitted + gap).min(remaining.len());
        for paragraph in &remaining[emitted..end] {
            html.push_str(paragraph);
        }
        emitted = end;
        html.push_str(&promotion_block(image, affiliate_link));
    }

    for paragraph in &remaining[emitted..] {
        html.push_str(paragraph);
    }

    Interleaved {
        html,
        promotion_blocks: images.len(),
    }
}
