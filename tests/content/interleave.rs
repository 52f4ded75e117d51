use autoblog::content::interleave::{interleave, promotion_block, select_images, Layout};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

const AFFILIATE: &str = "http://x/a";

fn paragraphs(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("<p>Paragraph number {i:02} with text.</p>")).collect()
}

fn images(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("http://img/{i}.jpg")).collect()
}

/// Reduces the document to a sequence like `["H", "P00", "I", "P01", ...]`.
fn shape(html: &str, paragraphs: &[String], images: &[String]) -> Vec<String> {
    let mut markers: Vec<(usize, String)> = Vec::new();
    if let Some(pos) = html.find("<h2>") {
        markers.push((pos, "H".to_string()));
    }
    for (i, paragraph) in paragraphs.iter().enumerate() {
        for (pos, _) in html.match_indices(paragraph.as_str()) {
            markers.push((pos, format!("P{i:02}")));
        }
    }
    for image in images.iter().collect::<HashSet<_>>() {
        let block = promotion_block(image, AFFILIATE);
        for (pos, _) in html.match_indices(block.as_str()) {
            markers.push((pos, "I".to_string()));
        }
    }
    markers.sort();
    markers.into_iter().map(|(_, marker)| marker).collect()
}

fn expected(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn promotion_block_links_image_and_button_to_affiliate() {
    let block = promotion_block("http://img/1.jpg", "http://x/a?ref=1&src=blog");

    assert!(block.contains("<img src=\"http://img/1.jpg\""));
    assert_eq!(block.matches("href=\"http://x/a?ref=1&amp;src=blog\"").count(), 2);
    assert!(block.contains("BUY NOW (OFFICIAL SITE)"));
    assert!(block.contains("rel=\"nofollow\""));
}

#[test]
fn ten_paragraphs_three_images() {
    let paras = paragraphs(10);
    let imgs = images(3);

    let out = interleave("Title", &paras, &imgs, AFFILIATE, &Layout::default());

    assert_eq!(out.promotion_blocks, 3);
    // One lead paragraph, then gap = max(2, 9 / 3) = 3.
    assert_eq!(
        shape(&out.html, &paras, &imgs),
        expected(&[
            "H", "P00", "I", "P01", "P02", "P03", "I", "P04", "P05", "P06", "I", "P07", "P08",
            "P09"
        ])
    );
}

#[test]
fn minimum_gap_applies_to_short_articles() {
    let paras = paragraphs(4);
    let imgs = images(3);

    let out = interleave("Title", &paras, &imgs, AFFILIATE, &Layout::default());

    // gap = max(2, 3 / 3) = 2; the last image runs out of paragraphs.
    assert_eq!(
        shape(&out.html, &paras, &imgs),
        expected(&["H", "P00", "I", "P01", "P02", "I", "P03", "I"])
    );
}

#[test]
fn zero_lead_paragraphs_puts_block_under_heading() {
    let paras = paragraphs(6);
    let imgs = images(2);
    let layout = Layout {
        lead_paragraphs: 0,
        ..Layout::default()
    };

    let out = interleave("Title", &paras, &imgs, AFFILIATE, &layout);

    // gap = max(2, 6 / 2) = 3.
    assert_eq!(
        shape(&out.html, &paras, &imgs),
        expected(&["H", "I", "P00", "P01", "P02", "I", "P03", "P04", "P05"])
    );
}

#[test]
fn no_images_is_text_only() {
    let paras = paragraphs(3);

    let out = interleave("Title", &paras, &[], AFFILIATE, &Layout::default());

    assert_eq!(out.promotion_blocks, 0);
    assert!(!out.html.contains("BUY NOW"));
    assert_eq!(
        shape(&out.html, &paras, &[]),
        expected(&["H", "P00", "P01", "P02"])
    );
}

#[test]
fn title_is_escaped_in_heading() {
    let out = interleave("Fish & <Chips>", &paragraphs(1), &[], AFFILIATE, &Layout::default());

    assert!(out.html.starts_with("<h2>Fish &amp; &lt;Chips&gt;</h2>"));
}

#[test]
fn every_paragraph_appears_once_in_order() {
    let layouts = [
        Layout::default(),
        Layout {
            target_images: 4,
            lead_paragraphs: 2,
            min_gap: 1,
        },
        Layout {
            target_images: 2,
            lead_paragraphs: 0,
            min_gap: 5,
        },
    ];

    for layout in layouts {
        for para_count in 0..15 {
            for image_count in 0..6 {
                let paras = paragraphs(para_count);
                let imgs = images(image_count);

                let out = interleave("T", &paras, &imgs, AFFILIATE, &layout);
                let markers = shape(&out.html, &paras, &imgs);

                let para_markers: Vec<String> = markers
                    .iter().filter(|m| m.starts_with('P')).cloned().collect();
                let expected_markers: Vec<String> =
                    (0..para_count).map(|i| format!("P{i:02}")).collect();
                assert_eq!(para_markers, expected_markers);
                assert_eq!(markers.iter().filter(|m| *m == "I").count(), image_count);
                assert_eq!(out.promotion_blocks, image_count);
            }
        }
    }
}

#[test]
fn short_image_lists_are_cycled_to_target() {
    let candidates = images(2);
    let mut rng = StdRng::seed_from_u64(11);

    let selected = select_images(&candidates, 3, &mut rng);

    assert_eq!(selected.len(), 3);
    assert!(selected.iter().all(|img| candidates.contains(img)));
    let distinct: HashSet<_> = selected.iter().collect();
    assert_eq!(distinct.len(), 2);
}

#[test]
fn large_image_pools_are_sampled_without_replacement() {
    let candidates = images(5);

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let selected = select_images(&candidates, 3, &mut rng);

        assert_eq!(selected.len(), 3);
        let distinct: HashSet<_> = selected.iter().collect();
        assert_eq!(distinct.len(), 3);
        assert!(selected.iter().all(|img| candidates.contains(img)));
    }
}

#[test]
fn selection_order_is_randomised() {
    let candidates = images(3);
    let mut orders = HashSet::new();

    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        orders.insert(select_images(&candidates, 3, &mut rng));
    }

    assert!(orders.len() > 1);
}

#[test]
fn empty_candidates_select_nothing() {
    let mut rng = StdRng::seed_from_u64(0);

    assert!(select_images(&[], 3, &mut rng).is_empty());
    assert!(select_images(&images(4), 0, &mut rng).is_empty());
}
