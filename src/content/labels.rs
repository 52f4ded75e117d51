use crate::catalog::ProductRecord;

pub const MAX_LABELS: usize = 5;

const BASE_LABELS: [&str; 3] = ["Health Reviews", "Wellness", "Dietary Supplements"];

/// Niche keyword groups and the labels they map to, checked in order.
const NICHE_LABELS: &[(&[&str], &[&str])] = &[
    (
        &["weight", "fat", "metabolic"],
        &["Weight Loss", "Fat Burner", "Metabolism Booster"],
    ),
    (
        &["sugar", "diabetes"],
        &["Blood Sugar Control", "Diabetes Support", "Insulin Health"],
    ),
    (
        &["teeth", "dental"],
        &["Dental Health", "Oral Hygiene", "Gum Support"],
    ),
    (&["gut", "digest"], &["Gut Health", "Digestion", "Probiotics"]),
];

const FALLBACK_LABELS: [&str; 2] = ["Health Tips", "Natural Remedies"];

fn niche_labels(niche: &str) -> &'static [&'static str] {
    let niche = niche.to_lowercase();
    NICHE_LABELS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| niche.contains(k)))
        .map(|(_, labels)| *labels)
        .unwrap_or(&FALLBACK_LABELS)
}

/// Product name first, then generic tags, then niche tags; at most [`MAX_LABELS`].
pub fn derive(product: &ProductRecord) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(MAX_LABELS);
    let name = product.name.trim();
    let candidates = std::iter::once(name)
        .chain(BASE_LABELS)
        .chain(niche_labels(&product.niche).iter().copied());

    for label in candidates {
        if labels.len() == MAX_LABELS {
            break;
        }
        if label.is_empty() || labels.iter().any(|l| l.eq_ignore_ascii_case(label)) {
            continue;
        }
        labels.push(label.to_string());
    }
    labels
}
