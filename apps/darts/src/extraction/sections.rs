//! Labelled-section splitting for free-text model answers.
//!
//! Callers hand over the answer and the labels in their canonical order and
//! get one raw value per label back. Swapping this heuristic for
//! schema-constrained output only touches this file.

/// Splits `response` into one value per label.
///
/// Labels are searched forward in the given order. A label's value runs up to
/// the first later label found after it, or to the end of the text. A missing
/// label yields an empty string and does not move the search position, so
/// out-of-order answers can leave later sections empty or misattributed.
pub fn split_labeled(response: &str, labels: &[&str]) -> Vec<String> {
    let mut values = Vec::with_capacity(labels.len());
    let mut cursor = 0;

    for (i, label) in labels.iter().enumerate() {
        let Some(found) = response[cursor..].find(label) else {
            values.push(String::new());
            continue;
        };

        let start = cursor + found + label.len();
        let rest = &response[start..];
        let end = labels[i + 1..]
            .iter()
            .find_map(|next| rest.find(next))
            .unwrap_or(rest.len());

        values.push(rest[..end].trim().to_string());
        cursor = start + end;
    }

    values
}
