use crate::core::types::Workshop;

/// Largest edit distance still counted as a fuzzy match.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// Whether `term` matches a workshop's code or display name.
///
/// Case-insensitive substring match, or an edit distance of at most
/// [`MAX_EDIT_DISTANCE`] against either field.
pub fn matches(term: &str, workshop: &Workshop) -> bool {
    let term = term.to_lowercase();
    [&workshop.code, &workshop.display_name]
        .into_iter()
        .any(|field| field_matches(&term, &field.to_lowercase()))
}

fn field_matches(term: &str, field: &str) -> bool {
    field.contains(term) || levenshtein_distance(term, field) <= MAX_EDIT_DISTANCE
}

/// Calculate Levenshtein distance between two strings
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev_row: Vec<usize> = (0..=b_len).collect();
    let mut curr_row = vec![0; b_len + 1];

    for (i, a_char) in a.chars().enumerate() {
        curr_row[0] = i + 1;

        for (j, b_char) in b.chars().enumerate() {
            let cost = if a_char == b_char { 0 } else { 1 };

            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_len]
}
