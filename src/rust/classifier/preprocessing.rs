/// Combines a product designation and optional description into one string.
///
/// Each field is trimmed, an empty description is dropped, the two are joined
/// by a single space and internal whitespace runs collapse to one space. Case
/// is preserved; the predictor lowercases on its own.
///
/// # Example
/// ```
/// use product_categorizer::normalize;
///
/// assert_eq!(normalize("  iPhone 15  ", ""), "iPhone 15");
/// assert_eq!(normalize("Console  PS5", " Sony\tnext gen "), "Console PS5 Sony next gen");
/// ```
pub fn normalize(title: &str, description: &str) -> String {
    let title = title.trim();
    let description = description.trim();

    let combined = if description.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, description)
    };

    combined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased form of `text` cut to at most `max_chars` characters
pub(crate) fn canonical_text(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect::<String>().to_lowercase()
}

/// Splits text into lowercase alphanumeric tokens, keeping accented letters
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
