//! Post-processing of model output into a usable prompt.

/// Lead-ins models like to open with.
const FILLER_OPENINGS: [&str; 6] = [
    "Here's",
    "Here is",
    "This is",
    "I can see",
    "The image shows",
    "This image depicts",
];

const QUALITY_PREFIX: &str = "Highly detailed, professional quality, ";

/// Normalize raw model text into a single prompt line.
///
/// Strips a filler opening, collapses whitespace, capitalizes the first
/// letter, adds a quality prefix when none is present and terminates the
/// sentence.
pub fn clean_prompt(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_filler = FILLER_OPENINGS
        .iter()
        .find_map(|opening| strip_prefix_ignore_case(trimmed, opening))
        .unwrap_or(trimmed);

    let mut cleaned = without_filler.split_whitespace().collect::<Vec<_>>().join(" ");

    if let Some(first) = cleaned.chars().next() {
        if !first.is_ascii_uppercase() {
            let rest = &cleaned[first.len_utf8()..];
            cleaned = first.to_uppercase().chain(rest.chars()).collect();
        }
    }

    if !cleaned.contains("detailed") && !cleaned.contains("high quality") {
        cleaned = format!("{}{}", QUALITY_PREFIX, cleaned);
    }

    if !cleaned.ends_with('.') && !cleaned.ends_with(',') {
        cleaned.push('.');
    }

    cleaned
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_filler_opening() {
        let cleaned = clean_prompt("Here is a detailed portrait of a cat.");
        assert_eq!(cleaned, "A detailed portrait of a cat.");
    }

    #[test]
    fn test_filler_is_case_insensitive() {
        let cleaned = clean_prompt("THE IMAGE SHOWS mountains in detailed fog.");
        assert_eq!(cleaned, "Mountains in detailed fog.");
    }

    #[test]
    fn test_collapses_whitespace() {
        let cleaned = clean_prompt("  A   detailed\n\nforest   path. ");
        assert_eq!(cleaned, "A detailed forest path.");
    }

    #[test]
    fn test_adds_quality_prefix() {
        let cleaned = clean_prompt("a lighthouse on a cliff");
        assert_eq!(
            cleaned,
            "Highly detailed, professional quality, A lighthouse on a cliff."
        );
    }

    #[test]
    fn test_keeps_existing_quality_marker() {
        let cleaned = clean_prompt("Studio shot, high quality, soft light,");
        assert_eq!(cleaned, "Studio shot, high quality, soft light,");
    }

    #[test]
    fn test_only_first_filler_stripped_at_start() {
        let cleaned = clean_prompt("A detailed sign that reads This is fine");
        assert_eq!(cleaned, "A detailed sign that reads This is fine.");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(clean_prompt("   "), "Highly detailed, professional quality, .");
    }

    #[test]
    fn test_non_ascii_first_letter() {
        let cleaned = clean_prompt("émail detailed mug");
        assert_eq!(cleaned, "Émail detailed mug.");
    }
}
