const CONTEXT_BYTES: usize = 200;
const FALLBACK_BYTES: usize = 300;
const MIN_LINE_SNIPPET: usize = 50;
const MIN_MATCH_WINDOW: usize = 100;

/// Extract a human-readable excerpt of `text` around the query terms.
///
/// Term matching is a case-sensitive substring scan against the stored text,
/// so callers pass terms in the same casing the index stores (lowercase).
/// When nothing matches, the excerpt falls back to the first alphabetic line
/// and finally to the head of the document.
pub fn snippet(text: &str, query_terms: &[String]) -> String {
    if text.is_empty() || query_terms.is_empty() {
        return String::new();
    }

    let mut matches: Vec<(usize, &str)> = Vec::new();
    for term in query_terms {
        if term.len() < 2 {
            continue;
        }
        let mut from = 0;
        while let Some(rel) = text[from..].find(term.as_str()) {
            let pos = from + rel;
            matches.push((pos, term));
            from = ceil_boundary(text, pos + 1);
        }
    }

    if matches.is_empty() {
        return unmatched_excerpt(text);
    }

    matches.sort();
    for (pos, _) in matches {
        let start = floor_boundary(text, pos.saturating_sub(CONTEXT_BYTES));
        let end = floor_boundary(text, (pos + CONTEXT_BYTES).min(text.len()));
        let mut window = String::new();
        if start > 0 {
            window.push_str("...");
        }
        window.push_str(&text[start..end]);
        if end < text.len() {
            window.push_str("...");
        }
        if window.len() > MIN_MATCH_WINDOW {
            return window;
        }
    }
    head(text)
}

/// First window of up to 300 bytes starting at an alphabetic byte and capped
/// at its line end, provided it is longer than 50 bytes.
fn unmatched_excerpt(text: &str) -> String {
    let bytes = text.as_bytes();
    for i in 0..bytes.len() {
        if !bytes[i].is_ascii_alphabetic() {
            continue;
        }
        let line_end = text[i..].find('\n').map(|r| i + r).unwrap_or(text.len());
        let end = floor_boundary(text, (i + FALLBACK_BYTES).min(line_end));
        if end - i > MIN_LINE_SNIPPET {
            return text[i..end].to_string();
        }
    }
    head(text)
}

fn head(text: &str) -> String {
    let end = floor_boundary(text, FALLBACK_BYTES.min(text.len()));
    text[..end].to_string()
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_inputs_yield_empty_snippet() {
        assert_eq!(snippet("", &terms(&["word"])), "");
        assert_eq!(snippet("some text", &[]), "");
    }

    #[test]
    fn match_window_carries_context_and_ellipses() {
        let text = format!("{}needle{}", "x".repeat(400), "y".repeat(400));
        let got = snippet(&text, &terms(&["needle"]));
        assert!(got.starts_with("..."));
        assert!(got.ends_with("..."));
        assert!(got.contains("needle"));
    }

    #[test]
    fn window_at_document_start_has_no_leading_ellipsis() {
        let text = format!("needle {}", "pad ".repeat(100));
        let got = snippet(&text, &terms(&["needle"]));
        assert!(got.starts_with("needle"));
        assert!(got.ends_with("..."));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let text = format!("Needle only appears capitalized here. {}", "pad ".repeat(30));
        let got = snippet(&text, &terms(&["needle"]));
        // falls back to the first alphabetic line
        assert!(got.starts_with("Needle only appears"));
    }

    #[test]
    fn short_terms_are_ignored_for_matching() {
        let text = format!("a b c {}", "filler text line long enough to serve ".repeat(3));
        let got = snippet(&text, &terms(&["a"]));
        assert!(!got.is_empty());
        assert!(!got.starts_with("..."));
    }

    #[test]
    fn falls_back_to_document_head_when_all_lines_are_short() {
        let text = "tiny\nrows\nonly\n";
        let got = snippet(text, &terms(&["absent"]));
        assert_eq!(got, text);
    }

    #[test]
    fn multibyte_text_never_splits_characters() {
        let text = format!("{}needle{}", "\u{e9}".repeat(150), "\u{e9}".repeat(150));
        let got = snippet(&text, &terms(&["needle"]));
        assert!(got.contains("needle"));
    }
}
