use lazy_static::lazy_static;
use std::collections::HashSet;

/// Token characters are buffered up to this many bytes; the rest of an
/// overlong run is consumed without being appended.
const MAX_BUFFERED_BYTES: usize = 31;
const MIN_TOKEN_LEN: usize = 2;
const MAX_TOKEN_LEN: usize = 15;
const MAX_TOKENS_PER_INPUT: usize = 100_000;

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the", "and", "for", "are", "but", "not", "you", "all", "any", "can",
            "had", "her", "was", "one", "our", "out", "day", "get", "has", "him",
            "his", "how", "man", "new", "now", "old", "see", "two", "way", "who",
            "boy", "did", "its", "let", "put", "say", "she", "too", "use", "may",
            "also", "than", "that", "this", "with", "from", "have", "were", "been",
            "they", "what", "when", "where", "which", "will", "your", "their",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Tokenize text into lowercased ASCII-alphanumeric terms.
///
/// Any byte that is not an ASCII alphanumeric delimits a token. Accepted
/// tokens have length in [2, 15], are not stopwords and contain at least one
/// non-digit byte. Output is capped at 100k tokens per input.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut buf = String::with_capacity(MAX_BUFFERED_BYTES);
    for &b in text.as_bytes() {
        if tokens.len() >= MAX_TOKENS_PER_INPUT {
            return tokens;
        }
        if b.is_ascii_alphanumeric() {
            if buf.len() < MAX_BUFFERED_BYTES {
                buf.push(b.to_ascii_lowercase() as char);
            }
        } else if !buf.is_empty() {
            flush(&mut buf, &mut tokens);
        }
    }
    if !buf.is_empty() && tokens.len() < MAX_TOKENS_PER_INPUT {
        flush(&mut buf, &mut tokens);
    }
    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<String>) {
    let accept = buf.len() >= MIN_TOKEN_LEN
        && buf.len() <= MAX_TOKEN_LEN
        && !STOP_WORDS.contains(buf.as_str())
        && !buf.bytes().all(|b| b.is_ascii_digit());
    if accept {
        tokens.push(std::mem::take(buf));
    } else {
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits_on_delimiters() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn drops_short_and_long_tokens() {
        let toks = tokenize("a ab abcdefghijklmno abcdefghijklmnop");
        // 1 byte too short, 16 bytes too long, 15 bytes is the ceiling
        assert_eq!(toks, vec!["ab", "abcdefghijklmno"]);
    }

    #[test]
    fn drops_pure_digit_runs() {
        assert_eq!(tokenize("123 42 x86 686txt"), vec!["x86", "686txt"]);
    }

    #[test]
    fn overlong_runs_are_consumed_not_split() {
        // 40 identical bytes: the buffer keeps 31, which then fails the
        // length ceiling, so nothing is emitted for the run.
        let long = "z".repeat(40);
        assert!(tokenize(&long).is_empty());
        assert_eq!(tokenize(&format!("{long} tail")), vec!["tail"]);
    }

    #[test]
    fn non_ascii_bytes_delimit() {
        assert_eq!(tokenize("caf\u{e9}s"), vec!["caf"]);
    }

    #[test]
    fn token_count_is_bounded() {
        let text = "word ".repeat(MAX_TOKENS_PER_INPUT + 50);
        assert_eq!(tokenize(&text).len(), MAX_TOKENS_PER_INPUT);
    }
}
