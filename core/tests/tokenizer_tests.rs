use txtsearch_core::tokenizer::{is_stopword, tokenize};

#[test]
fn it_normalizes_case_and_punctuation() {
    let toks = tokenize("Rust-lang: Systems. Programming!");
    assert_eq!(toks, vec!["rust", "lang", "systems", "programming"]);
}

#[test]
fn it_filters_stopwords() {
    let toks = tokenize("the quick brown fox and the lazy dog");
    assert!(!toks.contains(&"the".to_string()));
    assert!(!toks.contains(&"and".to_string()));
    assert_eq!(toks, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn stopword_check_is_exact() {
    assert!(is_stopword("their"));
    assert!(is_stopword("which"));
    assert!(!is_stopword("there"));
}

#[test]
fn mixed_alphanumerics_survive() {
    assert_eq!(tokenize("ipv6 route 2024 b2b"), vec!["ipv6", "route", "b2b"]);
}
