use crate::tokenizer::tokenize;
use crate::trie::Trie;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

pub type DocId = u32;

pub const MAX_POSTING_POSITIONS: usize = 50;
pub const MAX_TERM_FREQ: u32 = 1000;
pub const MAX_DOC_FREQ: usize = 32767;
pub const MAX_UNIQUE_TERMS: usize = 200_000;
const MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;
const TRIE_MIN_LEN: usize = 2;
const TRIE_MAX_LEN: usize = 20;

/// One term's occurrences within one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
    pub positions: Vec<u32>,
}

impl Posting {
    fn new(doc_id: DocId) -> Self {
        Posting {
            doc_id,
            freq: 0,
            positions: Vec::new(),
        }
    }

    /// Count an occurrence at token index `pos`. The frequency saturates at
    /// 1000 and only the first 50 positions are kept; once the frequency
    /// saturates, positions stop being recorded as well.
    fn record(&mut self, pos: u32) {
        if self.freq < MAX_TERM_FREQ {
            self.freq += 1;
            if self.positions.len() < MAX_POSTING_POSITIONS {
                self.positions.push(pos);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub filepath: String,
    pub file_size: u64,
    pub total_tokens: usize,
    /// Raw text, retained for snippet extraction and phrase matching.
    pub full_content: String,
}

/// Term -> postings mapping over an ingestion-ordered document table, plus
/// the autocomplete trie seeded from the indexed vocabulary.
///
/// Built once by [`build_from_files`](InvertedIndex::build_from_files) and
/// read-only afterwards.
#[derive(Default)]
pub struct InvertedIndex {
    pub postings: HashMap<String, Vec<Posting>>,
    pub doc_freq: HashMap<String, u16>,
    pub docs: Vec<Document>,
    pub trie: Trie,
    pub total_words_processed: usize,
    pub total_files_processed: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.postings.clear();
        self.doc_freq.clear();
        self.docs.clear();
        self.trie.clear();
        self.total_words_processed = 0;
        self.total_files_processed = 0;
    }

    pub fn doc(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn unique_terms(&self) -> usize {
        self.postings.len()
    }

    /// Smoothed inverse document frequency: log10(N / df + 1).
    pub fn idf(&self, term: &str) -> f32 {
        let n = self.docs.len();
        let df = self.doc_freq.get(term).copied().unwrap_or(0);
        if df == 0 || n == 0 {
            return 0.0;
        }
        (n as f32 / df as f32 + 1.0).log10()
    }

    /// Ingest `files` in order, replacing any previous contents.
    ///
    /// Unreadable files are skipped, files over 100 MiB are skipped with a
    /// warning, and ingestion stops early once the vocabulary passes 200k
    /// unique terms. No per-file failure aborts the build.
    pub fn build_from_files(&mut self, files: &[PathBuf]) {
        self.clear();
        if files.is_empty() {
            return;
        }
        info!(files = files.len(), "building index");
        let start = Instant::now();

        let mut seen_terms: HashSet<String> = HashSet::new();
        let mut unique_terms: Vec<String> = Vec::new();
        let mut files_processed = 0usize;

        for path in files {
            let Ok(meta) = fs::metadata(path) else {
                continue;
            };
            if meta.len() > MAX_FILE_BYTES {
                warn!(
                    path = %path.display(),
                    mib = meta.len() / 1024 / 1024,
                    "skipping very large file"
                );
                continue;
            }
            let Ok(bytes) = fs::read(path) else {
                continue;
            };
            let full_content = String::from_utf8_lossy(&bytes).into_owned();

            let doc_id = self.docs.len() as DocId;
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let tokens = tokenize(&full_content);
            self.total_words_processed += tokens.len();

            let mut local: HashMap<String, Posting> = HashMap::new();
            for (i, token) in tokens.iter().enumerate() {
                local
                    .entry(token.clone())
                    .or_insert_with(|| Posting::new(doc_id))
                    .record(i as u32);
                if seen_terms.insert(token.clone()) {
                    unique_terms.push(token.clone());
                }
            }
            for (term, posting) in local {
                self.postings.entry(term).or_default().push(posting);
            }

            self.docs.push(Document {
                filename,
                filepath: path.display().to_string(),
                file_size: meta.len(),
                total_tokens: tokens.len(),
                full_content,
            });
            files_processed += 1;
            self.total_files_processed += 1;

            if files_processed % 5 == 0 {
                info!(
                    processed = files_processed,
                    total = files.len(),
                    unique_terms = unique_terms.len(),
                    "ingestion progress"
                );
            }
            if unique_terms.len() > MAX_UNIQUE_TERMS {
                info!("unique term limit reached, stopping ingestion early");
                break;
            }
        }

        // Trie insertion goes shortest-first so short completions sit near
        // the root before their extensions.
        unique_terms.sort_by_key(|w| w.len());
        let mut trie_words = 0usize;
        for word in &unique_terms {
            if (TRIE_MIN_LEN..=TRIE_MAX_LEN).contains(&word.len()) {
                self.trie.insert(word);
                trie_words += 1;
            }
        }

        for (term, list) in &self.postings {
            self.doc_freq
                .insert(term.clone(), list.len().min(MAX_DOC_FREQ) as u16);
        }

        info!(
            documents = self.docs.len(),
            unique_terms = self.postings.len(),
            trie_words,
            total_words = self.total_words_processed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index built"
        );
    }
}
