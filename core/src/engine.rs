use crate::cache::BoundedCache;
use crate::index::{DocId, InvertedIndex};
use crate::rank::{rank, RankedDoc};
use crate::scan::scan_txt_files;
use crate::snippet::snippet;
use std::path::Path;
use tracing::{info, warn};

const RESULT_CACHE_CAP: usize = 1000;
/// Prefix expansions joined into the synthetic query for prefix search.
const PREFIX_QUERY_TERMS: usize = 5;

/// Batch-built search engine over one directory of text files.
///
/// [`index_folder`](SearchEngine::index_folder) must complete before any
/// query; afterwards the index is read-only and only the bounded result
/// caches mutate.
pub struct SearchEngine {
    index: InvertedIndex,
    num_docs: usize,
    result_cache: BoundedCache<Vec<RankedDoc>>,
    per_doc_lengths: bool,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        SearchEngine {
            index: InvertedIndex::new(),
            num_docs: 0,
            result_cache: BoundedCache::new(RESULT_CACHE_CAP),
            per_doc_lengths: false,
        }
    }

    /// Rank with each document's own token count in the length terms instead
    /// of the first document's. Off by default; see `rank` for the effect.
    pub fn with_per_doc_lengths(mut self, enabled: bool) -> Self {
        self.per_doc_lengths = enabled;
        self
    }

    /// Scan `dir` for `.txt` files and (re)build the index from them.
    ///
    /// A missing directory or an empty scan leaves the engine empty; both
    /// are reported as warnings, not errors.
    pub fn index_folder(&mut self, dir: &Path) {
        if !dir.is_dir() {
            warn!(dir = %dir.display(), "data directory missing or not a directory");
            return;
        }
        let files = scan_txt_files(dir);
        if files.is_empty() {
            warn!(dir = %dir.display(), "no .txt files found");
            return;
        }
        info!(count = files.len(), "found text files to index");
        self.index.build_from_files(&files);
        self.num_docs = self.index.num_docs();
        self.result_cache.clear();
    }

    /// Ranked search for one page of results. Pages are 1-based.
    pub fn search_with_ranking(
        &mut self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> Vec<RankedDoc> {
        let cache_key = format!("{query}|PAGE|{page}|{per_page}");
        if let Some(hit) = self.result_cache.get(&cache_key) {
            return hit.clone();
        }
        let all = rank(&self.index, query, self.per_doc_lengths);
        let start = page.saturating_sub(1).saturating_mul(per_page);
        let end = start.saturating_add(per_page).min(all.len());
        let page_results = if start < end {
            all[start..end].to_vec()
        } else {
            Vec::new()
        };
        self.result_cache.insert(cache_key, page_results.clone());
        page_results
    }

    pub fn total_results(&mut self, query: &str) -> usize {
        if self.num_docs == 0 {
            return 0;
        }
        self.search_with_ranking(query, 1, usize::MAX).len()
    }

    pub fn autocomplete(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        self.index
            .trie
            .starts_with(&prefix.to_ascii_lowercase(), limit)
    }

    /// Expand `prefix` via the trie and run a ranked search over the first
    /// few completions joined into one query.
    pub fn prefix_search(
        &mut self,
        prefix: &str,
        expand_limit: usize,
        page: usize,
        per_page: usize,
    ) -> Vec<RankedDoc> {
        match self.expanded_query(prefix, expand_limit) {
            Some(query) => self.search_with_ranking(&query, page, per_page),
            None => Vec::new(),
        }
    }

    pub fn prefix_total_results(&mut self, prefix: &str, expand_limit: usize) -> usize {
        match self.expanded_query(prefix, expand_limit) {
            Some(query) => self.total_results(&query),
            None => 0,
        }
    }

    fn expanded_query(&mut self, prefix: &str, expand_limit: usize) -> Option<String> {
        let suggestions = self.autocomplete(prefix, expand_limit);
        if suggestions.is_empty() {
            return None;
        }
        Some(
            suggestions
                .iter()
                .take(PREFIX_QUERY_TERMS)
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn snippet_for(&self, query_terms: &[String], doc_id: DocId) -> String {
        self.index
            .doc(doc_id)
            .map(|doc| snippet(&doc.full_content, query_terms))
            .unwrap_or_default()
    }

    pub fn filename_for(&self, doc_id: DocId) -> String {
        self.index
            .doc(doc_id)
            .map(|doc| doc.filename.clone())
            .unwrap_or_default()
    }

    pub fn filepath_for(&self, doc_id: DocId) -> String {
        self.index
            .doc(doc_id)
            .map(|doc| doc.filepath.clone())
            .unwrap_or_default()
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn unique_terms(&self) -> usize {
        self.index.unique_terms()
    }

    pub fn total_words_indexed(&self) -> usize {
        self.index.total_words_processed
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.result_cache.clear();
        self.num_docs = 0;
    }
}
