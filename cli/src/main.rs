use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};
use txtsearch_core::tokenizer::tokenize;
use txtsearch_core::{RankedDoc, SearchEngine};

#[derive(Parser)]
#[command(name = "txtsearch")]
#[command(about = "Index a folder of .txt files and run ranked search, autocomplete or prefix search", long_about = None)]
struct Args {
    /// Directory of .txt files to index
    #[arg(long = "data-dir", default_value = "./Data")]
    data_dir: PathBuf,
    /// Ranked keyword search query
    #[arg(long)]
    search: Option<String>,
    /// Prefix to complete against the indexed vocabulary
    #[arg(long)]
    autocomplete: Option<String>,
    /// Prefix to expand into a ranked search
    #[arg(long = "prefixsearch")]
    prefixsearch: Option<String>,
    /// Results per page
    #[arg(long = "topK", default_value_t = 10)]
    top_k: usize,
    /// Maximum autocomplete suggestions
    #[arg(long, default_value_t = 10)]
    limit: usize,
    /// Maximum trie expansions for prefix search
    #[arg(long = "expandLimit", default_value_t = 100)]
    expand_limit: usize,
    /// 1-based page index
    #[arg(long, default_value_t = 1)]
    page: usize,
    /// Rank with each document's own length instead of the legacy behavior
    /// of reading the first document's
    #[arg(long = "per-doc-lengths", default_value_t = false)]
    per_doc_lengths: bool,
}

#[derive(Serialize)]
struct ResultItem {
    rank: usize,
    filename: String,
    filepath: String,
    score: f32,
    #[serde(rename = "totalOccurrences")]
    total_occurrences: u32,
    #[serde(rename = "inTitle")]
    in_title: bool,
    #[serde(rename = "exactPhraseMatch")]
    exact_phrase_match: bool,
    snippet: String,
}

#[derive(Serialize)]
struct PageOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    count: usize,
    total_results: usize,
    total_pages: usize,
    page: usize,
    results_per_page: usize,
    mode: &'static str,
    time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev_page: Option<usize>,
    results: Vec<ResultItem>,
}

#[derive(Serialize)]
struct AutocompleteOutput {
    prefix: String,
    count: usize,
    time_ms: u128,
    suggestions: Vec<String>,
}

#[derive(Serialize)]
struct StatusOutput {
    status: &'static str,
    documents: usize,
    unique_terms: usize,
    data_directory: String,
    total_words_indexed: usize,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut engine = SearchEngine::new().with_per_doc_lengths(args.per_doc_lengths);
    engine.index_folder(&args.data_dir);
    if engine.num_docs() == 0 {
        println!(
            "{}",
            serde_json::json!({ "error": "No documents could be indexed." })
        );
        std::process::exit(1);
    }

    if let Some(query) = args.search.clone() {
        run_search(&mut engine, &args, &query)?;
    } else if let Some(prefix) = args.autocomplete.clone() {
        run_autocomplete(&mut engine, &args, &prefix)?;
    } else if let Some(prefix) = args.prefixsearch.clone() {
        run_prefix_search(&mut engine, &args, &prefix)?;
    } else {
        let out = StatusOutput {
            status: "ready",
            documents: engine.num_docs(),
            unique_terms: engine.unique_terms(),
            data_directory: args.data_dir.display().to_string(),
            total_words_indexed: engine.total_words_indexed(),
        };
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

fn run_search(engine: &mut SearchEngine, args: &Args, query: &str) -> Result<()> {
    let start = Instant::now();
    let results = engine.search_with_ranking(query, args.page, args.top_k);
    let total_results = engine.total_results(query);
    let time_ms = start.elapsed().as_millis();

    let query_terms = tokenize(&query.to_ascii_lowercase());
    let out = page_output(
        engine,
        args,
        PageLabel::Query(query.to_string()),
        "search",
        &results,
        total_results,
        time_ms,
        &query_terms,
    );
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn run_autocomplete(engine: &mut SearchEngine, args: &Args, prefix: &str) -> Result<()> {
    let start = Instant::now();
    let suggestions = engine.autocomplete(prefix, args.limit);
    let out = AutocompleteOutput {
        prefix: prefix.to_string(),
        count: suggestions.len(),
        time_ms: start.elapsed().as_millis(),
        suggestions,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn run_prefix_search(engine: &mut SearchEngine, args: &Args, prefix: &str) -> Result<()> {
    let start = Instant::now();
    let results = engine.prefix_search(prefix, args.expand_limit, args.page, args.top_k);
    let total_results = engine.prefix_total_results(prefix, args.expand_limit);
    let time_ms = start.elapsed().as_millis();

    let query_terms = vec![prefix.to_string()];
    let out = page_output(
        engine,
        args,
        PageLabel::Prefix(prefix.to_string()),
        "prefix_search",
        &results,
        total_results,
        time_ms,
        &query_terms,
    );
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

enum PageLabel {
    Query(String),
    Prefix(String),
}

#[allow(clippy::too_many_arguments)]
fn page_output(
    engine: &SearchEngine,
    args: &Args,
    label: PageLabel,
    mode: &'static str,
    results: &[RankedDoc],
    total_results: usize,
    time_ms: u128,
    query_terms: &[String],
) -> PageOutput {
    let per_page = args.top_k.max(1);
    let total_pages = std::cmp::max(1, total_results.div_ceil(per_page));
    let start_rank = (args.page.saturating_sub(1)) * per_page + 1;
    let items = results
        .iter()
        .enumerate()
        .map(|(i, rd)| ResultItem {
            rank: start_rank + i,
            filename: engine.filename_for(rd.doc_id),
            filepath: engine.filepath_for(rd.doc_id),
            score: rd.score,
            total_occurrences: rd.total_occurrences,
            in_title: rd.in_title,
            exact_phrase_match: rd.exact_phrase_match,
            snippet: engine.snippet_for(query_terms, rd.doc_id),
        })
        .collect();
    let (query, prefix) = match label {
        PageLabel::Query(q) => (Some(q), None),
        PageLabel::Prefix(p) => (None, Some(p)),
    };
    PageOutput {
        query,
        prefix,
        count: results.len(),
        total_results,
        total_pages,
        page: args.page,
        results_per_page: args.top_k,
        mode,
        time_ms,
        next_page: (args.page < total_pages).then(|| args.page + 1),
        prev_page: (args.page > 1).then(|| args.page - 1),
        results: items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(page: usize, top_k: usize) -> Args {
        Args::parse_from([
            "txtsearch".to_string(),
            "--page".to_string(),
            page.to_string(),
            "--topK".to_string(),
            top_k.to_string(),
        ])
    }

    fn ranked(doc_id: u32) -> RankedDoc {
        RankedDoc {
            doc_id,
            score: 1.0,
            total_occurrences: 1,
            in_title: false,
            exact_phrase_match: false,
            title_boost: 0.0,
        }
    }

    #[test]
    fn page_envelope_links_neighbor_pages() {
        let engine = SearchEngine::new();
        let results: Vec<RankedDoc> = (20..25).map(ranked).collect();
        let out = page_output(
            &engine,
            &args_for(3, 10),
            PageLabel::Query("q".into()),
            "search",
            &results,
            25,
            1,
            &[],
        );
        assert_eq!(out.total_pages, 3);
        assert_eq!(out.count, 5);
        assert_eq!(out.next_page, None);
        assert_eq!(out.prev_page, Some(2));
        assert_eq!(out.results[0].rank, 21);
        assert_eq!(out.results[4].rank, 25);
    }

    #[test]
    fn page_envelope_on_first_page() {
        let engine = SearchEngine::new();
        let results: Vec<RankedDoc> = (0..10).map(ranked).collect();
        let out = page_output(
            &engine,
            &args_for(1, 10),
            PageLabel::Query("q".into()),
            "search",
            &results,
            25,
            1,
            &[],
        );
        assert_eq!(out.next_page, Some(2));
        assert_eq!(out.prev_page, None);
        assert_eq!(out.results[0].rank, 1);
    }

    #[test]
    fn empty_result_set_still_reports_one_page() {
        let engine = SearchEngine::new();
        let out = page_output(
            &engine,
            &args_for(1, 10),
            PageLabel::Prefix("zz".into()),
            "prefix_search",
            &[],
            0,
            0,
            &[],
        );
        assert_eq!(out.total_pages, 1);
        assert_eq!(out.next_page, None);
        assert_eq!(out.prev_page, None);
        assert_eq!(out.prefix.as_deref(), Some("zz"));
        assert!(out.query.is_none());
    }
}
