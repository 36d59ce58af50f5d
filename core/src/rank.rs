use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::tokenize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const MIN_SCORE: f32 = 1e-6;
const SCORE_EPSILON: f32 = 1e-4;
const MIN_TITLE_TERM_LEN: usize = 3;

/// One scored document in ranked-search output.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDoc {
    pub doc_id: DocId,
    pub score: f32,
    pub total_occurrences: u32,
    pub in_title: bool,
    pub exact_phrase_match: bool,
    pub title_boost: f32,
}

impl RankedDoc {
    /// Ranking order, greater-is-better: exact phrase match first, then
    /// title boost, then score (ties within 1e-4 fall through), then raw
    /// occurrence count.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        self.exact_phrase_match
            .cmp(&other.exact_phrase_match)
            .then_with(|| {
                self.title_boost
                    .partial_cmp(&other.title_boost)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                if (self.score - other.score).abs() > SCORE_EPSILON {
                    self.score
                        .partial_cmp(&other.score)
                        .unwrap_or(Ordering::Equal)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| self.total_occurrences.cmp(&other.total_occurrences))
    }
}

/// Score every document against `query` and return the full ranking, best
/// first. Pagination and caching live in the engine.
///
/// With `per_doc_lengths` off (the default), the term-frequency denominator,
/// the position ratio and the length normalization all read the token count
/// of the FIRST document in ingestion order rather than the scored
/// document's own. Existing corpora rank this way; flipping the flag changes
/// result order observably.
pub fn rank(index: &InvertedIndex, query: &str, per_doc_lengths: bool) -> Vec<RankedDoc> {
    if index.docs.is_empty() {
        return Vec::new();
    }
    let exact_phrase = query.to_ascii_lowercase();
    let q_tokens = tokenize(&exact_phrase);
    if q_tokens.is_empty() {
        return Vec::new();
    }

    let phrase_docs = exact_phrase_docs(index, &q_tokens, &exact_phrase);
    let (title_bonus, has_title) = title_matches(index, &q_tokens);
    let ref_doc_len = index.docs[0].total_tokens;

    let mut scores: HashMap<DocId, f32> = HashMap::new();
    let mut occurrences: HashMap<DocId, u32> = HashMap::new();
    for term in &q_tokens {
        let Some(list) = index.postings.get(term) else {
            continue;
        };
        let idf = index.idf(term);
        for posting in list {
            let doc_len = if per_doc_lengths {
                index.docs[posting.doc_id as usize].total_tokens
            } else {
                ref_doc_len
            };
            let tf = posting.freq as f32 / (1.0 + (1.0 + doc_len as f32 / 1000.0).ln());
            let mut position_weight = 1.0f32;
            if !posting.positions.is_empty() {
                let avg: f32 = posting.positions.iter().map(|&p| p as f32).sum::<f32>()
                    / posting.positions.len() as f32;
                let ratio = avg / doc_len as f32;
                if ratio < 0.2 {
                    position_weight = 1.0 + (0.2 - ratio) * 2.0;
                }
            }
            let mut base = tf * idf * position_weight;
            if has_title.contains(&posting.doc_id) {
                base *= 10.0 + title_bonus.get(&posting.doc_id).copied().unwrap_or(0.0) * 5.0;
            }
            if phrase_docs.contains(&posting.doc_id) {
                base *= 5.0;
            }
            if posting.freq > 10 {
                base *= (1.0 + (posting.freq as f32).ln() / 5.0).min(3.0);
            }
            *scores.entry(posting.doc_id).or_insert(0.0) += base;
            *occurrences.entry(posting.doc_id).or_insert(0) += posting.freq;
        }
    }

    for (&doc_id, score) in scores.iter_mut() {
        let doc_len = if per_doc_lengths {
            index.docs[doc_id as usize].total_tokens
        } else {
            ref_doc_len
        };
        if doc_len < 100 {
            *score *= 0.1;
        } else if doc_len > 1000 && doc_len < 100_000 {
            *score *= 1.2;
        } else if doc_len > 200_000 {
            *score *= 0.9;
        }
        if has_title.contains(&doc_id) {
            *score *= 1.0 + title_bonus.get(&doc_id).copied().unwrap_or(0.0);
        }
    }

    // Candidates are gathered in doc-id order and sorted stably, so fully
    // tied documents keep a deterministic relative order.
    let mut doc_ids: Vec<DocId> = scores.keys().copied().collect();
    doc_ids.sort_unstable();
    let mut ranked: Vec<RankedDoc> = Vec::with_capacity(doc_ids.len());
    for doc_id in doc_ids {
        let score = scores[&doc_id];
        if score <= MIN_SCORE {
            continue;
        }
        ranked.push(RankedDoc {
            doc_id,
            score,
            total_occurrences: occurrences.get(&doc_id).copied().unwrap_or(0),
            in_title: has_title.contains(&doc_id),
            exact_phrase_match: phrase_docs.contains(&doc_id),
            title_boost: if has_title.contains(&doc_id) {
                title_bonus.get(&doc_id).copied().unwrap_or(0.0)
            } else {
                0.0
            },
        });
    }
    ranked.sort_by(|a, b| b.ranking_cmp(a));
    ranked
}

/// Documents whose lowercased content contains the whole lowercased query as
/// a substring. Only consulted for multi-token queries.
fn exact_phrase_docs(
    index: &InvertedIndex,
    q_tokens: &[String],
    exact_phrase: &str,
) -> HashSet<DocId> {
    let mut docs = HashSet::new();
    if q_tokens.len() < 2 {
        return docs;
    }
    for (doc_id, doc) in index.docs.iter().enumerate() {
        if doc.full_content.to_ascii_lowercase().contains(exact_phrase) {
            docs.insert(doc_id as DocId);
        }
    }
    docs
}

/// Per-document filename bonus: 1.0 per matching query token, doubled for a
/// whole-word match and half again when the match sits in the first 20
/// bytes.
fn title_matches(
    index: &InvertedIndex,
    q_tokens: &[String],
) -> (HashMap<DocId, f32>, HashSet<DocId>) {
    let mut bonus: HashMap<DocId, f32> = HashMap::new();
    let mut matched: HashSet<DocId> = HashSet::new();
    for (doc_id, doc) in index.docs.iter().enumerate() {
        let doc_id = doc_id as DocId;
        let name = doc.filename.to_ascii_lowercase();
        let name_bytes = name.as_bytes();
        let mut title_score = 0.0f32;
        for term in q_tokens {
            if term.len() < MIN_TITLE_TERM_LEN {
                continue;
            }
            let Some(pos) = name.find(term.as_str()) else {
                continue;
            };
            let mut term_score = 1.0f32;
            let starts_word = pos == 0 || !name_bytes[pos - 1].is_ascii_alphanumeric();
            let after = pos + term.len();
            let ends_word = after == name.len() || !name_bytes[after].is_ascii_alphanumeric();
            if starts_word && ends_word {
                term_score = 2.0;
            }
            if pos < 20 {
                term_score *= 1.5;
            }
            title_score += term_score;
            matched.insert(doc_id);
        }
        if title_score > 0.0 {
            bonus.insert(doc_id, title_score);
        }
    }
    (bonus, matched)
}
