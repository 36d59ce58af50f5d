use crate::cache::BoundedCache;
use std::collections::VecDeque;

const ALPHABET: usize = 26;
const MAX_WORD_LEN: usize = 25;
/// Breadth-first frontier bound; enqueues past this are dropped. Small
/// completion limits keep the loss benign.
const BFS_QUEUE_CAP: usize = 1024;
const PREFIX_CACHE_CAP: usize = 1000;

#[derive(Default)]
struct Node {
    children: [Option<Box<Node>>; ALPHABET],
    is_end: bool,
}

/// Lowercase a-z prefix trie with a bounded completion cache.
pub struct Trie {
    root: Node,
    cache: BoundedCache<Vec<String>>,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            root: Node::default(),
            cache: BoundedCache::new(PREFIX_CACHE_CAP),
        }
    }

    /// Insert a word. Empty words, words longer than 25 bytes and words with
    /// any byte outside `a..=z` are silently ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() || word.len() > MAX_WORD_LEN {
            return;
        }
        let mut cur = &mut self.root;
        for &b in word.as_bytes() {
            if !b.is_ascii_lowercase() {
                return;
            }
            cur = cur.children[(b - b'a') as usize]
                .get_or_insert_with(Box::default)
                .as_mut();
        }
        cur.is_end = true;
    }

    /// Up to `limit` words extending `prefix`, shortest first (breadth-first,
    /// `a..=z` within a length). An empty prefix yields no completions.
    pub fn starts_with(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        let cache_key = format!("{prefix}|{limit}");
        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }
        let results = self.collect(prefix, limit);
        self.cache.insert(cache_key, results.clone());
        results
    }

    fn collect(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        if prefix.is_empty() {
            return results;
        }
        let mut cur = &self.root;
        for &b in prefix.as_bytes() {
            if !b.is_ascii_lowercase() {
                return results;
            }
            match &cur.children[(b - b'a') as usize] {
                Some(child) => cur = child.as_ref(),
                None => return results,
            }
        }
        let mut queue: VecDeque<(&Node, String)> = VecDeque::new();
        queue.push_back((cur, prefix.to_string()));
        while let Some((node, word)) = queue.pop_front() {
            if results.len() >= limit {
                break;
            }
            if node.is_end {
                results.push(word.clone());
            }
            for (i, child) in node.children.iter().enumerate() {
                if results.len() >= limit {
                    break;
                }
                if let Some(child) = child {
                    if queue.len() < BFS_QUEUE_CAP {
                        let mut next = word.clone();
                        next.push((b'a' + i as u8) as char);
                        queue.push_back((child.as_ref(), next));
                    }
                }
            }
        }
        results
    }

    pub fn clear(&mut self) {
        self.root = Node::default();
        self.cache.clear();
    }
}
