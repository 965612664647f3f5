/// Lexical scorer and ranker over the in-memory guidance library.
///
/// Scores are integers built from keyword containment, a character-overlap
/// fallback, and a flat bonus for title/topic/guidance containment.
use std::collections::HashSet;

use tracing::debug;

use crate::config::DEFAULT_RESULT_LIMIT;
use crate::model::{Entry, Field, Library, GUIDANCE_BEARING_KEYS};
use crate::text::{normalize, split_keywords};

/// Weights used by [`SearchEngine::score`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringWeights {
    /// Flat part of a keyword found inside the query.
    pub keyword_hit_base: u32,
    /// Added per keyword character, up to `keyword_hit_char_cap` characters.
    pub keyword_hit_per_char: u32,
    pub keyword_hit_char_cap: usize,
    /// Query (two or more characters) found inside a longer keyword.
    pub keyword_contains_query: u32,
    /// Three or more distinct shared characters.
    pub overlap_strong: u32,
    /// Exactly two distinct shared characters.
    pub overlap_weak: u32,
    /// Title, topic, or guidance contains the query or vice versa. Applied once.
    pub secondary_bonus: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            keyword_hit_base: 4,
            keyword_hit_per_char: 2,
            keyword_hit_char_cap: 4,
            keyword_contains_query: 3,
            overlap_strong: 2,
            overlap_weak: 1,
            secondary_bonus: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    weights: ScoringWeights,
    result_limit: usize,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), DEFAULT_RESULT_LIMIT)
    }
}

impl SearchEngine {
    pub fn new(weights: ScoringWeights, result_limit: usize) -> Self {
        Self {
            weights,
            result_limit: result_limit.max(1),
        }
    }

    /// Relevance of `entry` to `query`. Zero for an empty normalized query.
    pub fn score(&self, query: &str, entry: &Entry) -> u32 {
        let q = normalize(query);
        if q.is_empty() {
            return 0;
        }
        self.score_normalized(&q, entry)
    }

    fn score_normalized(&self, q: &str, entry: &Entry) -> u32 {
        let w = &self.weights;
        let q_chars = q.chars().count();
        let mut score = 0u32;

        for keyword in split_keywords(entry.get(Field::Keywords)) {
            let nk = normalize(&keyword);
            if nk.is_empty() {
                continue;
            }
            if q.contains(nk.as_str()) {
                let len = nk.chars().count().min(w.keyword_hit_char_cap) as u32;
                score += w.keyword_hit_base + w.keyword_hit_per_char * len;
            } else if q_chars >= 2 && nk.contains(q) {
                score += w.keyword_contains_query;
            } else {
                score += match shared_chars(q, &nk) {
                    n if n >= 3 => w.overlap_strong,
                    2 => w.overlap_weak,
                    _ => 0,
                };
            }
        }

        let secondary_hit = [Field::Title, Field::Topic, Field::Guidance]
            .into_iter()
            .map(|f| normalize(entry.get(f)))
            .any(|text| !text.is_empty() && (text.contains(q) || q.contains(text.as_str())));
        if secondary_hit {
            score += w.secondary_bonus;
        }

        score
    }

    /// Best entries for `query`, highest score first, at most `result_limit`.
    ///
    /// Ties keep library order. An empty result means "no match" and is not an error.
    pub fn rank<'a>(&self, query: &str, library: &'a Library) -> Vec<&'a Entry> {
        let q = normalize(query);
        if q.is_empty() {
            return Vec::new();
        }

        let bearing: Vec<&Entry> = library
            .entries
            .iter()
            .filter(|e| e.has_any_key(GUIDANCE_BEARING_KEYS))
            .collect();
        let pool = if bearing.is_empty() {
            library.entries.iter().collect()
        } else {
            bearing
        };

        let mut scored: Vec<(&Entry, u32)> = pool
            .into_iter()
            .map(|e| (e, self.score_normalized(&q, e)))
            .filter(|(_, s)| *s > 0)
            .collect();
        // `sort_by` is stable, so equal scores keep library order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.result_limit);

        debug!(
            query = %q,
            matches = scored.len(),
            top_score = scored.first().map(|(_, s)| *s).unwrap_or(0),
            "ranked library"
        );

        scored.into_iter().map(|(e, _)| e).collect()
    }
}

/// Number of distinct non-whitespace characters the two strings share.
fn shared_chars(a: &str, b: &str) -> usize {
    let sa: HashSet<char> = a.chars().filter(|c| !c.is_whitespace()).collect();
    b.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<HashSet<char>>()
        .intersection(&sa)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keywords: &str) -> Entry {
        Entry::from_pairs([("關鍵字", keywords)])
    }

    fn library(entries: Vec<Entry>) -> Library {
        Library {
            entries,
            ..Library::default()
        }
    }

    #[test]
    fn matching_keyword_outscores_unrelated_keywords() {
        let engine = SearchEngine::default();
        let relevant = engine.score("孩子一直尖叫", &entry("尖叫,崩潰"));
        let unrelated = engine.score("孩子一直尖叫", &entry("作業,遲交"));
        assert!(relevant > 0);
        assert!(relevant > unrelated);
        assert_eq!(unrelated, 0);
    }

    #[test]
    fn longer_keyword_hits_weigh_more_up_to_the_cap() {
        let engine = SearchEngine::default();
        assert_eq!(engine.score("我想哭", &entry("哭")), 6);
        assert_eq!(engine.score("他在尖叫", &entry("尖叫")), 8);
        assert_eq!(engine.score("忍不住對孩子發火了", &entry("忍不住對孩子發火")), 12);
    }

    #[test]
    fn short_query_inside_keyword_gets_fixed_weight() {
        let engine = SearchEngine::default();
        assert_eq!(engine.score("崩潰", &entry("情緒崩潰")), 3);
        // A single-character query never counts as contained.
        assert_eq!(engine.score("吼", &entry("怒吼聲")), 0);
    }

    #[test]
    fn character_overlap_is_a_graded_fallback() {
        let engine = SearchEngine::default();
        // 2 shared characters: 孩, 子
        assert_eq!(engine.score("孩子不睡", &entry("孩子的功課")), 1);
        // 3 shared characters: 孩, 子, 睡
        assert_eq!(engine.score("孩子不睡", &entry("孩子想睡覺了")), 2);
        assert_eq!(engine.score("孩子不睡", &entry("作業")), 0);
    }

    #[test]
    fn secondary_fields_add_a_flat_bonus_once() {
        let engine = SearchEngine::default();
        let e = Entry::from_pairs([
            ("相關主題", "發火"),
            ("智慧引導", "當你發火時，先停一下"),
        ]);
        assert_eq!(engine.score("發火", &e), 2);
        assert_eq!(engine.score("我又發火了", &e), 2);
    }

    #[test]
    fn empty_or_punctuation_query_scores_zero() {
        let engine = SearchEngine::default();
        let e = Entry::from_pairs([("關鍵字", "尖叫"), ("智慧引導", "尖叫")]);
        assert_eq!(engine.score("", &e), 0);
        assert_eq!(engine.score("   ", &e), 0);
        assert_eq!(engine.score("，！？", &e), 0);
    }

    #[test]
    fn rank_orders_by_score_and_bounds_results() {
        let engine = SearchEngine::default();
        let lib = library(vec![
            entry("作業"),
            entry("哭"),
            entry("尖叫,哭"),
            entry("尖叫"),
            entry("崩潰,尖叫,哭"),
        ]);
        let ranked = engine.rank("孩子尖叫又哭，我快崩潰", &lib);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].get(Field::Keywords), "崩潰,尖叫,哭");
        assert_eq!(ranked[1].get(Field::Keywords), "尖叫,哭");
        assert_eq!(ranked[2].get(Field::Keywords), "尖叫");
    }

    #[test]
    fn rank_ties_keep_library_order() {
        let engine = SearchEngine::default();
        let first = Entry::from_pairs([("關鍵字", "尖叫"), ("相關主題", "A")]);
        let second = Entry::from_pairs([("關鍵字", "尖叫"), ("相關主題", "B")]);
        let lib = library(vec![first, second]);
        let ranked = engine.rank("尖叫", &lib);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].get(Field::Topic), "A");
        assert_eq!(ranked[1].get(Field::Topic), "B");
    }

    #[test]
    fn rank_respects_single_result_limit() {
        let engine = SearchEngine::new(ScoringWeights::default(), 1);
        let lib = library(vec![entry("尖叫"), entry("尖叫,哭")]);
        let ranked = engine.rank("尖叫哭", &lib);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].get(Field::Keywords), "尖叫,哭");
    }

    #[test]
    fn rank_with_no_positive_scores_is_empty() {
        let engine = SearchEngine::default();
        let lib = library(vec![entry("作業,遲交"), entry("考試")]);
        assert!(engine.rank("孩子尖叫", &lib).is_empty());
        assert!(engine.rank("！", &lib).is_empty());
        assert!(engine.rank("孩子尖叫", &Library::default()).is_empty());
    }

    #[test]
    fn rank_prefers_guidance_bearing_rows_when_present() {
        let engine = SearchEngine::default();
        let other_sheet = Entry::from_pairs([("標題", "尖叫")]);
        let guidance_row = entry("尖叫");
        let lib = library(vec![other_sheet.clone(), guidance_row]);
        let ranked = engine.rank("尖叫", &lib);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].get(Field::Keywords), "尖叫");

        // Without any guidance-bearing rows the whole library is searched.
        let only_other = library(vec![other_sheet]);
        assert_eq!(engine.rank("尖叫", &only_other).len(), 1);
    }
}
