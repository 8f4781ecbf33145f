use std::collections::HashMap;

use serde::Serialize;

use crate::stopwords::is_stopword;

/// Lowercase, split on anything that is not alphanumeric, and drop stopwords
/// and tokens shorter than `min_word_len` characters.
pub fn tokenize(text: &str, min_word_len: usize) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .filter(|token| token.chars().count() >= min_word_len)
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

/// Word counts of the retained tokens of a text.
///
/// `total()` always equals the sum of all counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WordFrequency {
    counts: HashMap<String, usize>,
    total: usize,
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordStat {
    pub word: String,
    pub count: usize,
    /// `count / total`, in `0.0..=1.0`.
    pub density: f64,
}

impl WordFrequency {
    pub fn from_text(text: &str, min_word_len: usize) -> Self {
        Self::from_tokens(tokenize(text, min_word_len))
    }

    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut frequency = Self::default();
        for token in tokens {
            *frequency.counts.entry(token).or_insert(0) += 1;
            frequency.total += 1;
        }
        frequency
    }

    pub fn count(&self, word: &str) -> usize {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn density(&self, word: &str) -> Option<f64> {
        self.counts
            .get(word)
            .map(|&count| count as f64 / self.total as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(word, &count)| (word.as_str(), count))
    }

    /// All words, most frequent first; equal counts sort alphabetically.
    pub fn ranked(&self) -> Vec<WordStat> {
        let mut stats: Vec<WordStat> = self
            .iter()
            .map(|(word, count)| WordStat {
                word: word.to_string(),
                count,
                density: count as f64 / self.total as f64,
            })
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
        stats
    }

    pub fn top(&self, n: usize) -> Vec<WordStat> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// How often a declared meta keyword shows up in the visible text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordUsage {
    pub keyword: String,
    pub occurrences: usize,
    /// Occurrences per hundred whitespace-separated words.
    pub density_percent: f64,
}

/// Count each keyword as a case-insensitive substring of `text`.
pub fn keyword_usage(keywords: &[String], text: &str) -> Vec<KeywordUsage> {
    let haystack = text.to_lowercase();
    let total_words = text.split_whitespace().count();

    keywords
        .iter()
        .map(|keyword| {
            let needle = keyword.to_lowercase();
            let occurrences = if needle.is_empty() {
                0
            } else {
                haystack.matches(needle.as_str()).count()
            };
            let density_percent = if total_words == 0 {
                0.0
            } else {
                occurrences as f64 / total_words as f64 * 100.0
            };
            KeywordUsage {
                keyword: keyword.clone(),
                occurrences,
                density_percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn counts_and_densities_for_simple_text() {
        let frequency = WordFrequency::from_text("SEO SEO analysis tool analysis", 2);

        assert_eq!(frequency.count("seo"), 2);
        assert_eq!(frequency.count("analysis"), 2);
        assert_eq!(frequency.count("tool"), 1);
        assert_eq!(frequency.len(), 3);
        assert_eq!(frequency.total(), 5);

        assert!((frequency.density("seo").unwrap() - 0.4).abs() < EPSILON);
        assert!((frequency.density("analysis").unwrap() - 0.4).abs() < EPSILON);
        assert!((frequency.density("tool").unwrap() - 0.2).abs() < EPSILON);
    }

    #[test]
    fn stopwords_and_short_tokens_are_never_keys() {
        let frequency = WordFrequency::from_text("The cat and a dog: x y z, the END.", 2);

        for dropped in ["the", "and", "a", "x", "y", "z"] {
            assert_eq!(frequency.count(dropped), 0, "{dropped}");
        }
        assert!(frequency.iter().all(|(word, _)| word.chars().count() >= 2));
        assert_eq!(frequency.count("end"), 1);
    }

    #[test]
    fn min_length_is_configurable() {
        let frequency = WordFrequency::from_text("web seo rust crate", 4);
        assert_eq!(frequency.count("seo"), 0);
        assert_eq!(frequency.count("web"), 0);
        assert_eq!(frequency.count("rust"), 1);
        assert_eq!(frequency.count("crate"), 1);
    }

    #[test]
    fn splits_on_non_alphanumeric_boundaries() {
        let tokens = tokenize("rust-lang/seo_tool e-mail: café 2024", 2);
        assert_eq!(tokens, vec!["rust", "lang", "seo", "tool", "mail", "café", "2024"]);
    }

    #[test]
    fn counts_sum_to_total_and_densities_to_one() {
        let text = "Search engines rank pages. Pages with clear titles rank better; \
                    search engines reward clear structure and clear content.";
        let frequency = WordFrequency::from_text(text, 2);

        let sum: usize = frequency.iter().map(|(_, count)| count).sum();
        assert_eq!(sum, frequency.total());
        assert_eq!(sum, tokenize(text, 2).len());

        let density_sum: f64 = frequency.ranked().iter().map(|stat| stat.density).sum();
        assert!((density_sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn deterministic_ranking() {
        let text = "beta alpha gamma beta alpha delta";
        let first = WordFrequency::from_text(text, 2).ranked();
        let second = WordFrequency::from_text(text, 2).ranked();
        assert_eq!(first, second);

        let words: Vec<&str> = first.iter().map(|stat| stat.word.as_str()).collect();
        assert_eq!(words, vec!["alpha", "beta", "delta", "gamma"]);
        assert_eq!(WordFrequency::from_text(text, 2).top(2).len(), 2);
    }

    #[test]
    fn empty_text_has_no_words() {
        let frequency = WordFrequency::from_text("", 2);
        assert!(frequency.is_empty());
        assert_eq!(frequency.total(), 0);
        assert_eq!(frequency.density("anything"), None);
        assert!(frequency.ranked().is_empty());
    }

    #[test]
    fn meta_keyword_usage() {
        let keywords = vec!["SEO".to_string(), "page speed".to_string(), "missing".to_string()];
        let usage = keyword_usage(&keywords, "SEO tips: page speed matters for seo and page speed");

        assert_eq!(usage[0].occurrences, 2);
        assert_eq!(usage[1].occurrences, 2);
        assert_eq!(usage[2].occurrences, 0);
        // 10 whitespace-separated words.
        assert!((usage[0].density_percent - 20.0).abs() < EPSILON);
        assert_eq!(usage[2].density_percent, 0.0);
    }
}
