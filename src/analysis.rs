use scraper::Html;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::AnalysisOptions;
use crate::error::Result;
use crate::fetcher::{FetchSummary, Fetcher, PageContent};
use crate::frequency::{KeywordUsage, WordFrequency, keyword_usage};
use crate::metadata::{Metadata, PageSignals, extract_signals, metadata_from_document};
use crate::readability::flesch_reading_ease;
use crate::seo::{self, Recommendation, ScoreInput, SeoScore};
use crate::text::{sentence_count, visible_text};

/// Counts describing the visible text of a page.
#[derive(Debug, Clone, Serialize)]
pub struct TextStats {
    /// Whitespace-separated words, before any filtering.
    pub word_count: usize,
    pub char_count: usize,
    pub sentence_count: usize,
    pub readability: Option<f64>,
}

/// Everything learned about one page.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub fetch: FetchSummary,
    pub metadata: Metadata,
    pub signals: PageSignals,
    pub text: TextStats,
    pub visible_text: String,
    pub frequency: WordFrequency,
    pub keyword_usage: Vec<KeywordUsage>,
    pub score: SeoScore,
    pub recommendations: Vec<Recommendation>,
}

/// Run the parse → count → score stages over an already fetched page.
pub fn analyze_page(page: &PageContent, options: &AnalysisOptions) -> Analysis {
    let document = Html::parse_document(&page.raw_html);
    if !document.errors.is_empty() {
        debug!(url = %page.url, errors = document.errors.len(), "recovered from malformed HTML");
    }

    let metadata = metadata_from_document(&document);
    let signals = extract_signals(&document, &page.url);
    let visible = visible_text(&document, options.strip_boilerplate);

    let text = TextStats {
        word_count: visible.split_whitespace().count(),
        char_count: visible.chars().count(),
        sentence_count: sentence_count(&visible),
        readability: flesch_reading_ease(&visible),
    };
    let frequency = WordFrequency::from_text(&visible, options.min_word_len);
    let keyword_usage = keyword_usage(&metadata.keywords, &visible);

    let fetch = page.summary();
    let score_input = ScoreInput {
        metadata: &metadata,
        signals: &signals,
        word_count: text.word_count,
        is_https: fetch.is_https,
        readability: text.readability,
    };
    let score = seo::score(&score_input);
    let recommendations = seo::recommendations(&score_input);

    Analysis {
        fetch,
        metadata,
        signals,
        text,
        visible_text: visible,
        frequency,
        keyword_usage,
        score,
        recommendations,
    }
}

/// Fetches a URL and analyzes the returned page.
#[derive(Clone)]
pub struct Analyzer {
    fetcher: Fetcher,
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(fetcher: Fetcher, options: AnalysisOptions) -> Self {
        Self { fetcher, options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub async fn analyze(&self, url: &str) -> Result<Analysis> {
        let page = self.fetcher.fetch(url).await?;
        let analysis = analyze_page(&page, &self.options);

        info!(
            url = %analysis.fetch.final_url,
            words = analysis.text.word_count,
            distinct_words = analysis.frequency.len(),
            score = analysis.score.total,
            "page analyzed"
        );
        Ok(analysis)
    }
}
