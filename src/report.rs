//! View model the single page renders, and its CSV export.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::{Analysis, TextStats};
use crate::error::{AppError, Result};
use crate::fetcher::FetchSummary;
use crate::frequency::KeywordUsage;
use crate::metadata::PageSignals;
use crate::readability;
use crate::seo::{Recommendation, SeoScore};

#[derive(Debug, Clone, Serialize)]
pub struct MetadataView {
    pub title: Option<String>,
    pub title_length: usize,
    pub keywords: Vec<String>,
    pub description: Option<String>,
    pub description_length: usize,
}

/// One bar of the word-frequency chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub word: String,
    pub count: usize,
    /// Share of all retained tokens, as a percentage.
    pub density_percent: f64,
    /// Bar length relative to the most frequent word, in `0..=100`.
    pub bar_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrequencyView {
    pub total_tokens: usize,
    pub distinct_words: usize,
    pub top_words: Vec<ChartBar>,
    /// How many distinct words occur exactly `n` times, keyed by `n`.
    pub histogram: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub fetch: FetchSummary,
    pub metadata: MetadataView,
    pub signals: PageSignals,
    pub text: TextStats,
    pub readability_label: Option<&'static str>,
    pub frequency: FrequencyView,
    pub keyword_usage: Vec<KeywordUsage>,
    pub score: SeoScore,
    pub grade: &'static str,
    pub recommendations: Vec<Recommendation>,
}

impl Report {
    pub fn new(analysis: &Analysis, top_n: usize) -> Self {
        let top = analysis.frequency.top(top_n);
        let max_count = top.first().map_or(0, |stat| stat.count);
        let top_words = top
            .into_iter()
            .map(|stat| ChartBar {
                bar_percent: if max_count == 0 {
                    0.0
                } else {
                    stat.count as f64 / max_count as f64 * 100.0
                },
                density_percent: stat.density * 100.0,
                word: stat.word,
                count: stat.count,
            })
            .collect();

        let mut histogram = BTreeMap::new();
        for (_, count) in analysis.frequency.iter() {
            *histogram.entry(count).or_insert(0) += 1;
        }

        let metadata = &analysis.metadata;
        Self {
            fetch: analysis.fetch.clone(),
            metadata: MetadataView {
                title: metadata.title.clone(),
                title_length: metadata.title_len(),
                keywords: metadata.keywords.clone(),
                description: metadata.description.clone(),
                description_length: metadata.description_len(),
            },
            signals: analysis.signals.clone(),
            text: analysis.text.clone(),
            readability_label: analysis.text.readability.map(readability::difficulty),
            frequency: FrequencyView {
                total_tokens: analysis.frequency.total(),
                distinct_words: analysis.frequency.len(),
                top_words,
                histogram,
            },
            keyword_usage: analysis.keyword_usage.clone(),
            score: analysis.score.clone(),
            grade: analysis.score.grade(),
            recommendations: analysis.recommendations.clone(),
        }
    }

    /// Flat `section,item,value,detail` table of the report.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["section", "item", "value", "detail"])?;

        let optional = |value: &Option<String>| value.clone().unwrap_or_default();
        let metadata = &self.metadata;
        writer.write_record([
            "metadata".to_string(),
            "title".to_string(),
            optional(&metadata.title),
            metadata.title_length.to_string(),
        ])?;
        writer.write_record([
            "metadata".to_string(),
            "description".to_string(),
            optional(&metadata.description),
            metadata.description_length.to_string(),
        ])?;
        writer.write_record([
            "metadata".to_string(),
            "keywords".to_string(),
            metadata.keywords.join("; "),
            metadata.keywords.len().to_string(),
        ])?;

        let fetch = &self.fetch;
        let page_rows = [
            ("final_url", fetch.final_url.clone()),
            ("status_code", fetch.status_code.to_string()),
            ("response_time_ms", fetch.response_time_ms.to_string()),
            ("content_length", fetch.content_length.to_string()),
            ("https", fetch.is_https.to_string()),
        ];
        for (item, value) in page_rows {
            writer.write_record(["page", item, value.as_str(), ""])?;
        }

        writer.write_record([
            "text",
            "word_count",
            self.text.word_count.to_string().as_str(),
            "",
        ])?;
        writer.write_record([
            "text".to_string(),
            "readability".to_string(),
            self.text
                .readability
                .map(|score| format!("{score:.1}"))
                .unwrap_or_default(),
            self.readability_label.unwrap_or_default().to_string(),
        ])?;

        writer.write_record([
            "score".to_string(),
            "total".to_string(),
            self.score.total.to_string(),
            self.grade.to_string(),
        ])?;
        for factor in &self.score.factors {
            writer.write_record([
                "score".to_string(),
                factor.name.to_string(),
                factor.score.to_string(),
                format!("max {}", factor.max),
            ])?;
        }

        for bar in &self.frequency.top_words {
            writer.write_record([
                "word".to_string(),
                bar.word.clone(),
                bar.count.to_string(),
                format!("{:.2}%", bar.density_percent),
            ])?;
        }
        for usage in &self.keyword_usage {
            writer.write_record([
                "keyword".to_string(),
                usage.keyword.clone(),
                usage.occurrences.to_string(),
                format!("{:.2}%", usage.density_percent),
            ])?;
        }
        for recommendation in &self.recommendations {
            writer.write_record([
                "recommendation".to_string(),
                recommendation.issue.to_string(),
                format!("{:?}", recommendation.priority),
                recommendation.advice.clone(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::ExportError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| AppError::ExportError(e.to_string()))
    }
}
