//! Overall SEO score and actionable recommendations.

use serde::Serialize;

use crate::metadata::{Metadata, PageSignals};

pub const MAX_SCORE: u32 = 100;
pub const MIN_CONTENT_WORDS: usize = 300;

/// Inputs the scorer looks at, borrowed from an analysis.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub metadata: &'a Metadata,
    pub signals: &'a PageSignals,
    pub word_count: usize,
    pub is_https: bool,
    pub readability: Option<f64>,
}

/// Points earned for one factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreFactor {
    pub name: &'static str,
    pub score: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeoScore {
    pub total: u32,
    pub factors: Vec<ScoreFactor>,
}

impl SeoScore {
    pub fn grade(&self) -> &'static str {
        match self.total {
            70.. => "good",
            50..=69 => "fair",
            _ => "poor",
        }
    }
}

pub fn score(input: &ScoreInput<'_>) -> SeoScore {
    let metadata = input.metadata;
    let signals = input.signals;

    let title = match (metadata.title.is_some(), metadata.title_len()) {
        (false, _) | (true, 0) => 0,
        (true, 30..=60) => 15,
        (true, 20..=29 | 61..=70) => 10,
        (true, _) => 5,
    };

    let description = match metadata.description_len() {
        0 => 0,
        120..=160 => 15,
        100..=119 | 161..=180 => 10,
        _ => 5,
    };

    let h1_points = match signals.headings.h1.len() {
        0 => 0,
        1 => 15,
        _ => 5,
    };
    let h2_points = if signals.headings.h2.is_empty() { 0 } else { 5 };

    let images = signals
        .alt_ratio()
        .map_or(0, |ratio| (10.0 * ratio).floor() as u32);

    let links = (signals.internal_links / 5).min(5) as u32;

    let content = match input.word_count {
        300.. => 10,
        200..=299 => 7,
        100..=199 => 4,
        _ => 0,
    };

    let factors = vec![
        ScoreFactor { name: "Title", score: title, max: 15 },
        ScoreFactor { name: "Meta Description", score: description, max: 15 },
        ScoreFactor { name: "Headings", score: h1_points + h2_points, max: 20 },
        ScoreFactor { name: "Images", score: images, max: 10 },
        ScoreFactor { name: "Mobile", score: if signals.has_viewport { 10 } else { 0 }, max: 10 },
        ScoreFactor { name: "Schema", score: if signals.schema_blocks > 0 { 10 } else { 0 }, max: 10 },
        ScoreFactor { name: "Canonical", score: if signals.canonical_url.is_some() { 5 } else { 0 }, max: 5 },
        ScoreFactor { name: "Links", score: links, max: 5 },
        ScoreFactor { name: "Content", score: content, max: 10 },
    ];

    let total = factors.iter().map(|f| f.score).sum::<u32>().min(MAX_SCORE);
    SeoScore { total, factors }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Priority {
    Critical,
    Important,
    Recommended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub issue: &'static str,
    pub advice: String,
    pub impact: Impact,
}

impl Recommendation {
    fn new(priority: Priority, issue: &'static str, advice: impl Into<String>) -> Self {
        let impact = match priority {
            Priority::Critical => Impact::High,
            Priority::Important => Impact::Medium,
            Priority::Recommended => Impact::Low,
        };
        Self {
            priority,
            issue,
            advice: advice.into(),
            impact,
        }
    }
}

/// Recommendations ordered from most to least urgent.
pub fn recommendations(input: &ScoreInput<'_>) -> Vec<Recommendation> {
    use Priority::*;

    let metadata = input.metadata;
    let signals = input.signals;
    let mut out = Vec::new();

    match metadata.title_len() {
        0 => out.push(Recommendation::new(
            Critical,
            "Missing Title Tag",
            "Add a descriptive title tag (30-60 characters) that includes your primary keyword.",
        )),
        len @ 1..30 => out.push(Recommendation::new(
            Important,
            "Title Too Short",
            format!("Expand your title tag from {len} to 30-60 characters."),
        )),
        len @ 61.. => out.push(Recommendation::new(
            Important,
            "Title Too Long",
            format!("Shorten your title tag from {len} to 30-60 characters to avoid truncation."),
        )),
        _ => {}
    }

    match metadata.description_len() {
        0 => out.push(Recommendation::new(
            Critical,
            "Missing Meta Description",
            "Add a compelling meta description (120-160 characters) to improve click-through rates.",
        )),
        len @ 1..120 => out.push(Recommendation::new(
            Important,
            "Meta Description Too Short",
            format!("Expand your meta description from {len} to 120-160 characters."),
        )),
        _ => {}
    }

    match signals.headings.h1.len() {
        0 => out.push(Recommendation::new(
            Critical,
            "No H1 Tag",
            "Add exactly one H1 tag with your primary keyword.",
        )),
        1 => {}
        count => out.push(Recommendation::new(
            Important,
            "Multiple H1 Tags",
            format!("Reduce H1 tags from {count} to 1. Use H2-H6 for subheadings."),
        )),
    }

    if signals.alt_ratio().is_some_and(|ratio| ratio < 0.8) {
        out.push(Recommendation::new(
            Important,
            "Missing Alt Text on Images",
            format!(
                "Add alt text to {} images for better accessibility and SEO.",
                signals.images_without_alt()
            ),
        ));
    }

    if !signals.has_viewport {
        out.push(Recommendation::new(
            Critical,
            "Not Mobile-Friendly",
            "Add a viewport meta tag to make the page mobile-responsive.",
        ));
    }

    if !input.is_https {
        out.push(Recommendation::new(
            Critical,
            "Not Using HTTPS",
            "Serve the page over HTTPS to improve security and rankings.",
        ));
    }

    if input.word_count < MIN_CONTENT_WORDS {
        out.push(Recommendation::new(
            Important,
            "Low Content Length",
            format!(
                "Increase content from {} to at least {MIN_CONTENT_WORDS} words.",
                input.word_count
            ),
        ));
    }

    if signals.schema_blocks == 0 {
        out.push(Recommendation::new(
            Recommended,
            "No Schema Markup",
            "Add structured data (JSON-LD) to help search engines understand your content.",
        ));
    }

    if signals.canonical_url.is_none() {
        out.push(Recommendation::new(
            Recommended,
            "No Canonical URL",
            "Add a canonical URL to prevent duplicate content issues.",
        ));
    }

    if signals.open_graph.is_empty() {
        out.push(Recommendation::new(
            Recommended,
            "No Open Graph Tags",
            "Add Open Graph tags to improve how the page looks when shared.",
        ));
    }

    if let Some(score) = input.readability.filter(|s| *s > 0.0 && *s < 30.0) {
        out.push(Recommendation::new(
            Recommended,
            "Low Readability Score",
            format!("Improve readability (current: {score:.1}). Use simpler language and shorter sentences."),
        ));
    }

    out.sort_by_key(|r| r.priority);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Headings;

    fn good_signals() -> PageSignals {
        PageSignals {
            headings: Headings {
                h1: vec!["Main".into()],
                h2: vec!["Sub".into()],
                h3: vec![],
            },
            images_total: 4,
            images_with_alt: 4,
            internal_links: 30,
            external_links: 2,
            canonical_url: Some("https://example.com/".into()),
            open_graph: [("og:title".to_string(), "Example".to_string())].into(),
            has_viewport: true,
            schema_blocks: 1,
            ..PageSignals::default()
        }
    }

    fn good_metadata() -> Metadata {
        Metadata {
            title: Some("A title that is comfortably long enough".into()),
            keywords: vec![],
            description: Some("d".repeat(140)),
        }
    }

    #[test]
    fn well_optimized_page_scores_full_marks() {
        let metadata = good_metadata();
        let signals = good_signals();
        let input = ScoreInput {
            metadata: &metadata,
            signals: &signals,
            word_count: 500,
            is_https: true,
            readability: Some(65.0),
        };

        let result = score(&input);
        assert_eq!(result.total, 100);
        assert_eq!(result.grade(), "good");
        assert!(recommendations(&input).is_empty());
    }

    #[test]
    fn empty_page_scores_zero_with_critical_items_first() {
        let metadata = Metadata::default();
        let signals = PageSignals::default();
        let input = ScoreInput {
            metadata: &metadata,
            signals: &signals,
            word_count: 0,
            is_https: false,
            readability: None,
        };

        let result = score(&input);
        assert_eq!(result.total, 0);
        assert_eq!(result.grade(), "poor");

        let recs = recommendations(&input);
        let issues: Vec<&str> = recs.iter().map(|r| r.issue).collect();
        assert!(issues.contains(&"Missing Title Tag"));
        assert!(issues.contains(&"Not Using HTTPS"));
        assert!(issues.contains(&"Low Content Length"));
        assert!(!issues.contains(&"Missing Alt Text on Images"));
        assert!(recs.windows(2).all(|pair| pair[0].priority <= pair[1].priority));
        assert_eq!(recs[0].impact, Impact::High);
    }

    #[test]
    fn partial_credit_bands() {
        let metadata = Metadata {
            title: Some("Short title here".into()), // 16 chars
            keywords: vec![],
            description: Some("d".repeat(110)),
        };
        let mut signals = good_signals();
        signals.headings.h1.push("Second".into());
        signals.images_with_alt = 1;
        signals.internal_links = 12;
        let input = ScoreInput {
            metadata: &metadata,
            signals: &signals,
            word_count: 250,
            is_https: true,
            readability: Some(20.0),
        };

        let result = score(&input);
        let by_name = |name: &str| result.factors.iter().find(|f| f.name == name).unwrap().score;
        assert_eq!(by_name("Title"), 5);
        assert_eq!(by_name("Meta Description"), 10);
        assert_eq!(by_name("Headings"), 10);
        assert_eq!(by_name("Images"), 2);
        assert_eq!(by_name("Links"), 2);
        assert_eq!(by_name("Content"), 7);
        assert!(result.total <= MAX_SCORE);

        let issues: Vec<&str> = recommendations(&input).iter().map(|r| r.issue).collect();
        assert!(issues.contains(&"Title Too Short"));
        assert!(issues.contains(&"Multiple H1 Tags"));
        assert!(issues.contains(&"Missing Alt Text on Images"));
        assert!(issues.contains(&"Low Readability Score"));
    }
}
