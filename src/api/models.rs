use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub url: String,
    /// Number of words in the frequency chart; server default when absent.
    #[serde(default)]
    pub top_n: Option<usize>,
}
