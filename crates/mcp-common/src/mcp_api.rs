use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchGuidanceParams {
    /// One sentence describing what is happening, e.g. "孩子一直尖叫，我快崩潰".
    pub query: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClassifyMoodParams {
    /// Free-text query to classify.
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ActionLinkInfo {
    /// "tool" or "video".
    pub kind: String,
    pub label: String,
    pub url: String,
    pub title: Option<String>,
    /// Platform video ID, when the URL has a recognizable shape.
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RecommendationCardInfo {
    pub topic: String,
    pub hall: String,
    pub tool_code: String,
    pub tool_name: String,
    pub thumbnail_url: Option<String>,
    /// Set when the entry names no tool link; `pending_label` carries the placeholder copy.
    pub tool_pending: bool,
    pub pending_label: Option<String>,
    pub actions: Vec<ActionLinkInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RelatedEntryInfo {
    pub topic: String,
    pub title: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchGuidanceResponse {
    /// False is the "no match" outcome, not an error.
    pub matched: bool,
    pub match_status: String,
    pub library_status: String,
    pub mood: Option<String>,
    pub opening: Option<String>,
    pub query_terms: Vec<String>,
    /// Paragraphs of the soothing segment.
    pub soothing: Vec<String>,
    /// Paragraphs of the explanatory segment.
    pub explanatory: Vec<String>,
    pub reflection: Vec<String>,
    pub recommendations: Vec<RecommendationCardInfo>,
    pub related: Vec<RelatedEntryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadLibraryResponse {
    /// False when the fetched content hashed to the same fingerprint as before.
    pub updated: bool,
    /// True when this call joined a reload that was already in flight.
    pub coalesced: bool,
    pub entry_count: usize,
    pub fingerprint: Option<String>,
    pub library_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LibraryStatusResponse {
    pub status: String,
    pub loaded: bool,
    pub entry_count: usize,
    pub fingerprint: Option<String>,
    pub loaded_at_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MoodResponse {
    /// One of "warm", "steady", "night".
    pub mood: String,
    pub opening: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExampleQueriesResponse {
    pub examples: Vec<String>,
}
