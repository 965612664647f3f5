/// Presentation boundary.
///
/// The engine reports through a [`Presenter`] and owns no display state.
/// [`ResponsePresenter`] collects the calls into the MCP tool response.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;
use crate::model::{Entry, Field, Library, RecommendationCard};
use crate::search::SearchEngine;
use crate::store::LoadStatus;
use crate::synth::{Synthesis, Synthesizer};
use crate::text::split_keywords;
use mcp_common::mcp_api::{
    ActionLinkInfo, RecommendationCardInfo, RelatedEntryInfo, SearchGuidanceResponse,
};

pub const EMPTY_QUERY_STATUS: &str = "請先輸入一句描述";
pub const NO_MATCH_STATUS: &str = "未找到明確匹配";
const TOOL_PENDING_LABEL: &str = "🚀 工具尚未提供連結";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").expect("valid regex"));

pub trait Presenter {
    fn render_empty(&mut self);
    fn render_result(&mut self, synthesis: &Synthesis, related: &[&Entry]);
    fn set_library_status(&mut self, text: &str);
    fn set_match_status(&mut self, text: &str);
}

pub fn matched_status(count: usize) -> String {
    format!("找到 {count} 筆匹配")
}

/// Run one query against `library` and report the outcome to `presenter`.
///
/// Returns the number of matched entries; zero is the "no match" outcome.
pub fn present_query<P: Presenter>(
    query: &str,
    library: &Library,
    status: &LoadStatus,
    engine: &SearchEngine,
    synthesizer: &Synthesizer,
    presenter: &mut P,
) -> Result<usize, AppError> {
    let query = query.trim();
    if query.is_empty() {
        presenter.set_match_status(EMPTY_QUERY_STATUS);
        return Err(AppError::EmptyQuery);
    }
    presenter.set_library_status(&status.status_text());

    let ranked = engine.rank(query, library);
    match synthesizer.synthesize(query, &ranked) {
        Some(synthesis) => {
            presenter.render_result(&synthesis, &ranked);
            presenter.set_match_status(&matched_status(ranked.len()));
            Ok(ranked.len())
        }
        None => {
            presenter.render_empty();
            presenter.set_match_status(NO_MATCH_STATUS);
            Ok(0)
        }
    }
}

/// Split text into trimmed paragraphs on blank lines.
pub fn to_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct ResponsePresenter {
    response: SearchGuidanceResponse,
}

impl ResponsePresenter {
    pub fn new(query_terms: Vec<String>) -> Self {
        Self {
            response: SearchGuidanceResponse {
                query_terms,
                ..SearchGuidanceResponse::default()
            },
        }
    }

    pub fn into_response(self) -> SearchGuidanceResponse {
        self.response
    }
}

impl Presenter for ResponsePresenter {
    fn render_empty(&mut self) {
        let r = &mut self.response;
        r.matched = false;
        r.mood = None;
        r.opening = None;
        r.soothing.clear();
        r.explanatory.clear();
        r.reflection.clear();
        r.recommendations.clear();
        r.related.clear();
    }

    fn render_result(&mut self, synthesis: &Synthesis, related: &[&Entry]) {
        let r = &mut self.response;
        r.matched = true;
        r.mood = Some(synthesis.mood.as_str().to_string());
        r.opening = Some(synthesis.opening.clone());
        r.soothing = to_paragraphs(&synthesis.soothing);
        r.explanatory = to_paragraphs(&synthesis.explanatory);
        r.reflection = to_paragraphs(&synthesis.reflection);
        r.recommendations = synthesis.cards.iter().map(to_api_card).collect();
        r.related = related
            .iter()
            .map(|e| RelatedEntryInfo {
                topic: e.get(Field::Topic).to_string(),
                title: e.get(Field::Title).to_string(),
                keywords: split_keywords(e.get(Field::Keywords)),
            })
            .collect();
    }

    fn set_library_status(&mut self, text: &str) {
        self.response.library_status = text.to_string();
    }

    fn set_match_status(&mut self, text: &str) {
        self.response.match_status = text.to_string();
    }
}

fn to_api_card(card: &RecommendationCard) -> RecommendationCardInfo {
    RecommendationCardInfo {
        topic: card.topic.clone(),
        hall: card.hall.clone(),
        tool_code: card.tool_code.clone(),
        tool_name: card.tool_name.clone(),
        thumbnail_url: card.thumbnail_url.clone(),
        tool_pending: card.tool_pending,
        pending_label: card.tool_pending.then(|| TOOL_PENDING_LABEL.to_string()),
        actions: card
            .actions
            .iter()
            .map(|a| ActionLinkInfo {
                kind: a.kind.as_str().to_string(),
                label: a.label.clone(),
                url: a.url.clone(),
                title: a.title.clone(),
                video_id: a.video_id.clone(),
            })
            .collect(),
    }
}
