/// MCP server implementation for the parenting guidance library.
///
/// Exposes five tools:
/// - `search_guidance`: Match a caregiver's sentence and return the sequenced response
/// - `reload_library`: Re-fetch the guidance table from its source
/// - `library_status`: Report what is currently loaded
/// - `classify_mood`: Show which phrasing tone a sentence selects
/// - `example_queries`: Sample sentences to try
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use crate::mood::classify_mood;
use crate::presenter::{present_query, ResponsePresenter, EMPTY_QUERY_STATUS};
use crate::search::SearchEngine;
use crate::store::{LibraryStore, LoadStatus};
use crate::synth::Synthesizer;
use crate::text::tokenize;
use crate::update::UpdateService;
use mcp_common::mcp_api::{
    ClassifyMoodParams, ExampleQueriesResponse, LibraryStatusResponse, MoodResponse,
    ReloadLibraryResponse, SearchGuidanceParams, SearchGuidanceResponse,
};

const EXAMPLE_QUERIES: &[&str] = &[
    "我忍不住對孩子發火",
    "孩子一直尖叫，我快崩潰",
    "每天都在吵，心很累",
    "孩子回嘴，我好生氣",
    "我一直吼，停不下來",
];

#[derive(Clone)]
pub struct ParentingGuideServer {
    store: Arc<LibraryStore>,
    update_service: Arc<UpdateService>,
    engine: Arc<SearchEngine>,
    synthesizer: Arc<Synthesizer>,
    tool_router: ToolRouter<ParentingGuideServer>,
}

impl ParentingGuideServer {
    pub fn new(
        store: Arc<LibraryStore>,
        update_service: Arc<UpdateService>,
        engine: SearchEngine,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            store,
            update_service,
            engine: Arc::new(engine),
            synthesizer: Arc::new(synthesizer),
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl ParentingGuideServer {
    #[tool(description = "Match a caregiver's free-text sentence against the guidance library. Returns a soothing message, a brain-science explanation, reflection prompts, and recommended tools/videos. matched=false is the normal 'no match' outcome.")]
    async fn search_guidance(
        &self,
        Parameters(params): Parameters<SearchGuidanceParams>,
    ) -> Result<Json<SearchGuidanceResponse>, String> {
        let query = params.query.trim().to_string();
        if query.is_empty() {
            return Err(EMPTY_QUERY_STATUS.to_string());
        }

        if self.store.get().await.is_empty() {
            info!("library empty, loading before search");
            if let Err(e) = self.store.load(&self.update_service, true).await {
                let status = self.store.status().await.status_text();
                return Err(format!("{status}: {e}"));
            }
        }

        let (library, status) = self.store.snapshot().await;
        let terms = tokenize(&query);
        info!(terms = ?terms, entries = library.len(), "search_guidance invoked");

        let mut presenter = ResponsePresenter::new(terms);
        present_query(
            &query,
            &library,
            &status,
            &self.engine,
            &self.synthesizer,
            &mut presenter,
        )
        .map_err(|e| e.to_string())?;

        Ok(Json(presenter.into_response()))
    }

    #[tool(description = "Re-fetch the guidance table from its source and replace the in-memory library. Concurrent reloads share one fetch.")]
    async fn reload_library(&self) -> Result<Json<ReloadLibraryResponse>, String> {
        info!("reload_library tool invoked");

        let report = self
            .store
            .load(&self.update_service, true)
            .await
            .map_err(|e| format!("reload failed: {e}"))?;

        Ok(Json(ReloadLibraryResponse {
            updated: report.updated,
            coalesced: report.coalesced,
            entry_count: report.entry_count,
            fingerprint: report.fingerprint,
            library_status: self.store.status().await.status_text(),
        }))
    }

    #[tool(description = "Report the library load status, entry count, and content fingerprint.")]
    async fn library_status(&self) -> Result<Json<LibraryStatusResponse>, String> {
        let (library, status) = self.store.snapshot().await;
        if let LoadStatus::Failed { message } = &status {
            warn!(error = %message, "library_status reporting a failed load");
        }

        Ok(Json(LibraryStatusResponse {
            status: status.status_text(),
            loaded: matches!(status, LoadStatus::Loaded { .. }),
            entry_count: library.len(),
            fingerprint: library.fingerprint.clone(),
            loaded_at_ms: library.loaded_at_ms,
        }))
    }

    #[tool(description = "Classify a sentence into the phrasing tone used for responses: warm, steady, or night.")]
    async fn classify_mood(
        &self,
        Parameters(params): Parameters<ClassifyMoodParams>,
    ) -> Result<Json<MoodResponse>, String> {
        let mood = classify_mood(&params.query);
        Ok(Json(MoodResponse {
            mood: mood.as_str().to_string(),
            opening: mood.opening().to_string(),
        }))
    }

    #[tool(description = "List example sentences a caregiver might type.")]
    async fn example_queries(&self) -> Result<Json<ExampleQueriesResponse>, String> {
        Ok(Json(ExampleQueriesResponse {
            examples: EXAMPLE_QUERIES.iter().map(|s| s.to_string()).collect(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for ParentingGuideServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "parenting-guide".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Parenting guidance MCP server. Matches a caregiver's sentence against a \
                 small guidance table and answers in three steps: soothe, explain, recommend. \
                 Use search_guidance for a sentence, reload_library to refresh the table, \
                 library_status to inspect it, classify_mood to preview the tone, and \
                 example_queries for sample input."
                    .to_string(),
            ),
        }
    }
}
