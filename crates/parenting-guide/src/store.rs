/// Owned store for the current guidance library.
///
/// Readers take an `Arc<Library>` snapshot and never hold the lock while
/// scoring. Reloads are serialized: a caller that waited while another reload
/// completed gets that reload's outcome instead of fetching again.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::Library;
use crate::update::UpdateService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loaded { count: usize },
    Failed { message: String },
}

impl LoadStatus {
    pub fn status_text(&self) -> String {
        match self {
            LoadStatus::NotLoaded => "館藏：尚未載入".to_string(),
            LoadStatus::Loaded { count } => format!("館藏：已載入 {count} 筆"),
            LoadStatus::Failed { .. } => "館藏：載入失敗（請確認 API 可用）".to_string(),
        }
    }
}

/// Outcome of a load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// The library content changed.
    pub updated: bool,
    /// This request was satisfied by a reload another caller ran.
    pub coalesced: bool,
    pub entry_count: usize,
    pub fingerprint: Option<String>,
}

struct StoreState {
    library: Arc<Library>,
    status: LoadStatus,
    last_report: Option<LoadReport>,
}

pub struct LibraryStore {
    state: RwLock<StoreState>,
    reload_lock: Mutex<()>,
    generation: AtomicU64,
}

impl Default for LibraryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                library: Arc::new(Library::default()),
                status: LoadStatus::NotLoaded,
                last_report: None,
            }),
            reload_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current snapshot.
    pub async fn get(&self) -> Arc<Library> {
        Arc::clone(&self.state.read().await.library)
    }

    pub async fn status(&self) -> LoadStatus {
        self.state.read().await.status.clone()
    }

    /// The library together with the status that describes it, read under one guard.
    pub async fn snapshot(&self) -> (Arc<Library>, LoadStatus) {
        let state = self.state.read().await;
        (Arc::clone(&state.library), state.status.clone())
    }

    /// Swap in a new library wholesale. Returns whether the content changed.
    pub async fn replace(&self, library: Library) -> LoadReport {
        let mut state = self.state.write().await;
        let updated = match (&state.library.fingerprint, &library.fingerprint) {
            (Some(old), Some(new)) => old != new,
            _ => state.library.entries != library.entries,
        };
        let report = LoadReport {
            updated,
            coalesced: false,
            entry_count: library.len(),
            fingerprint: library.fingerprint.clone(),
        };
        state.status = LoadStatus::Loaded {
            count: library.len(),
        };
        state.library = Arc::new(library);
        state.last_report = Some(report.clone());
        self.generation.fetch_add(1, Ordering::AcqRel);
        report
    }

    async fn fail(&self, error: &AppError) {
        let mut state = self.state.write().await;
        state.library = Arc::new(Library::default());
        state.status = LoadStatus::Failed {
            message: error.to_string(),
        };
        state.last_report = None;
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    /// Load the library through `updater`.
    ///
    /// Without `force`, an already loaded library is kept as is. A failed load
    /// empties the library and records the failure; a later call may succeed.
    pub async fn load(&self, updater: &UpdateService, force: bool) -> Result<LoadReport, AppError> {
        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self.reload_lock.lock().await;

        if self.generation.load(Ordering::Acquire) != seen {
            let state = self.state.read().await;
            info!("reload coalesced with a load that finished while waiting");
            return match (&state.status, &state.last_report) {
                (LoadStatus::Failed { message }, _) => Err(AppError::LoadFailed(message.clone())),
                (_, Some(report)) => Ok(LoadReport {
                    coalesced: true,
                    ..report.clone()
                }),
                _ => Ok(LoadReport {
                    updated: false,
                    coalesced: true,
                    entry_count: state.library.len(),
                    fingerprint: state.library.fingerprint.clone(),
                }),
            };
        }

        if !force {
            let library = self.get().await;
            if !library.is_empty() {
                return Ok(LoadReport {
                    updated: false,
                    coalesced: false,
                    entry_count: library.len(),
                    fingerprint: library.fingerprint.clone(),
                });
            }
        }

        match updater.fetch_library().await {
            Ok(library) => {
                let report = self.replace(library).await;
                info!(
                    entries = report.entry_count,
                    updated = report.updated,
                    "library loaded"
                );
                Ok(report)
            }
            Err(e) => {
                warn!(error = %e, "library load failed, library cleared");
                self.fail(&e).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::{Entry, Field};
    use crate::test_support::{service_for, SAMPLE_LIBRARY};

    async fn serve(body: &str, expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn new_store_is_empty_and_not_loaded() {
        let store = LibraryStore::new();
        assert!(store.get().await.is_empty());
        assert_eq!(store.status().await, LoadStatus::NotLoaded);
        assert_eq!(store.status().await.status_text(), "館藏：尚未載入");
    }

    #[tokio::test]
    async fn load_populates_library_and_status() {
        let server = serve(SAMPLE_LIBRARY, 1).await;
        let store = LibraryStore::new();

        let report = store.load(&service_for(&server), true).await.unwrap();
        assert!(report.updated);
        assert!(!report.coalesced);
        assert_eq!(report.entry_count, 3);

        let library = store.get().await;
        assert_eq!(library.entries[0].get(Field::Topic), "情緒急救");
        assert_eq!(store.status().await.status_text(), "館藏：已載入 3 筆");
    }

    #[tokio::test]
    async fn snapshot_pairs_library_with_its_status() {
        let server = serve(SAMPLE_LIBRARY, 1).await;
        let store = LibraryStore::new();

        let (library, status) = store.snapshot().await;
        assert!(library.is_empty());
        assert_eq!(status, LoadStatus::NotLoaded);

        store.load(&service_for(&server), true).await.unwrap();
        let (library, status) = store.snapshot().await;
        assert_eq!(status, LoadStatus::Loaded { count: library.len() });
        assert_eq!(library.len(), 3);
    }

    #[tokio::test]
    async fn reloading_identical_data_yields_an_equal_library() {
        let server = serve(SAMPLE_LIBRARY, 2).await;
        let store = LibraryStore::new();
        let updater = service_for(&server);

        store.load(&updater, true).await.unwrap();
        let first = store.get().await;
        let report = store.load(&updater, true).await.unwrap();
        let second = store.get().await;

        assert!(!report.updated);
        assert_eq!(first.entries, second.entries);
        assert_eq!(first.fingerprint, second.fingerprint);
    }

    #[tokio::test]
    async fn unforced_load_keeps_a_loaded_library() {
        let server = serve(SAMPLE_LIBRARY, 1).await;
        let store = LibraryStore::new();
        let updater = service_for(&server);

        store.load(&updater, false).await.unwrap();
        let report = store.load(&updater, false).await.unwrap();
        assert!(!report.updated);
        assert_eq!(report.entry_count, 3);
    }

    #[tokio::test]
    async fn failed_load_clears_library_and_is_recoverable() {
        let store = LibraryStore::new();
        let good = serve(SAMPLE_LIBRARY, 2).await;
        store.load(&service_for(&good), true).await.unwrap();

        let bad = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&bad)
            .await;
        assert!(store.load(&service_for(&bad), true).await.is_err());
        assert!(store.get().await.is_empty());
        assert_eq!(
            store.status().await.status_text(),
            "館藏：載入失敗（請確認 API 可用）"
        );

        let report = store.load(&service_for(&good), true).await.unwrap();
        assert_eq!(report.entry_count, 3);
        assert!(matches!(store.status().await, LoadStatus::Loaded { count: 3 }));
    }

    #[tokio::test]
    async fn concurrent_reloads_share_one_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(SAMPLE_LIBRARY)
                    .set_delay(Duration::from_millis(100)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let store = LibraryStore::new();
        let updater = service_for(&server);
        let (a, b) = tokio::join!(store.load(&updater, true), store.load(&updater, true));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.entry_count, 3);
        assert_eq!(b.entry_count, 3);
        assert!(a.coalesced != b.coalesced, "exactly one call should coalesce");
    }

    #[tokio::test]
    async fn replace_reports_changes_without_fingerprints() {
        let store = LibraryStore::new();
        let library = Library {
            entries: vec![Entry::from_pairs([("關鍵字", "吼")])],
            ..Library::default()
        };
        assert!(store.replace(library.clone()).await.updated);
        assert!(!store.replace(library).await.updated);
    }
}
