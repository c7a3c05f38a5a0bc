//! Detail screen state: one analysis result, refreshed on demand.

use std::sync::Arc;

use guidepost_api_client::ImageRepository;
use guidepost_core::AnalysisResult;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailViewState {
    pub analysis_result: Option<AnalysisResult>,
    /// The first refresh after the screen was opened is running.
    pub is_loading: bool,
    pub is_refreshing: bool,
    pub error_message: Option<String>,
}

impl DetailViewState {
    /// The held result, or `fallback` (typically the one the screen was opened with).
    pub fn current_or<'a>(&'a self, fallback: &'a AnalysisResult) -> &'a AnalysisResult {
        self.analysis_result.as_ref().unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// The request failed; the previous result is still shown.
    Failed,
    /// Another refresh was already running.
    Skipped,
}

pub struct DetailController {
    repository: Arc<dyn ImageRepository>,
    state: watch::Sender<DetailViewState>,
}

/// Clears the in-flight flags if a refresh future is dropped mid-request.
struct RefreshGuard<'a> {
    state: &'a watch::Sender<DetailViewState>,
    armed: bool,
}

impl RefreshGuard<'_> {
    fn finish(mut self, apply: impl FnOnce(&mut DetailViewState)) {
        self.armed = false;
        self.state.send_modify(|s| {
            apply(s);
            s.is_refreshing = false;
            s.is_loading = false;
        });
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.send_modify(|s| {
                s.is_refreshing = false;
                s.is_loading = false;
            });
        }
    }
}

impl DetailController {
    pub fn new(repository: Arc<dyn ImageRepository>) -> Self {
        let (state, _) = watch::channel(DetailViewState::default());
        Self { repository, state }
    }

    pub fn state(&self) -> DetailViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailViewState> {
        self.state.subscribe()
    }

    /// Show `result` right away, then refresh it from the Analysis Service.
    pub async fn set_initial_analysis_result(&self, result: AnalysisResult) -> RefreshOutcome {
        let image_id = result.image_id.clone();
        self.state.send_modify(|s| s.analysis_result = Some(result));
        self.refresh(&image_id, true).await
    }

    pub async fn refresh_analysis(&self, image_id: &str) -> RefreshOutcome {
        self.refresh(image_id, false).await
    }

    async fn refresh(&self, image_id: &str, initial: bool) -> RefreshOutcome {
        let started = self.state.send_if_modified(|s| {
            if s.is_refreshing {
                false
            } else {
                s.is_refreshing = true;
                s.is_loading = initial;
                true
            }
        });
        if !started {
            tracing::debug!(image_id, "Refresh already in flight");
            return RefreshOutcome::Skipped;
        }
        let guard = RefreshGuard {
            state: &self.state,
            armed: true,
        };

        match self.repository.fetch_analysis(image_id).await {
            Ok(result) => {
                tracing::debug!(image_id, status = %result.status, "Analysis refreshed");
                guard.finish(|s| s.analysis_result = Some(result));
                RefreshOutcome::Refreshed
            }
            Err(err) => {
                guard.finish(|s| s.error_message = Some(err.message));
                RefreshOutcome::Failed
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error_message = None);
    }
}
