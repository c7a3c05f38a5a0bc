//! Grid screen state: the analysis list, free-text search and upload flags.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use guidepost_api_client::{ImageRepository, ImageSource};
use guidepost_core::AnalysisResult;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridViewState {
    /// Server order.
    pub analysis_results: Vec<AnalysisResult>,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub search_text: String,
    pub is_uploading: bool,
    pub upload_error: Option<String>,
    pub upload_success: bool,
}

/// What the grid screen should show, in priority order.
#[derive(Debug, PartialEq, Eq)]
pub enum GridContent<'a> {
    /// First load still running.
    Loading,
    /// Load failed and there is nothing to show instead.
    Error(&'a str),
    /// Nothing to show; `has_search_text` tells "no matches" from "no images yet".
    Empty { has_search_text: bool },
    Results(Vec<&'a AnalysisResult>),
}

impl GridViewState {
    /// Results matching the search text; all of them when it is empty.
    pub fn filtered_results(&self) -> Vec<&AnalysisResult> {
        self.analysis_results
            .iter()
            .filter(|result| result.matches_search(&self.search_text))
            .collect()
    }

    pub fn has_search_text(&self) -> bool {
        !self.search_text.is_empty()
    }

    pub fn content(&self) -> GridContent<'_> {
        if self.is_loading && self.analysis_results.is_empty() {
            return GridContent::Loading;
        }
        if let Some(error) = &self.error_message {
            if self.analysis_results.is_empty() {
                return GridContent::Error(error);
            }
        }
        let filtered = self.filtered_results();
        if filtered.is_empty() {
            GridContent::Empty {
                has_search_text: self.has_search_text(),
            }
        } else {
            GridContent::Results(filtered)
        }
    }
}

/// Generations of overlapping loads.
#[derive(Debug, Default)]
struct LoadTracker {
    started: u64,
    applied: u64,
    in_flight: BTreeSet<u64>,
}

impl LoadTracker {
    fn start(&mut self) -> u64 {
        self.started += 1;
        self.in_flight.insert(self.started);
        self.started
    }

    /// Whether a finished load may write its outcome: nothing newer has been
    /// applied and nothing newer is still running.
    fn finish(&mut self, generation: u64) -> bool {
        self.in_flight.remove(&generation);
        let newest = generation > self.applied
            && self.in_flight.last().map_or(true, |&g| g < generation);
        if newest {
            self.applied = generation;
        }
        newest
    }

    /// Forget an abandoned load. Returns true when no load is left running.
    fn abandon(&mut self, generation: u64) -> bool {
        self.in_flight.remove(&generation);
        self.in_flight.is_empty()
    }
}

/// Releases a load's generation if its future is dropped mid-request.
struct LoadGuard<'a> {
    controller: &'a GridController,
    generation: u64,
    armed: bool,
}

impl LoadGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::debug!(generation = self.generation, "Analysis load abandoned");
        let mut loads = self.controller.loads();
        if loads.abandon(self.generation) {
            self.controller.state.send_modify(|s| s.is_loading = false);
        }
    }
}

pub struct GridController {
    repository: Arc<dyn ImageRepository>,
    state: watch::Sender<GridViewState>,
    loads: Mutex<LoadTracker>,
}

impl GridController {
    /// Create the controller and run the first load.
    pub async fn new(repository: Arc<dyn ImageRepository>) -> Self {
        let (state, _) = watch::channel(GridViewState::default());
        let controller = Self {
            repository,
            state,
            loads: Mutex::new(LoadTracker::default()),
        };
        controller.load_analysis_results().await;
        controller
    }

    pub fn state(&self) -> GridViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GridViewState> {
        self.state.subscribe()
    }

    fn loads(&self) -> MutexGuard<'_, LoadTracker> {
        self.loads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the full list. When loads overlap, the newest running load
    /// decides the final state and older completions are dropped. An
    /// abandoned load hands that role back to the ones still running.
    pub async fn load_analysis_results(&self) {
        let generation = self.loads().start();
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error_message = None;
        });
        let guard = LoadGuard {
            controller: self,
            generation,
            armed: true,
        };

        let result = self.repository.fetch_all_analysis().await;
        guard.disarm();

        let mut loads = self.loads();
        if !loads.finish(generation) {
            tracing::debug!(generation, "Discarding superseded analysis load");
            return;
        }

        self.state.send_modify(|s| {
            match result {
                Ok(results) => {
                    tracing::info!(count = results.len(), "Analysis results loaded");
                    s.analysis_results = results;
                }
                Err(err) => {
                    s.error_message = Some(err.message);
                }
            }
            s.is_loading = false;
        });
    }

    pub fn update_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| s.search_text = text);
    }

    /// Upload an image; on success the list is reloaded once.
    pub async fn upload_image(&self, source: &dyn ImageSource) {
        self.state.send_modify(|s| {
            s.is_uploading = true;
            s.upload_error = None;
            s.upload_success = false;
        });

        match self.repository.upload_image(source).await {
            Ok(image) => {
                tracing::info!(image_id = %image.id, "Upload finished, reloading results");
                self.state.send_modify(|s| {
                    s.is_uploading = false;
                    s.upload_success = true;
                });
                self.load_analysis_results().await;
            }
            Err(err) => {
                self.state.send_modify(|s| {
                    s.is_uploading = false;
                    s.upload_error = Some(err.message);
                });
            }
        }
    }

    /// Acknowledge the upload outcome.
    pub fn clear_upload_state(&self) {
        self.state.send_modify(|s| {
            s.upload_error = None;
            s.upload_success = false;
        });
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error_message = None);
    }
}
