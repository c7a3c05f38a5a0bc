mod helpers;

use std::sync::Arc;

use guidepost_core::{AnalysisStatus, ApiError};
use guidepost_ui::{DetailController, RefreshOutcome};
use helpers::{analysis, MockImageRepository};
use tokio::sync::Notify;

fn controller(repo: &MockImageRepository) -> DetailController {
    DetailController::new(Arc::new(repo.clone()))
}

#[tokio::test]
async fn test_initial_result_is_shown_then_refreshed() {
    let repo = MockImageRepository::new();
    let completed = analysis("abc", &["dog"], AnalysisStatus::Completed);
    repo.respond_fetch(Ok(completed.clone()));

    let detail = controller(&repo);
    let outcome = detail
        .set_initial_analysis_result(analysis("abc", &[], AnalysisStatus::Processing))
        .await;

    assert_eq!(outcome, RefreshOutcome::Refreshed);
    assert_eq!(repo.fetch_calls(), vec!["abc".to_string()]);
    let state = detail.state();
    assert!(!state.is_refreshing);
    assert_eq!(state.analysis_result, Some(completed));
}

#[tokio::test]
async fn test_refresh_error_keeps_stale_result() {
    let repo = MockImageRepository::new();
    let processing = analysis("abc", &[], AnalysisStatus::Processing);
    repo.respond_fetch(Ok(processing.clone()));
    repo.respond_fetch(Err(ApiError::new("Network error: timed out", None)));

    let detail = controller(&repo);
    detail.set_initial_analysis_result(processing.clone()).await;
    let outcome = detail.refresh_analysis("abc").await;

    assert_eq!(outcome, RefreshOutcome::Failed);
    let state = detail.state();
    assert!(!state.is_refreshing);
    assert_eq!(state.analysis_result, Some(processing));
    assert_eq!(state.error_message.as_deref(), Some("Network error: timed out"));

    detail.clear_error();
    assert_eq!(detail.state().error_message, None);
}

#[tokio::test]
async fn test_refresh_while_refreshing_is_a_no_op() {
    let repo = MockImageRepository::new();
    let gate = Arc::new(Notify::new());
    repo.respond_fetch_after(
        gate.clone(),
        Ok(analysis("abc", &["dog"], AnalysisStatus::Completed)),
    );

    let detail = controller(&repo);

    let (first, second, _) = tokio::join!(
        detail.refresh_analysis("abc"),
        async {
            let before = detail.state();
            assert!(before.is_refreshing);
            let outcome = detail.refresh_analysis("abc").await;
            assert_eq!(detail.state(), before);
            outcome
        },
        async {
            tokio::task::yield_now().await;
            gate.notify_one();
        }
    );

    assert_eq!(first, RefreshOutcome::Refreshed);
    assert_eq!(second, RefreshOutcome::Skipped);
    assert_eq!(repo.fetch_calls().len(), 1);
    assert!(!detail.state().is_refreshing);
}

#[tokio::test]
async fn test_dropped_refresh_releases_the_guard() {
    let repo = MockImageRepository::new();
    let gate = Arc::new(Notify::new());
    repo.respond_fetch_after(gate, Ok(analysis("abc", &[], AnalysisStatus::Pending)));
    repo.respond_fetch(Ok(analysis("abc", &["dog"], AnalysisStatus::Completed)));

    let detail = controller(&repo);
    tokio::select! {
        _ = detail.refresh_analysis("abc") => panic!("gated refresh completed"),
        _ = tokio::task::yield_now() => {}
    }
    assert!(!detail.state().is_refreshing);

    assert_eq!(detail.refresh_analysis("abc").await, RefreshOutcome::Refreshed);
    assert_eq!(repo.fetch_calls().len(), 2);
}

#[tokio::test]
async fn test_loading_flag_tracks_initial_refresh_only() {
    let repo = MockImageRepository::new();
    let gate = Arc::new(Notify::new());
    let completed = analysis("abc", &["dog"], AnalysisStatus::Completed);
    repo.respond_fetch_after(gate.clone(), Ok(completed.clone()));
    repo.respond_fetch_after(gate.clone(), Ok(completed.clone()));

    let detail = controller(&repo);
    let opened = analysis("abc", &[], AnalysisStatus::Processing);

    let (outcome, _) = tokio::join!(detail.set_initial_analysis_result(opened), async {
        let state = detail.state();
        assert!(state.is_loading);
        assert!(state.is_refreshing);
        gate.notify_one();
    });
    assert_eq!(outcome, RefreshOutcome::Refreshed);
    assert!(!detail.state().is_loading);

    let (outcome, _) = tokio::join!(detail.refresh_analysis("abc"), async {
        let state = detail.state();
        assert!(!state.is_loading);
        assert!(state.is_refreshing);
        gate.notify_one();
    });
    assert_eq!(outcome, RefreshOutcome::Refreshed);
    assert_eq!(detail.state().analysis_result, Some(completed));
}
