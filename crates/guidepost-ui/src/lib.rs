//! Guidepost view state
//!
//! Controllers own the state a screen renders and reduce repository results
//! into it. State lives in a `tokio::sync::watch` channel, so a renderer can
//! either take snapshots or `subscribe()` and redraw on change.
//!
//! - [`grid::GridController`]: analysis list, search text, upload flags.
//! - [`detail::DetailController`]: one analysis result and its refresh.
//! - [`navigation`]: screen routes, including the detail route that carries
//!   a whole `AnalysisResult`.

pub mod detail;
pub mod grid;
pub mod navigation;

pub use detail::{DetailController, DetailViewState, RefreshOutcome};
pub use grid::{GridContent, GridController, GridViewState};
pub use navigation::{decode_detail_route, encode_detail_route, RouteError, Screen};
