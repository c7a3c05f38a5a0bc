//! Data models for the application
//!
//! Wire types of the Upload Service and the Analysis Service, plus the
//! response envelopes both services wrap them in.

mod analysis;
mod health;
mod image;

pub use analysis::*;
pub use health::*;
pub use image::*;
