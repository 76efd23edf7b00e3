//! lexis-views: linked-view coordination core.
//!
//! Three charts (a lexis tenure chart, a gender bar chart and an age-vs-GDP
//! scatter plot) share one selection/filter state over a dataset of leader
//! tenures. This crate owns that state, derives each chart's content from it
//! and pushes fresh content to every chart after each interaction. Drawing
//! is left to `render::ViewAdapter` implementations.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{LinkedViewsConfig, LinkedViewsEngine};
pub use error::{ViewError, ViewResult};
