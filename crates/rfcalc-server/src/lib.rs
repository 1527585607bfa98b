//! # rfcalc HTTP service
//!
//! Serves the `rfcalc-core` calculators over JSON and attaches a
//! model-written explanation to each result.
//!
//! ```text
//! POST /calculate ─► compute ─► explanation_prompt ─► Explainer ─► {calculation, explanation}
//! ```

pub mod explain;
pub mod server;

pub use explain::{DisabledExplainer, ExplainError, ExplainRequest, Explainer, GeminiExplainer};
pub use server::{build_router, AppState};
