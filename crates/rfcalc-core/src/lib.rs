//! # Wireless Scenario Calculation Core
//!
//! Closed-form calculators for four classic wireless design questions,
//! driven by loosely-typed JSON parameter mappings:
//!
//! - **Link budget**: required received and transmit power over free space
//! - **OFDM throughput**: bits per resource block, peak rate, spectral efficiency
//! - **Communication chain**: bit rate after each transmitter block
//! - **Cellular capacity**: cells, channels, Erlang traffic and Shannon bounds
//!
//! ## Flow
//!
//! ```text
//! {scenario, data} → Params (coercion) → calculator → flat result | {error}
//!                                                  └→ explanation prompt
//! ```
//!
//! Calculators are pure functions of their input. Anything that is not a
//! usable number falls back to a documented default, except where a rule
//! rejects it with a [`CalcError`].
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::prelude::*;
//! use serde_json::json;
//!
//! let data = json!({"distance": 10, "frequency": 900});
//! let output = compute(Scenario::LinkBudget, data.as_object().unwrap()).unwrap();
//! let map = output.to_map();
//! assert_eq!(map["fspl_db"], json!(111.53));
//! ```

pub mod cellular;
pub mod coerce;
pub mod comm_pipeline;
pub mod config;
pub mod erlang;
pub mod error;
pub mod link_budget;
pub mod logging;
pub mod ofdm;
pub mod prompt;
pub mod scenario;
pub mod units;

pub use error::{CalcError, CalcResult};
pub use scenario::{compute, CalculationResult, Scenario, ScenarioOutput, ScenarioRequest};

/// Common imports.
pub mod prelude {
    pub use crate::coerce::Params;
    pub use crate::error::{CalcError, CalcResult};
    pub use crate::prompt::explanation_prompt;
    pub use crate::scenario::{
        compute, CalculationResult, Scenario, ScenarioOutput, ScenarioRequest,
    };
}
