//! Scenario dispatch
//!
//! Maps a scenario identifier onto its calculator and wraps the outcome in
//! the wire-level record: either a flat result mapping or `{ "error": ... }`.
//!
//! ```text
//! ScenarioRequest { scenario, data }
//!         │
//!         ▼
//!  ┌─────────────┬────────┬───────────────┬──────────┐
//!  │ link_budget │  ofdm  │ wireless_comm │ cellular │
//!  └─────────────┴────────┴───────────────┴──────────┘
//!         │
//!         ▼
//! CalculationResult::{Ok(flat map) | Error { error }}
//! ```
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::scenario::{compute, CalculationResult, Scenario};
//! use serde_json::json;
//!
//! let data = json!({"bandwidth": 0});
//! let result = CalculationResult::from(compute(Scenario::WirelessComm, data.as_object().unwrap()));
//! assert_eq!(
//!     serde_json::to_value(&result).unwrap(),
//!     json!({"error": "Bandwidth must be greater than 0."})
//! );
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::cellular::{self, CellularResult};
use crate::coerce::Params;
use crate::comm_pipeline::{self, PipelineResult};
use crate::error::{CalcError, CalcResult};
use crate::link_budget::{self, LinkBudgetResult};
use crate::ofdm::{self, OfdmResult};

/// The four analysis scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    LinkBudget,
    Ofdm,
    WirelessComm,
    Cellular,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::LinkBudget,
        Scenario::Ofdm,
        Scenario::WirelessComm,
        Scenario::Cellular,
    ];

    /// Wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::LinkBudget => "link_budget",
            Scenario::Ofdm => "ofdm",
            Scenario::WirelessComm => "wireless_comm",
            Scenario::Cellular => "cellular",
        }
    }

    /// Human-readable title
    pub fn title(&self) -> &'static str {
        match self {
            Scenario::LinkBudget => "Link Budget",
            Scenario::Ofdm => "OFDM Resource-Block Throughput",
            Scenario::WirelessComm => "Communication Chain Rates",
            Scenario::Cellular => "Cellular Capacity",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.as_str() == s.trim())
            .ok_or_else(|| CalcError::UnknownScenario(s.to_string()))
    }
}

/// A scenario plus its unchecked parameter mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    pub scenario: Scenario,
    #[serde(default)]
    pub data: Map<String, Value>,
}

impl ScenarioRequest {
    pub fn compute(&self) -> CalcResult<ScenarioOutput> {
        compute(self.scenario, &self.data)
    }
}

/// Successful output of any calculator; serializes as a flat mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScenarioOutput {
    LinkBudget(LinkBudgetResult),
    Ofdm(OfdmResult),
    WirelessComm(PipelineResult),
    Cellular(CellularResult),
}

impl ScenarioOutput {
    pub fn scenario(&self) -> Scenario {
        match self {
            ScenarioOutput::LinkBudget(_) => Scenario::LinkBudget,
            ScenarioOutput::Ofdm(_) => Scenario::Ofdm,
            ScenarioOutput::WirelessComm(_) => Scenario::WirelessComm,
            ScenarioOutput::Cellular(_) => Scenario::Cellular,
        }
    }

    /// Flat field-name to value mapping.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Wire record: the flat result, or exactly one `error` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CalculationResult {
    Ok(ScenarioOutput),
    Error { error: String },
}

impl CalculationResult {
    pub fn is_error(&self) -> bool {
        matches!(self, CalculationResult::Error { .. })
    }
}

impl From<CalcResult<ScenarioOutput>> for CalculationResult {
    fn from(result: CalcResult<ScenarioOutput>) -> Self {
        match result {
            Ok(output) => CalculationResult::Ok(output),
            Err(e) => CalculationResult::Error {
                error: e.to_string(),
            },
        }
    }
}

/// Run the calculator for `scenario` over `data`.
pub fn compute(scenario: Scenario, data: &Map<String, Value>) -> CalcResult<ScenarioOutput> {
    let params = Params::new(data);
    let _span = tracing::debug_span!("compute", %scenario).entered();

    let result = match scenario {
        Scenario::LinkBudget => link_budget::calculate(&params).map(ScenarioOutput::LinkBudget),
        Scenario::Ofdm => Ok(ScenarioOutput::Ofdm(ofdm::calculate(&params))),
        Scenario::WirelessComm => {
            comm_pipeline::calculate(&params).map(ScenarioOutput::WirelessComm)
        }
        Scenario::Cellular => Ok(ScenarioOutput::Cellular(cellular::calculate(&params))),
    };

    if let Err(ref e) = result {
        tracing::debug!(error = %e, field = e.field(), "calculation rejected");
    }
    result
}

/// Parse `scenario` and run it; unknown names become an error result.
pub fn compute_named(scenario: &str, data: &Map<String, Value>) -> CalcResult<ScenarioOutput> {
    compute(scenario.parse()?, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for scenario in Scenario::ALL {
            assert_eq!(scenario.as_str().parse::<Scenario>().unwrap(), scenario);
            let v = serde_json::to_value(scenario).unwrap();
            assert_eq!(v, json!(scenario.as_str()));
        }
        assert!(matches!(
            "radar".parse::<Scenario>(),
            Err(CalcError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_dispatch_picks_calculator() {
        let out = compute(Scenario::Ofdm, &Map::new()).unwrap();
        assert!(matches!(out, ScenarioOutput::Ofdm(_)));
        assert_eq!(out.scenario(), Scenario::Ofdm);

        let out = compute(Scenario::LinkBudget, &Map::new()).unwrap();
        assert_eq!(out.scenario(), Scenario::LinkBudget);

        let out = compute(Scenario::Cellular, &Map::new()).unwrap();
        assert_eq!(out.scenario(), Scenario::Cellular);
    }

    #[test]
    fn test_result_is_flat_mapping() {
        let data = map(json!({
            "bandwidth": 100, "quantBits": 8, "sourceEncoderRate": 0.5,
            "channelEncoderRate": 0.75, "burstLength": 2,
        }));
        let result = CalculationResult::from(compute(Scenario::WirelessComm, &data));
        assert!(!result.is_error());
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v["sampler_rate_bps"], json!(200_000.0));
        assert_eq!(v.as_object().unwrap().len(), 6);
    }

    #[test]
    fn test_error_record_has_single_field() {
        let result = CalculationResult::from(compute(Scenario::LinkBudget, &map(json!({"distance": 0}))));
        assert!(result.is_error());
        let v = serde_json::to_value(&result).unwrap();
        assert_eq!(v, json!({"error": "Distance must be greater than 0."}));
    }

    #[test]
    fn test_compute_named_unknown() {
        let err = compute_named("satellite", &Map::new()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown scenario: satellite");
    }

    #[test]
    fn test_request_deserializes_without_data() {
        let req: ScenarioRequest = serde_json::from_value(json!({"scenario": "ofdm"})).unwrap();
        assert_eq!(req.scenario, Scenario::Ofdm);
        assert!(req.data.is_empty());
        assert!(req.compute().is_ok());
    }

    #[test]
    fn test_every_scenario_is_deterministic() {
        let data = map(json!({
            "bandwidth": 50, "quantBits": 12, "sourceEncoderRate": 0.6,
            "channelEncoderRate": 0.5, "burstLength": 1.5, "distance": 3,
            "subcarrierSpacing": 15, "modulation": "QPSK", "numSymbols": 14,
            "duration_of_RB": 500, "parallelRB": 6, "area": 40, "cell_radius": 2,
        }));
        for scenario in Scenario::ALL {
            let a = compute(scenario, &data).unwrap().to_map();
            let b = compute(scenario, &data).unwrap().to_map();
            assert_eq!(a, b, "{scenario} should be deterministic");
        }
    }
}
