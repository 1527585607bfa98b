//! Link Budget: required transmit power over a free-space link
//!
//! Works backwards from the receiver: the received power needed to close the
//! link at the requested Eb/N0 (plus margin) is derived from thermal noise,
//! then free-space path loss, system losses and antenna gains are applied to
//! find the transmit power that delivers it.
//!
//! ```text
//! Pr[W]   = M · k · T · NF · Rb · Eb/N0          (all linear)
//! Pr[dBm] = 10·log10(Pr[W]) + 30
//! FSPL    = 32.45 + 20·log10(d_km) + 20·log10(f_MHz)
//! Pt[dBm] = Pr[dBm] + FSPL + L_sys − Gt − Gr
//! ```
//!
//! Every input is optional and silently defaulted, but the logarithms have
//! preconditions: distance, frequency and the received power itself must be
//! positive, otherwise a [`CalcError::Domain`] is returned instead of
//! `NaN`/`-inf`.
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::link_budget::LinkBudgetInput;
//!
//! let input = LinkBudgetInput {
//!     distance_km: 10.0,
//!     frequency_mhz: 900.0,
//!     ..Default::default()
//! };
//! let result = input.compute().unwrap();
//! assert!(result.fspl_db > 111.0 && result.fspl_db < 112.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::coerce::Params;
use crate::error::{CalcError, CalcResult};
use crate::units::{self, round_to, BOLTZMANN};

/// Link budget inputs after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetInput {
    /// Required link margin (dB)
    pub link_margin_db: f64,
    /// System noise temperature (K)
    pub temperature_k: f64,
    /// Receiver noise figure (dB)
    pub noise_figure_db: f64,
    /// Data rate (bps)
    pub bitrate_bps: f64,
    /// Required Eb/N0 (dB)
    pub eb_n0_db: f64,
    /// Link distance (km)
    pub distance_km: f64,
    /// Carrier frequency (MHz)
    pub frequency_mhz: f64,
    /// Transmit antenna gain (dBi)
    pub tx_gain_dbi: f64,
    /// Receive antenna gain (dBi)
    pub rx_gain_dbi: f64,
    /// Lumped system losses (dB)
    pub system_loss_db: f64,
}

impl Default for LinkBudgetInput {
    fn default() -> Self {
        Self {
            link_margin_db: 0.0,
            temperature_k: 290.0,
            noise_figure_db: 0.0,
            bitrate_bps: 1e6,
            eb_n0_db: 0.0,
            distance_km: 1.0,
            frequency_mhz: 2400.0,
            tx_gain_dbi: 0.0,
            rx_gain_dbi: 0.0,
            system_loss_db: 0.0,
        }
    }
}

/// Link budget outputs, rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkBudgetResult {
    pub received_power_dbm: f64,
    pub transmit_power_dbm: f64,
    pub fspl_db: f64,
    pub link_margin_db: f64,
    pub noise_figure_db: f64,
    pub bitrate_bps: i64,
    pub eb_no_db: f64,
    #[serde(rename = "temperature_K")]
    pub temperature_k: i64,
    pub distance_km: f64,
    pub frequency_mhz: f64,
    pub tx_gain_dbi: f64,
    pub rx_gain_dbi: f64,
    pub system_loss_db: f64,
}

impl LinkBudgetInput {
    /// Read inputs from the request mapping, defaulting anything unusable.
    pub fn from_params(params: &Params<'_>) -> Self {
        let d = Self::default();
        Self {
            link_margin_db: params.float("link_margin_db", d.link_margin_db),
            temperature_k: params.float("temperature_k", d.temperature_k),
            noise_figure_db: params.float("noise_figure_db", d.noise_figure_db),
            bitrate_bps: params.float("bitrate", d.bitrate_bps),
            eb_n0_db: params.float("eb_n0_db", d.eb_n0_db),
            distance_km: params.float("distance", d.distance_km),
            frequency_mhz: params.float("frequency", d.frequency_mhz),
            tx_gain_dbi: params.float("tx_gain", d.tx_gain_dbi),
            rx_gain_dbi: params.float("rx_gain", d.rx_gain_dbi),
            system_loss_db: params.float("system_loss_db", d.system_loss_db),
        }
    }

    /// Received power needed at the antenna terminals (W).
    pub fn received_power_w(&self) -> f64 {
        units::from_db(self.link_margin_db)
            * BOLTZMANN
            * self.temperature_k
            * units::from_db(self.noise_figure_db)
            * self.bitrate_bps
            * units::from_db(self.eb_n0_db)
    }

    /// Run the budget.
    pub fn compute(&self) -> CalcResult<LinkBudgetResult> {
        if self.distance_km <= 0.0 {
            return Err(CalcError::domain("distance", "Distance must be greater than 0."));
        }
        if self.frequency_mhz <= 0.0 {
            return Err(CalcError::domain("frequency", "Frequency must be greater than 0."));
        }

        let pr_w = self.received_power_w();
        if !(pr_w.is_finite() && pr_w > 0.0) {
            return Err(CalcError::domain(
                "temperature_k",
                "Received power must be positive; check temperature and bitrate.",
            ));
        }

        let pr_dbm = units::watts_to_dbm(pr_w);
        let fspl = units::fspl_db(self.distance_km, self.frequency_mhz);
        let pt_dbm = pr_dbm + fspl + self.system_loss_db - self.tx_gain_dbi - self.rx_gain_dbi;

        tracing::debug!(pr_dbm, fspl, pt_dbm, "link budget computed");

        Ok(LinkBudgetResult {
            received_power_dbm: round_to(pr_dbm, 2),
            transmit_power_dbm: round_to(pt_dbm, 2),
            fspl_db: round_to(fspl, 2),
            link_margin_db: round_to(self.link_margin_db, 2),
            noise_figure_db: round_to(self.noise_figure_db, 2),
            bitrate_bps: self.bitrate_bps.round() as i64,
            eb_no_db: round_to(self.eb_n0_db, 2),
            temperature_k: self.temperature_k.round() as i64,
            distance_km: round_to(self.distance_km, 2),
            frequency_mhz: round_to(self.frequency_mhz, 2),
            tx_gain_dbi: round_to(self.tx_gain_dbi, 2),
            rx_gain_dbi: round_to(self.rx_gain_dbi, 2),
            system_loss_db: round_to(self.system_loss_db, 2),
        })
    }
}

/// Coerce the mapping and run the budget.
pub fn calculate(params: &Params<'_>) -> CalcResult<LinkBudgetResult> {
    LinkBudgetInput::from_params(params).compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn run(data: Value) -> CalcResult<LinkBudgetResult> {
        let map: Map<String, Value> = data.as_object().cloned().unwrap_or_default();
        calculate(&Params::new(&map))
    }

    #[test]
    fn test_defaults() {
        let r = run(json!({})).unwrap();
        // k·T·B at 290 K and 1 Mbps: -113.98 dBm
        assert!((r.received_power_dbm - (-113.98)).abs() < 1e-9);
        assert!((r.fspl_db - 100.05).abs() < 1e-9);
        assert!((r.transmit_power_dbm - (-13.92)).abs() < 1e-9);
        assert_eq!(r.temperature_k, 290);
        assert_eq!(r.bitrate_bps, 1_000_000);
        assert_eq!(r.distance_km, 1.0);
        assert_eq!(r.frequency_mhz, 2400.0);
    }

    #[test]
    fn test_gains_and_losses_shift_tx_power() {
        let base = run(json!({})).unwrap();
        let r = run(json!({"tx_gain": 10, "rx_gain": "5", "system_loss_db": 3})).unwrap();
        assert!((r.received_power_dbm - base.received_power_dbm).abs() < 1e-9);
        assert!((r.transmit_power_dbm - (base.transmit_power_dbm - 12.0)).abs() < 0.011);
    }

    #[test]
    fn test_margin_adds_to_received_power() {
        let base = run(json!({})).unwrap();
        let r = run(json!({"link_margin_db": 6, "eb_n0_db": 9.6, "noise_figure_db": 2})).unwrap();
        let delta = r.received_power_dbm - base.received_power_dbm;
        assert!((delta - 17.6).abs() < 0.011, "delta was {delta}");
    }

    #[test]
    fn test_distance_doubling_adds_6db() {
        let a = run(json!({"distance": 5})).unwrap();
        let b = run(json!({"distance": 10})).unwrap();
        assert!((b.fspl_db - a.fspl_db - 6.02).abs() < 0.011);
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        for d in [json!(0), json!(-3), json!("0")] {
            let err = run(json!({ "distance": d })).unwrap_err();
            assert_eq!(err.field(), Some("distance"));
            assert_eq!(err.to_string(), "Distance must be greater than 0.");
        }
    }

    #[test]
    fn test_rejects_non_positive_frequency() {
        let err = run(json!({"frequency": -2400})).unwrap_err();
        assert_eq!(err.field(), Some("frequency"));
        let err = run(json!({"frequency": 0})).unwrap_err();
        assert!(matches!(err, CalcError::Domain { .. }));
    }

    #[test]
    fn test_rejects_zero_received_power() {
        let err = run(json!({"temperature_k": 0})).unwrap_err();
        assert!(matches!(err, CalcError::Domain { .. }));
        let err = run(json!({"bitrate": -1})).unwrap_err();
        assert!(matches!(err, CalcError::Domain { .. }));
    }

    #[test]
    fn test_unparseable_values_default() {
        let r = run(json!({"distance": "far", "frequency": null})).unwrap();
        assert_eq!(r.distance_km, 1.0);
        assert_eq!(r.frequency_mhz, 2400.0);
    }

    #[test]
    fn test_idempotent() {
        let data = json!({"distance": 12.5, "frequency": 5800, "bitrate": 2e7, "noise_figure_db": 4});
        assert_eq!(run(data.clone()).unwrap(), run(data).unwrap());
    }

    #[test]
    fn test_serialized_keys() {
        let r = run(json!({})).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("temperature_K").is_some());
        assert!(v.get("eb_no_db").is_some());
        assert_eq!(v.as_object().unwrap().len(), 13);
    }

    #[test]
    fn test_rounded_echoes_are_integers() {
        let r = run(json!({"bitrate": "2500000.4", "temperature_k": 300.6})).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["bitrate_bps"], json!(2_500_000));
        assert_eq!(v["temperature_K"], json!(301));
        assert!(v["bitrate_bps"].is_i64());
        assert_eq!(serde_json::to_string(&v["temperature_K"]).unwrap(), "301");
    }
}
