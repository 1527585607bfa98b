//! OFDM Resource-Block Throughput
//!
//! Counts how many bits fit into a block of resource blocks (RBs) and turns
//! that into a peak data rate and spectral efficiency.
//!
//! ```text
//! subcarriers/RB   = ⌊B_RB / Δf⌋
//! bits/OFDM symbol = subcarriers · log2(M)
//! bits/RB          = bits/OFDM symbol · symbols/RB
//! total bits       = bits/RB · parallel RBs
//! rate             = total bits / T_RB
//! efficiency       = total bits / (B_RB · parallel RBs · T_RB)
//! ```
//!
//! Nothing here rejects input. Missing fields become 0, a non-positive
//! subcarrier spacing gives 0 subcarriers, a non-positive RB duration is
//! replaced by 1 s, and an unknown modulation is treated as QPSK (with a
//! warning in the log).
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::ofdm::OfdmInput;
//!
//! let input = OfdmInput {
//!     bandwidth_khz: 180.0,
//!     subcarrier_spacing_khz: 15.0,
//!     modulation: "QPSK".into(),
//!     num_symbols_per_rb: 14,
//!     rb_duration_us: 1000.0,
//!     parallel_rbs: 2,
//! };
//! let r = input.compute();
//! assert_eq!(r.subcarriers_per_rb, 12);
//! assert_eq!(r.total_bits, 12 * 2 * 14 * 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::coerce::Params;

/// Modulation used when the identifier is not in [`MODULATION_TABLE`].
pub const FALLBACK_BITS_PER_SYMBOL: i64 = 2;

/// Constellation identifiers and their bits per symbol.
///
/// Numeric identifiers are constellation orders (`"16"` is 16-QAM).
pub const MODULATION_TABLE: &[(&str, i64)] = &[
    ("BPSK", 1),
    ("QPSK", 2),
    ("8", 3),
    ("16", 4),
    ("32", 5),
    ("64", 6),
    ("128", 7),
    ("256", 8),
    ("1024", 10),
    ("4096", 12),
];

/// Look up bits per symbol for a modulation identifier.
///
/// Matching ignores surrounding whitespace and letter case.
pub fn lookup_bits_per_symbol(modulation: &str) -> Option<i64> {
    let key = modulation.trim().to_ascii_uppercase();
    MODULATION_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, bits)| bits)
}

/// Bits per symbol, falling back to QPSK for unknown identifiers.
pub fn bits_per_symbol(modulation: &str) -> i64 {
    lookup_bits_per_symbol(modulation).unwrap_or_else(|| {
        tracing::warn!(modulation, "unknown modulation, assuming QPSK");
        FALLBACK_BITS_PER_SYMBOL
    })
}

/// OFDM inputs after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfdmInput {
    /// Bandwidth of one RB (kHz)
    pub bandwidth_khz: f64,
    /// Subcarrier spacing (kHz)
    pub subcarrier_spacing_khz: f64,
    /// Modulation identifier
    pub modulation: String,
    /// OFDM symbols per RB
    pub num_symbols_per_rb: i64,
    /// RB duration; scaled by 1e-3 to seconds
    pub rb_duration_us: f64,
    /// RBs transmitted in parallel
    pub parallel_rbs: i64,
}

/// OFDM outputs, unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfdmResult {
    pub bandwidth_khz: f64,
    pub subcarrier_spacing_khz: f64,
    pub modulation: String,
    pub modulation_bits_per_symbol: i64,
    pub num_symbols_per_rb: i64,
    pub rb_duration_us: f64,
    pub parallel_rbs: i64,
    pub subcarriers_per_rb: i64,
    pub bits_per_re: i64,
    pub bits_per_ofdm_symbol: i64,
    pub bits_per_rb: i64,
    pub total_bits: i64,
    pub rb_duration_sec: f64,
    pub max_data_rate_bps: f64,
    pub total_bandwidth_hz: f64,
    pub spectral_efficiency_bps_per_hz: f64,
}

impl OfdmInput {
    pub fn from_params(params: &Params<'_>) -> Self {
        Self {
            bandwidth_khz: params.float("bandwidth", 0.0),
            subcarrier_spacing_khz: params.float("subcarrierSpacing", 0.0),
            modulation: params.text("modulation", "QAM"),
            num_symbols_per_rb: params.int("numSymbols", 0),
            rb_duration_us: params.float("duration_of_RB", 0.0),
            parallel_rbs: params.int("parallelRB", 0),
        }
    }

    pub fn compute(&self) -> OfdmResult {
        let bits = bits_per_symbol(&self.modulation);

        let rb_bandwidth_hz = self.bandwidth_khz * 1e3;
        let spacing_hz = self.subcarrier_spacing_khz * 1e3;
        let subcarriers = if spacing_hz > 0.0 {
            (rb_bandwidth_hz / spacing_hz).floor() as i64
        } else {
            0
        };

        let bits_per_ofdm_symbol = subcarriers.saturating_mul(bits);
        let bits_per_rb = bits_per_ofdm_symbol.saturating_mul(self.num_symbols_per_rb);
        let total_bits = bits_per_rb.saturating_mul(self.parallel_rbs);

        // zero-duration guard
        let rb_duration_sec = if self.rb_duration_us > 0.0 {
            self.rb_duration_us * 1e-3
        } else {
            1.0
        };
        let max_data_rate_bps = total_bits as f64 / rb_duration_sec;

        let total_bandwidth_hz = rb_bandwidth_hz * self.parallel_rbs as f64;
        let spectral_efficiency = if total_bandwidth_hz > 0.0 {
            total_bits as f64 / (total_bandwidth_hz * rb_duration_sec)
        } else {
            0.0
        };

        tracing::debug!(subcarriers, total_bits, max_data_rate_bps, "ofdm computed");

        OfdmResult {
            bandwidth_khz: self.bandwidth_khz,
            subcarrier_spacing_khz: self.subcarrier_spacing_khz,
            modulation: self.modulation.clone(),
            modulation_bits_per_symbol: bits,
            num_symbols_per_rb: self.num_symbols_per_rb,
            rb_duration_us: self.rb_duration_us,
            parallel_rbs: self.parallel_rbs,
            subcarriers_per_rb: subcarriers,
            bits_per_re: bits,
            bits_per_ofdm_symbol,
            bits_per_rb,
            total_bits,
            rb_duration_sec,
            max_data_rate_bps,
            total_bandwidth_hz,
            spectral_efficiency_bps_per_hz: spectral_efficiency,
        }
    }
}

/// Coerce the mapping and compute throughput. Never fails.
pub fn calculate(params: &Params<'_>) -> OfdmResult {
    OfdmInput::from_params(params).compute()
}
