//! Communication Chain Rate Cascade
//!
//! Tracks the bit rate through a classic digital transmitter chain:
//!
//! ```text
//! Analog ──► Sampler ──► Quantizer ──► Source Enc ──► Channel Enc ──► Interleaver ──► Burst Fmt
//!              fs        fs·bits       ·r_src          ÷r_ch            ·r_il           ·L
//! ```
//!
//! Unlike the other calculators every input here is validated. Rules run in
//! a fixed order and the first failure is returned as a
//! [`CalcError::InvalidInput`]; nothing is computed past it. A stage that
//! overflows to a non-finite rate ends the calculation with
//! [`CalcError::Unexpected`].
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::comm_pipeline::PipelineInput;
//! use rfcalc_core::coerce::Params;
//! use serde_json::json;
//!
//! let data = json!({
//!     "bandwidth": 4,
//!     "quantBits": 8,
//!     "sourceEncoderRate": 1,
//!     "channelEncoderRate": 0.5,
//!     "burstLength": 1,
//! });
//! let input = PipelineInput::from_params(&Params::new(data.as_object().unwrap())).unwrap();
//! let rates = input.compute().unwrap();
//! assert_eq!(rates.sampler_rate_bps, 8_000.0);
//! assert_eq!(rates.channel_encoder_rate_bps, 128_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::coerce::Params;
use crate::error::{CalcError, CalcResult};

/// Valid quantizer word lengths (bits).
pub const QUANT_BITS_RANGE: std::ops::RangeInclusive<i64> = 1..=32;

/// Validated pipeline inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInput {
    /// Analog bandwidth (kHz)
    pub bandwidth_khz: f64,
    /// Sampling rate (Hz); Nyquist rate when not given
    pub sampling_rate_hz: f64,
    /// Quantizer word length
    pub quant_bits: i64,
    /// Source coding rate, (0, 1]
    pub source_encoder_rate: f64,
    /// Channel coding rate, (0, 1]
    pub channel_encoder_rate: f64,
    /// Interleaver rate expansion, >= 1
    pub interleaver_rate: f64,
    /// Burst formatter expansion, > 0
    pub burst_length: f64,
}

/// Bit rate leaving each stage (bps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub sampler_rate_bps: f64,
    pub quantizer_rate_bps: f64,
    pub source_encoder_rate_bps: f64,
    pub channel_encoder_rate_bps: f64,
    pub interleaver_rate_bps: f64,
    pub burst_formatter_rate_bps: f64,
}

impl PipelineInput {
    /// Coerce and validate, stopping at the first broken rule.
    pub fn from_params(params: &Params<'_>) -> CalcResult<Self> {
        let bandwidth_khz = params
            .try_float("bandwidth")
            .filter(|&bw| bw > 0.0)
            .ok_or_else(|| CalcError::invalid("bandwidth", "Bandwidth must be greater than 0."))?;
        let nyquist_hz = 2.0 * bandwidth_khz * 1e3;

        let sampling_rate_hz = params.float("samplingRate", nyquist_hz);
        if sampling_rate_hz <= 0.0 {
            return Err(CalcError::invalid(
                "samplingRate",
                "Sampling rate must be greater than 0.",
            ));
        }

        let quant_bits = params
            .try_int("quantBits")
            .filter(|bits| QUANT_BITS_RANGE.contains(bits))
            .ok_or_else(|| {
                CalcError::invalid("quantBits", "Quantization bits must be between 1 and 32.")
            })?;

        let source_encoder_rate = unit_rate(
            params,
            "sourceEncoderRate",
            "Source encoder rate must be between 0 and 1.",
        )?;
        let channel_encoder_rate = unit_rate(
            params,
            "channelEncoderRate",
            "Channel encoder rate must be between 0 and 1.",
        )?;

        let interleaver_rate = params.float("interleaverRate", 1.0);
        if interleaver_rate < 1.0 {
            return Err(CalcError::invalid(
                "interleaverRate",
                "Interleaver rate must be ≥ 1.",
            ));
        }

        let burst_length = params
            .try_float("burstLength")
            .filter(|&l| l > 0.0)
            .ok_or_else(|| CalcError::invalid("burstLength", "Burst length must be > 0."))?;

        Ok(Self {
            bandwidth_khz,
            sampling_rate_hz,
            quant_bits,
            source_encoder_rate,
            channel_encoder_rate,
            interleaver_rate,
            burst_length,
        })
    }

    /// Run the cascade.
    pub fn compute(&self) -> CalcResult<PipelineResult> {
        let sampler = self.sampling_rate_hz;
        let quantizer = stage("quantizer", sampler * self.quant_bits as f64)?;
        let source = stage("source encoder", quantizer * self.source_encoder_rate)?;
        let channel = stage("channel encoder", source / self.channel_encoder_rate)?;
        let interleaver = stage("interleaver", channel * self.interleaver_rate)?;
        let burst = stage("burst formatter", interleaver * self.burst_length)?;

        tracing::debug!(sampler, burst, "pipeline computed");

        Ok(PipelineResult {
            sampler_rate_bps: sampler,
            quantizer_rate_bps: quantizer,
            source_encoder_rate_bps: source,
            channel_encoder_rate_bps: channel,
            interleaver_rate_bps: interleaver,
            burst_formatter_rate_bps: burst,
        })
    }
}

/// A required coding rate in (0, 1].
fn unit_rate(params: &Params<'_>, field: &'static str, message: &str) -> CalcResult<f64> {
    params
        .try_float(field)
        .filter(|&r| r > 0.0 && r <= 1.0)
        .ok_or_else(|| CalcError::invalid(field, message))
}

fn stage(name: &str, rate: f64) -> CalcResult<f64> {
    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(CalcError::Unexpected(format!("{name} rate is not a finite number")))
    }
}

/// Validate the mapping and run the cascade.
pub fn calculate(params: &Params<'_>) -> CalcResult<PipelineResult> {
    PipelineInput::from_params(params)?.compute()
}
