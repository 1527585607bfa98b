//! Explanation prompts
//!
//! Builds the natural-language request handed to the explanation service:
//! an expert role, the user's inputs as given, the computed results, and a
//! closing instruction. The text is plain UTF-8 with one `- label: value`
//! line per quantity.

use std::fmt::Write;

use serde_json::{Map, Value};

use crate::cellular::CellularResult;
use crate::comm_pipeline::PipelineResult;
use crate::link_budget::LinkBudgetResult;
use crate::ofdm::OfdmResult;
use crate::scenario::ScenarioOutput;

const NOT_SET: &str = "not set";
const NOT_COMPUTED: &str = "not computed";

struct PromptBuilder {
    text: String,
}

impl PromptBuilder {
    fn new(role: &str) -> Self {
        Self {
            text: format!("{role}\n"),
        }
    }

    fn section(&mut self, title: &str) -> &mut Self {
        let _ = write!(self.text, "\n{title}:\n");
        self
    }

    fn line(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        let _ = writeln!(self.text, "- {label}: {value}");
        self
    }

    fn finish(mut self, closing: &str) -> String {
        let _ = write!(self.text, "\n{closing}\n");
        self.text
    }
}

/// Render a raw input value the way the user typed it.
fn raw(data: &Map<String, Value>, key: &str) -> String {
    match data.get(key) {
        None | Some(Value::Null) => NOT_SET.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => NOT_SET.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

fn or_not_computed<T>(value: Option<T>, render: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| NOT_COMPUTED.to_string(), render)
}

/// Compose the explanation request for a computed scenario.
pub fn explanation_prompt(data: &Map<String, Value>, output: &ScenarioOutput) -> String {
    match output {
        ScenarioOutput::LinkBudget(r) => link_budget_prompt(r),
        ScenarioOutput::Ofdm(r) => ofdm_prompt(data, r),
        ScenarioOutput::WirelessComm(r) => pipeline_prompt(data, r),
        ScenarioOutput::Cellular(r) => cellular_prompt(data, r),
    }
}

fn link_budget_prompt(r: &LinkBudgetResult) -> String {
    let mut p = PromptBuilder::new(
        "You are an expert in wireless link budgets. Using the inputs and results below, \
         explain how each parameter shapes the received power, the transmit power needed, \
         and the overall reliability of the link.",
    );
    p.section("User inputs")
        .line("Link margin (dB)", r.link_margin_db)
        .line("Temperature (K)", r.temperature_k)
        .line("Noise figure (dB)", r.noise_figure_db)
        .line("Bit rate (bps)", r.bitrate_bps)
        .line("Eb/N0 (dB)", r.eb_no_db)
        .line("Distance (km)", r.distance_km)
        .line("Frequency (MHz)", r.frequency_mhz)
        .line("Transmit antenna gain (dBi)", r.tx_gain_dbi)
        .line("Receive antenna gain (dBi)", r.rx_gain_dbi)
        .line("System loss (dB)", r.system_loss_db);
    p.section("Computed results")
        .line("Required received power (dBm)", r.received_power_dbm)
        .line("Required transmit power (dBm)", r.transmit_power_dbm)
        .line("Free-space path loss (dB)", r.fspl_db);
    p.finish("Describe how these values are derived and what they mean for link design.")
}

fn ofdm_prompt(data: &Map<String, Value>, r: &OfdmResult) -> String {
    let mut p = PromptBuilder::new(
        "You are an expert in OFDM systems. Using the inputs and results below, explain how \
         each parameter drives resource allocation, peak data rate and spectral efficiency.",
    );
    p.section("User inputs")
        .line("RB bandwidth (kHz)", raw(data, "bandwidth"))
        .line("Subcarrier spacing (kHz)", raw(data, "subcarrierSpacing"))
        .line("Modulation", &r.modulation)
        .line("OFDM symbols per RB", raw(data, "numSymbols"))
        .line("RB duration", raw(data, "duration_of_RB"))
        .line("Parallel RBs", raw(data, "parallelRB"));
    p.section("Computed results")
        .line("Subcarriers per RB", r.subcarriers_per_rb)
        .line("Bits per resource element", r.bits_per_re)
        .line("Bits per OFDM symbol", r.bits_per_ofdm_symbol)
        .line("Bits per RB", r.bits_per_rb)
        .line("Total bits over parallel RBs", r.total_bits)
        .line("RB duration (s)", format!("{:.6}", r.rb_duration_sec))
        .line("Maximum data rate (bps)", format!("{:.2}", r.max_data_rate_bps))
        .line("Total bandwidth (kHz)", format!("{:.2}", r.total_bandwidth_hz / 1e3))
        .line(
            "Spectral efficiency (bps/Hz)",
            format!("{:.4}", r.spectral_efficiency_bps_per_hz),
        );
    p.finish("Describe how these values are derived and what they mean for OFDM design.")
}

fn pipeline_prompt(data: &Map<String, Value>, r: &PipelineResult) -> String {
    let sampling = match raw(data, "samplingRate") {
        s if s == NOT_SET => "automatic (twice the bandwidth)".to_string(),
        s => s,
    };
    let interleaver = match raw(data, "interleaverRate") {
        s if s == NOT_SET => "1 (default)".to_string(),
        s => s,
    };

    let mut p = PromptBuilder::new(
        "You are an expert in digital communication chains. A signal has passed through the \
         blocks below. Explain how and why the bit rate changes at each block.",
    );
    p.section("User inputs")
        .line("Bandwidth (kHz)", raw(data, "bandwidth"))
        .line("Sampling rate (Hz)", sampling)
        .line("Quantization bits", raw(data, "quantBits"))
        .line("Source encoder rate", raw(data, "sourceEncoderRate"))
        .line("Channel encoder rate", raw(data, "channelEncoderRate"))
        .line("Interleaver rate", interleaver)
        .line("Burst length", raw(data, "burstLength"));
    p.section("Rate after each block (bps)")
        .line("Sampler", format!("{:.2}", r.sampler_rate_bps))
        .line("Quantizer", format!("{:.2}", r.quantizer_rate_bps))
        .line("Source encoder", format!("{:.2}", r.source_encoder_rate_bps))
        .line("Channel encoder", format!("{:.2}", r.channel_encoder_rate_bps))
        .line("Interleaver", format!("{:.2}", r.interleaver_rate_bps))
        .line("Burst formatter", format!("{:.2}", r.burst_formatter_rate_bps));
    p.finish("Explain the role of each block and how the rate evolves along the chain.")
}

fn cellular_prompt(data: &Map<String, Value>, r: &CellularResult) -> String {
    let mut p = PromptBuilder::new(
        "You are an expert in cellular network planning. Using the inputs and results below, \
         explain how each input affects coverage, frequency reuse, traffic handling and \
         network capacity.",
    );
    p.section("User inputs")
        .line("Service area (km²)", raw(data, "area"))
        .line("Cell radius (km)", raw(data, "cell_radius"))
        .line("Reuse factor", r.reuse_factor)
        .line("Total bandwidth (MHz)", raw(data, "bandwidth"))
        .line("Channel bandwidth (MHz)", raw(data, "channel_bandwidth"))
        .line("Spectral efficiency (bps/Hz)", raw(data, "spectral_efficiency"))
        .line("Subscribers", raw(data, "subscribers"))
        .line("Calls per subscriber per day", raw(data, "calls_per_day"))
        .line("Mean call duration (min)", raw(data, "call_duration"))
        .line("Grade of service", raw(data, "gos"))
        .line("SNR (dB)", raw(data, "snr_db"))
        .line("C/I (dB)", raw(data, "ci_db"))
        .line("User data rate (kbps)", raw(data, "user_data_rate_kbps"));
    p.section("Computed results")
        .line("Cell area (km²)", format!("{:.2}", r.cell_area_km2))
        .line("Number of cells", r.num_cells)
        .line("Channels per cell", r.channels_per_cell)
        .line("Total channels", r.total_channels)
        .line("Traffic per user (Erl)", format!("{:.4}", r.erlang_per_user))
        .line("Total traffic (Erl)", format!("{:.2}", r.total_traffic_erlangs))
        .line("Traffic per cell (Erl)", format!("{:.2}", r.traffic_per_cell_erlangs))
        .line(
            "Blocking probability",
            or_not_computed(r.blocking_probability, |b| format!("{b:.4}")),
        )
        .line(
            "Channels needed per cell",
            or_not_computed(r.required_channels_per_cell, |n| n.to_string()),
        )
        .line(
            "Network capacity (Mbps)",
            format!("{:.2}", r.network_capacity_bps as f64 / 1e6),
        )
        .line(
            "Shannon capacity per cell (Mbps)",
            format!("{:.2}", r.shannon_capacity_per_cell_bps / 1e6),
        )
        .line("Max users per cell", r.max_users_per_cell);
    p.finish(
        "Give a structured account of how these parameters set the size, capacity and \
         efficiency of the network.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{compute, Scenario};
    use serde_json::json;

    fn prompt_for(scenario: Scenario, data: Value) -> String {
        let map = data.as_object().cloned().unwrap_or_default();
        let output = compute(scenario, &map).unwrap();
        explanation_prompt(&map, &output)
    }

    #[test]
    fn test_link_budget_prompt_lists_results() {
        let p = prompt_for(Scenario::LinkBudget, json!({}));
        assert!(p.starts_with("You are an expert in wireless link budgets"));
        assert!(p.contains("- Free-space path loss (dB): 100.05"));
        assert!(p.contains("- Temperature (K): 290"));
        assert!(p.contains("User inputs:"));
        assert!(p.contains("Computed results:"));
    }

    #[test]
    fn test_ofdm_prompt_formats_rates() {
        let p = prompt_for(
            Scenario::Ofdm,
            json!({"bandwidth": 180, "subcarrierSpacing": 15, "modulation": "16",
                   "numSymbols": 7, "duration_of_RB": 1000, "parallelRB": 1}),
        );
        assert!(p.contains("- Maximum data rate (bps): 336.00"));
        assert!(p.contains("- RB duration (s): 1.000000"));
        assert!(p.contains("- Total bandwidth (kHz): 180.00"));
        assert!(p.contains("- Modulation: 16"));
    }

    #[test]
    fn test_pipeline_prompt_marks_defaults() {
        let p = prompt_for(
            Scenario::WirelessComm,
            json!({"bandwidth": 100, "quantBits": 8, "sourceEncoderRate": 0.5,
                   "channelEncoderRate": 0.75, "burstLength": 2}),
        );
        assert!(p.contains("- Sampling rate (Hz): automatic (twice the bandwidth)"));
        assert!(p.contains("- Interleaver rate: 1 (default)"));
        assert!(p.contains("- Burst formatter: 2133333.33"));
    }

    #[test]
    fn test_cellular_prompt_shows_missing_inputs() {
        let p = prompt_for(Scenario::Cellular, json!({"area": "100", "cell_radius": 1}));
        assert!(p.contains("- Service area (km²): 100"));
        assert!(p.contains("- Subscribers: not set"));
        assert!(p.contains("- Reuse factor: 1"));
        // no grade of service given, so no channel requirement
        assert!(p.contains("- Channels needed per cell: not computed"));
    }

    #[test]
    fn test_raw_rendering() {
        let data = json!({"a": " 5 ", "b": null, "c": 2.5, "d": ""});
        let map = data.as_object().unwrap();
        assert_eq!(raw(map, "a"), "5");
        assert_eq!(raw(map, "b"), NOT_SET);
        assert_eq!(raw(map, "c"), "2.5");
        assert_eq!(raw(map, "d"), NOT_SET);
        assert_eq!(raw(map, "missing"), NOT_SET);
    }
}
