//! Cellular Capacity and Traffic Planning
//!
//! Sizes a hexagonal cellular layout over a service area and checks it
//! against subscriber demand:
//!
//! - **Geometry**: cell area `1.5·√3·r²`, number of cells covering the area
//! - **Channels**: FDMA-style channels per cell under a reuse factor
//! - **Traffic**: offered Erlangs per subscriber, network and cell
//! - **Trunking**: Erlang-B blocking, channels needed and traffic supported at
//!   the requested grade of service
//! - **Link capacity**: Shannon bound per cell and users it can serve at a
//!   given per-user rate, plus the C/I ratio in linear terms
//!
//! Inputs are defaulted silently; every division is guarded so a zero reuse
//! factor, radius or channel bandwidth produces zeros instead of errors.
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::cellular::CellularInput;
//!
//! let input = CellularInput {
//!     area_km2: 100.0,
//!     cell_radius_km: 1.0,
//!     reuse_factor: 7,
//!     bandwidth_mhz: 25.0,
//!     channel_bandwidth_mhz: 0.2,
//!     ..Default::default()
//! };
//! let r = input.compute();
//! assert_eq!(r.num_cells, 38);
//! assert_eq!(r.channels_per_cell, 17);
//! ```

use serde::{Deserialize, Serialize};

use crate::coerce::Params;
use crate::erlang;
use crate::units::{self, round_to};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Area of a regular hexagon with circumradius `radius_km` (km²).
pub fn hexagon_area_km2(radius_km: f64) -> f64 {
    1.5 * 3.0f64.sqrt() * radius_km * radius_km
}

/// Cellular inputs after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellularInput {
    /// Service area (km²)
    pub area_km2: f64,
    /// Cell circumradius (km)
    pub cell_radius_km: f64,
    /// Frequency reuse cluster size
    pub reuse_factor: i64,
    /// Total system bandwidth (MHz)
    pub bandwidth_mhz: f64,
    /// Bandwidth of one traffic channel (MHz)
    pub channel_bandwidth_mhz: f64,
    /// Network-wide spectral efficiency (bps/Hz)
    pub spectral_efficiency: f64,
    /// Subscriber count
    pub subscribers: i64,
    /// Calls per subscriber per day
    pub calls_per_day: f64,
    /// Mean call holding time (min)
    pub call_duration_min: f64,
    /// Target blocking probability
    pub gos: f64,
    /// Per-cell SNR (dB)
    pub snr_db: f64,
    /// Carrier-to-interference ratio (dB)
    pub ci_db: f64,
    /// Rate each user needs (kbps)
    pub user_data_rate_kbps: f64,
}

impl Default for CellularInput {
    fn default() -> Self {
        Self {
            area_km2: 0.0,
            cell_radius_km: 0.0,
            reuse_factor: 1,
            bandwidth_mhz: 0.0,
            channel_bandwidth_mhz: 0.0,
            spectral_efficiency: 0.0,
            subscribers: 0,
            calls_per_day: 0.0,
            call_duration_min: 0.0,
            gos: 0.0,
            snr_db: 0.0,
            ci_db: 0.0,
            user_data_rate_kbps: 0.0,
        }
    }
}

/// Cellular outputs: echoed inputs and every derived quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellularResult {
    pub area_km2: f64,
    pub cell_radius_km: f64,
    pub cell_area_km2: f64,
    pub num_cells: i64,
    pub reuse_factor: i64,
    pub bandwidth_mhz: f64,
    pub channel_bandwidth_mhz: f64,
    pub channels_per_cell: i64,
    pub total_channels: i64,
    pub spectral_efficiency_bps_per_hz: f64,
    pub network_capacity_bps: i64,
    pub subscribers: i64,
    pub subscribers_per_cell: f64,
    pub calls_per_day: f64,
    pub call_duration_min: f64,
    pub gos: f64,
    pub traffic_per_cell_erlangs: f64,
    pub total_traffic_erlangs: f64,
    pub erlang_per_user: f64,
    /// `None` when the channel count is beyond the Erlang tables.
    pub blocking_probability: Option<f64>,
    /// `None` when `gos` is unusable or no channel count up to the limit suffices.
    pub required_channels_per_cell: Option<i64>,
    pub max_traffic_per_cell_erlangs: Option<f64>,
    pub bandwidth_per_cell_hz: f64,
    pub snr_db: f64,
    pub shannon_capacity_per_cell_bps: f64,
    pub user_data_rate_kbps: f64,
    pub max_users_per_cell: i64,
    pub ci_db: f64,
    pub ci_linear: f64,
}

impl CellularInput {
    pub fn from_params(params: &Params<'_>) -> Self {
        let d = Self::default();
        Self {
            area_km2: params.float("area", d.area_km2),
            cell_radius_km: params.float("cell_radius", d.cell_radius_km),
            reuse_factor: params.int("reuse_factor", d.reuse_factor),
            bandwidth_mhz: params.float("bandwidth", d.bandwidth_mhz),
            channel_bandwidth_mhz: params.float("channel_bandwidth", d.channel_bandwidth_mhz),
            spectral_efficiency: params.float("spectral_efficiency", d.spectral_efficiency),
            subscribers: params.int("subscribers", d.subscribers),
            calls_per_day: params.float("calls_per_day", d.calls_per_day),
            call_duration_min: params.float("call_duration", d.call_duration_min),
            gos: params.float("gos", d.gos),
            snr_db: params.float("snr_db", d.snr_db),
            ci_db: params.float("ci_db", d.ci_db),
            user_data_rate_kbps: params.float("user_data_rate_kbps", d.user_data_rate_kbps),
        }
    }

    pub fn compute(&self) -> CellularResult {
        let cell_area = hexagon_area_km2(self.cell_radius_km);
        let num_cells = if cell_area > 0.0 {
            self.area_km2 / cell_area
        } else {
            0.0
        };

        let total_bw_hz = self.bandwidth_mhz * 1e6;
        let channel_bw_hz = self.channel_bandwidth_mhz * 1e6;
        let reuse = self.reuse_factor as f64;

        let channels_per_cell = if self.reuse_factor > 0 && channel_bw_hz > 0.0 {
            total_bw_hz / (reuse * channel_bw_hz)
        } else {
            0.0
        };
        let total_channels = (num_cells * channels_per_cell) as i64;

        // Offered traffic
        let erlang_per_user = self.calls_per_day * self.call_duration_min * 60.0 / SECONDS_PER_DAY;
        let total_traffic = erlang_per_user * self.subscribers as f64;
        let (traffic_per_cell, subscribers_per_cell) = if num_cells > 0.0 {
            (total_traffic / num_cells, self.subscribers as f64 / num_cells)
        } else {
            (0.0, 0.0)
        };

        // Trunking on the whole channels a cell actually has; the Erlang
        // helpers return None past erlang::MAX_CHANNELS
        let trunks = channels_per_cell.max(0.0) as u64;
        let blocking = if traffic_per_cell > 0.0 {
            erlang::erlang_b(traffic_per_cell, trunks)
        } else {
            Some(0.0)
        };
        let required_channels =
            erlang::required_channels(traffic_per_cell, self.gos).map(|n| n as i64);
        let max_traffic = erlang::max_offered_traffic(trunks, self.gos);
        if trunks > erlang::MAX_CHANNELS {
            tracing::debug!(trunks, "channel count beyond Erlang limit, trunking skipped");
        }

        let network_capacity = total_bw_hz * self.spectral_efficiency;

        // Link-level capacity
        let bw_per_cell = if self.reuse_factor > 0 {
            total_bw_hz / reuse
        } else {
            0.0
        };
        let shannon = if self.snr_db > 0.0 && bw_per_cell > 0.0 {
            bw_per_cell * (1.0 + units::from_db(self.snr_db)).log2()
        } else {
            0.0
        };
        let user_rate_bps = self.user_data_rate_kbps * 1e3;
        let max_users = if user_rate_bps > 0.0 {
            (shannon / user_rate_bps).floor() as i64
        } else {
            0
        };

        tracing::debug!(
            num_cells,
            channels_per_cell,
            traffic_per_cell,
            shannon,
            "cellular computed"
        );

        CellularResult {
            area_km2: self.area_km2,
            cell_radius_km: self.cell_radius_km,
            cell_area_km2: cell_area,
            num_cells: num_cells as i64,
            reuse_factor: self.reuse_factor,
            bandwidth_mhz: self.bandwidth_mhz,
            channel_bandwidth_mhz: self.channel_bandwidth_mhz,
            channels_per_cell: channels_per_cell as i64,
            total_channels,
            spectral_efficiency_bps_per_hz: self.spectral_efficiency,
            network_capacity_bps: network_capacity as i64,
            subscribers: self.subscribers,
            subscribers_per_cell: round_to(subscribers_per_cell, 2),
            calls_per_day: self.calls_per_day,
            call_duration_min: self.call_duration_min,
            gos: self.gos,
            traffic_per_cell_erlangs: round_to(traffic_per_cell, 2),
            total_traffic_erlangs: round_to(total_traffic, 2),
            erlang_per_user: round_to(erlang_per_user, 4),
            blocking_probability: blocking.map(|b| round_to(b, 4)),
            required_channels_per_cell: required_channels,
            max_traffic_per_cell_erlangs: max_traffic.map(|a| round_to(a, 2)),
            bandwidth_per_cell_hz: bw_per_cell,
            snr_db: self.snr_db,
            shannon_capacity_per_cell_bps: shannon,
            user_data_rate_kbps: self.user_data_rate_kbps,
            max_users_per_cell: max_users,
            ci_db: self.ci_db,
            ci_linear: units::from_db(self.ci_db),
        }
    }
}

/// Coerce the mapping and plan the network. Never fails.
pub fn calculate(params: &Params<'_>) -> CellularResult {
    CellularInput::from_params(params).compute()
}
