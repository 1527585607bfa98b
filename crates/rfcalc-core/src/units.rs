//! Unit conversions shared by the calculators
//!
//! Unlike display-oriented dB helpers these do not clamp: a non-positive
//! argument to [`to_db`] yields `-inf`/`NaN`, so callers must check their
//! preconditions first.
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::units::{from_db, to_db, watts_to_dbm};
//!
//! assert!((from_db(3.0) - 1.995).abs() < 1e-3);
//! assert!((to_db(100.0) - 20.0).abs() < 1e-12);
//! assert!((watts_to_dbm(1.0) - 30.0).abs() < 1e-12);
//! ```

/// Boltzmann constant (J/K), three significant figures as used in
/// classroom link-budget tables.
pub const BOLTZMANN: f64 = 1.38e-23;

/// FSPL constant for distance in km and frequency in MHz.
pub const FSPL_KM_MHZ_DB: f64 = 32.45;

/// Convert dB to a linear power ratio: `10^(db/10)`.
#[inline]
pub fn from_db(db: f64) -> f64 {
    10.0f64.powf(db / 10.0)
}

/// Convert a linear power ratio to dB: `10 * log10(x)`.
#[inline]
pub fn to_db(linear: f64) -> f64 {
    10.0 * linear.log10()
}

/// Convert watts to dBm.
#[inline]
pub fn watts_to_dbm(watts: f64) -> f64 {
    to_db(watts) + 30.0
}

/// Free-space path loss in dB for distance in km and frequency in MHz.
#[inline]
pub fn fspl_db(distance_km: f64, frequency_mhz: f64) -> f64 {
    FSPL_KM_MHZ_DB + 20.0 * distance_km.log10() + 20.0 * frequency_mhz.log10()
}

/// Round to `decimals` places, half away from zero.
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10.0f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_round_trip() {
        for x in [-120.0, -30.5, -3.0, 0.0, 0.01, 3.0, 17.3, 60.0, 150.0] {
            let back = to_db(from_db(x));
            assert!((back - x).abs() < 1e-9, "round trip of {x} gave {back}");
        }
    }

    #[test]
    fn test_known_values() {
        assert!((from_db(10.0) - 10.0).abs() < 1e-12);
        assert!((from_db(0.0) - 1.0).abs() < 1e-12);
        assert!((watts_to_dbm(1e-3)).abs() < 1e-12);
    }

    #[test]
    fn test_fspl_reference() {
        // 1 km at 2400 MHz
        let loss = fspl_db(1.0, 2400.0);
        assert!((loss - 100.0542).abs() < 1e-3, "got {loss}");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_56, 2), 1.23);
        assert_eq!(round_to(-1.235_1, 2), -1.24);
        assert_eq!(round_to(0.123_46, 4), 0.1235);
        assert_eq!(round_to(1_000_000.4, 0), 1_000_000.0);
    }
}
