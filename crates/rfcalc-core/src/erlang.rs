//! Erlang-B Trunking
//!
//! Blocking probability of a loss system (blocked calls cleared) and the two
//! planning questions asked of it: how many channels a cell needs for a
//! target grade of service, and how much traffic a given channel count can
//! carry at that grade.
//!
//! The recursion `B(0) = 1`, `B(n) = A·B(n−1) / (n + A·B(n−1))` is used
//! instead of the factorial form, which overflows beyond a few hundred
//! channels.
//!
//! ## Example
//!
//! ```rust
//! use rfcalc_core::erlang::{erlang_b, max_offered_traffic, required_channels};
//!
//! assert!((erlang_b(10.0, 10).unwrap() - 0.2146).abs() < 1e-4);
//! assert_eq!(required_channels(5.0, 0.02), Some(10));
//! assert!((max_offered_traffic(10, 0.01).unwrap() - 4.461).abs() < 1e-3);
//! ```

/// Largest channel count any function here will work with.
pub const MAX_CHANNELS: u64 = 100_000;

const MAX_BISECTION_STEPS: usize = 200;
const MAX_BRACKET_DOUBLINGS: usize = 64;

/// Blocking probability for `traffic` Erlangs offered to `channels` servers.
///
/// `None` when `channels` exceeds [`MAX_CHANNELS`] or `traffic` is not finite.
pub fn erlang_b(traffic: f64, channels: u64) -> Option<f64> {
    if channels > MAX_CHANNELS || !traffic.is_finite() {
        return None;
    }
    Some(blocking(traffic, channels))
}

fn blocking(traffic: f64, channels: u64) -> f64 {
    if traffic <= 0.0 {
        return if channels == 0 { 1.0 } else { 0.0 };
    }
    let mut b = 1.0;
    for n in 1..=channels {
        let ab = traffic * b;
        b = ab / (n as f64 + ab);
    }
    b
}

fn valid_gos(gos: f64) -> bool {
    gos > 0.0 && gos < 1.0
}

/// Fewest channels whose blocking does not exceed `gos`.
///
/// `None` when `gos` is outside (0, 1) or the search limit is hit.
pub fn required_channels(traffic: f64, gos: f64) -> Option<u64> {
    if !valid_gos(gos) || !traffic.is_finite() {
        return None;
    }
    if traffic <= 0.0 {
        return Some(0);
    }
    let mut b = 1.0;
    for n in 1..=MAX_CHANNELS {
        let ab = traffic * b;
        b = ab / (n as f64 + ab);
        if b <= gos {
            return Some(n);
        }
    }
    None
}

/// Largest offered traffic (Erlangs) `channels` can carry at blocking `gos`.
///
/// `None` when `gos` is outside (0, 1) or `channels` exceeds [`MAX_CHANNELS`].
pub fn max_offered_traffic(channels: u64, gos: f64) -> Option<f64> {
    if !valid_gos(gos) || channels > MAX_CHANNELS {
        return None;
    }
    if channels == 0 {
        return Some(0.0);
    }

    // B(A) is increasing in A; bracket then bisect
    let mut hi = channels as f64;
    let mut doublings = 0;
    while blocking(hi, channels) <= gos {
        if doublings == MAX_BRACKET_DOUBLINGS {
            return None;
        }
        hi *= 2.0;
        doublings += 1;
    }
    let mut lo = 0.0;
    for _ in 0..MAX_BISECTION_STEPS {
        if hi - lo <= 1e-12 * hi {
            break;
        }
        let mid = 0.5 * (lo + hi);
        if blocking(mid, channels) > gos {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Some(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert!((erlang_b(2.0, 1).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((erlang_b(10.0, 10).unwrap() - 0.214_582).abs() < 1e-6);
        assert!((erlang_b(5.0, 10).unwrap() - 0.018_385).abs() < 1e-6);
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(erlang_b(0.0, 5), Some(0.0));
        assert_eq!(erlang_b(0.0, 0), Some(1.0));
        assert_eq!(erlang_b(3.0, 0), Some(1.0));
        assert_eq!(erlang_b(f64::INFINITY, 5), None);
    }

    #[test]
    fn test_blocking_falls_with_channels() {
        let mut prev = 1.0;
        for n in 1..40 {
            let b = erlang_b(12.0, n).unwrap();
            assert!(b < prev, "B should drop as channels grow");
            prev = b;
        }
    }

    #[test]
    fn test_required_channels() {
        // B(5, 9) = 0.0375, B(5, 10) = 0.0184
        assert_eq!(required_channels(5.0, 0.02), Some(10));
        assert_eq!(required_channels(0.0, 0.02), Some(0));
        assert_eq!(required_channels(5.0, 0.0), None);
        assert_eq!(required_channels(5.0, 1.0), None);
    }

    #[test]
    fn test_max_offered_traffic() {
        let a = max_offered_traffic(10, 0.01).unwrap();
        assert!((a - 4.461_18).abs() < 1e-4, "got {a}");
        let a = max_offered_traffic(10, 0.02).unwrap();
        assert!((a - 5.084).abs() < 1e-3, "got {a}");
        assert_eq!(max_offered_traffic(0, 0.02), Some(0.0));
        assert_eq!(max_offered_traffic(10, 2.0), None);
    }

    #[test]
    fn test_channel_limit() {
        assert!(erlang_b(10.0, MAX_CHANNELS).is_some());
        assert_eq!(erlang_b(10.0, MAX_CHANNELS + 1), None);
        assert_eq!(erlang_b(10.0, u64::MAX), None);
        assert_eq!(max_offered_traffic(MAX_CHANNELS + 1, 0.02), None);
        assert_eq!(max_offered_traffic(u64::MAX, 0.02), None);
        // demand beyond what the search may return
        assert_eq!(required_channels(1e9, 0.02), None);
    }

    #[test]
    fn test_max_traffic_at_channel_limit() {
        let a = max_offered_traffic(MAX_CHANNELS, 0.02).unwrap();
        // large trunk groups approach full utilisation
        assert!(a > 0.99 * MAX_CHANNELS as f64 && a < 1.03 * MAX_CHANNELS as f64, "got {a}");
    }

    #[test]
    fn test_planning_is_consistent() {
        let gos = 0.02;
        let n = required_channels(23.5, gos).unwrap();
        assert!(max_offered_traffic(n, gos).unwrap() >= 23.5);
        assert!(max_offered_traffic(n - 1, gos).unwrap() < 23.5);
    }
}
