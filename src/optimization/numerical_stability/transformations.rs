//! Numerical stability utilities.
//!
//! Provides the guarded log-partition used by the reversible Markov-state
//! likelihood, which overflows when evaluated naïvely on large log-weights.
use ndarray::ArrayView1;

/// Stable `ln Σ_k exp(x_k)`.
///
/// Shifts by the maximum entry before exponentiating. An empty view or a
/// view whose entries are all `-∞` yields `-∞`.
pub fn log_sum_exp(xs: ArrayView1<'_, f64>) -> f64 {
    let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    let sum: f64 = xs.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - `log_sum_exp` against a direct evaluation and its overflow guard.
    //
    // They intentionally DO NOT cover:
    // - The reversible likelihood that calls it; see `msm::reversible`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `log_sum_exp` agrees with the direct formula and stays finite for
    // entries that would overflow `exp`.
    //
    // Given
    // -----
    // - [0, ln 2, ln 3] (direct sum = 6).
    // - [1000, 1000].
    //
    // Expect
    // ------
    // - ln 6 for the first case, 1000 + ln 2 for the second.
    fn log_sum_exp_is_exact_and_overflow_safe() {
        let small = array![0.0, 2f64.ln(), 3f64.ln()];
        let large = array![1000.0, 1000.0];

        assert_relative_eq!(log_sum_exp(small.view()), 6f64.ln(), epsilon = 1e-14);
        assert_relative_eq!(log_sum_exp(large.view()), 1000.0 + 2f64.ln(), epsilon = 1e-12);
        assert_eq!(log_sum_exp(array![f64::NEG_INFINITY].view()), f64::NEG_INFINITY);
    }
}
