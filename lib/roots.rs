//! Newton-type root finding for smooth scalar functions.
//!
//! ```
//! use phasestep::roots::newton;
//!
//! // x² - 2 = 0
//! let x = newton(
//!     |x: f64| x * x - 2.0,
//!     |x: f64| 2.0 * x,
//!     Some(|_: f64| 2.0),
//!     1.0,
//!     1e-14,
//!     50,
//! ).unwrap();
//! assert!((x - 2.0_f64.sqrt()).abs() < 1e-14);
//! ```

use num_traits::Float;
use crate::error::RootError;

pub type RootResult<T> = Result<T, RootError>;

/// Find a root of `f` starting from `x0`.
///
/// With only the first derivative `df` this is Newton's method; when the
/// second derivative `d2f` is also supplied, Halley's correction is applied,
/// giving cubic convergence near simple roots. Iteration stops when the size
/// of the update falls below `epsilon` (relative to `max(1, |x|)`).
pub fn newton<A, F, G, H>(
    f: F,
    df: G,
    d2f: Option<H>,
    x0: A,
    epsilon: A,
    maxiters: usize,
) -> RootResult<A>
where
    A: Float + Into<f64>,
    F: Fn(A) -> A,
    G: Fn(A) -> A,
    H: Fn(A) -> A,
{
    RootError::check_epsilon(epsilon.into())?;
    RootError::check_maxiters(maxiters)?;
    let two = A::one() + A::one();
    let mut x = x0;
    let mut dx: A;
    for _ in 0..maxiters {
        let fx = f(x);
        if fx == A::zero() { return Ok(x); }
        let dfx = df(x);
        if dfx == A::zero() { return Err(RootError::ZeroDerivative(x.into())); }
        let newton_step = fx / dfx;
        dx = match d2f.as_ref() {
            Some(d2f) => {
                let denom = A::one() - newton_step * d2f(x) / (two * dfx);
                if denom == A::zero() { newton_step } else { newton_step / denom }
            },
            None => newton_step,
        };
        x = x - dx;
        if !x.is_finite() { break; }
        if dx.abs() <= epsilon * x.abs().max(A::one()) { return Ok(x); }
    }
    Err(RootError::NotConverged { x: x.into(), iters: maxiters })
}

/// Evaluate a polynomial and its first two derivatives at `x` via Horner's
/// scheme.
///
/// Coefficients are ordered from the highest power down to the constant term.
pub fn poly_eval<A>(coeffs: &[A], x: A) -> (A, A, A)
where A: Float
{
    let two = A::one() + A::one();
    let (mut p, mut dp, mut d2p) = (A::zero(), A::zero(), A::zero());
    for &c in coeffs.iter() {
        d2p = d2p * x + two * dp;
        dp = dp * x + p;
        p = p * x + c;
    }
    (p, dp, d2p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn poly_eval_derivatives() {
        // 2x³ - x + 5
        let coeffs = [2.0, 0.0, -1.0, 5.0];
        let (p, dp, d2p) = poly_eval(&coeffs, 1.5);
        assert_abs_diff_eq!(p, 2.0 * 1.5_f64.powi(3) - 1.5 + 5.0, epsilon = 1e-14);
        assert_abs_diff_eq!(dp, 6.0 * 1.5_f64.powi(2) - 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(d2p, 12.0 * 1.5, epsilon = 1e-14);
    }

    #[test]
    fn newton_without_second_derivative() {
        let x = newton(
            |x: f64| x.cos() - x,
            |x: f64| -x.sin() - 1.0,
            None::<fn(f64) -> f64>,
            1.0,
            1e-14,
            50,
        ).unwrap();
        assert_abs_diff_eq!(x.cos(), x, epsilon = 1e-13);
    }

    #[test]
    fn newton_reports_zero_derivative() {
        let res = newton(
            |x: f64| x * x + 1.0,
            |x: f64| 2.0 * x,
            None::<fn(f64) -> f64>,
            0.0,
            1e-14,
            50,
        );
        assert!(matches!(res, Err(RootError::ZeroDerivative(_))));
    }

    #[test]
    fn newton_reports_non_convergence() {
        // no real roots; iterates wander
        let res = newton(
            |x: f64| x * x + 1.0,
            |x: f64| 2.0 * x,
            None::<fn(f64) -> f64>,
            0.5,
            1e-14,
            50,
        );
        assert!(matches!(res, Err(RootError::NotConverged { .. })));
    }

    #[test]
    fn newton_rejects_bad_parameters() {
        let f = |x: f64| x;
        let df = |_: f64| 1.0;
        assert!(matches!(
            newton(f, df, None::<fn(f64) -> f64>, 1.0, 0.0, 50),
            Err(RootError::BadEpsilon(_)),
        ));
        assert!(matches!(
            newton(f, df, None::<fn(f64) -> f64>, 1.0, 1e-12, 0),
            Err(RootError::BadMaxiters(0)),
        ));
    }
}
