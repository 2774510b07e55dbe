//! Static one-dimensional potentials for the TDSE.

use ndarray as nd;
use crate::Arr1;

/// A time-independent potential *V*(*x*).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Potential {
    /// *V* = 0
    Free,
    /// *V* = *x*²/2
    Harmonic,
    /// *V* = *a* *x*⁴ - *b* *x*²
    DoubleWell { a: f64, b: f64 },
}

impl Default for Potential {
    fn default() -> Self { Self::Free }
}

impl Potential {
    /// Evaluate the potential at a single point.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::Harmonic => 0.5 * x * x,
            Self::DoubleWell { a, b } => a * x.powi(4) - b * x * x,
        }
    }

    /// Evaluate *dV*/*dx* at a single point.
    pub fn deriv(&self, x: f64) -> f64 {
        match self {
            Self::Free => 0.0,
            Self::Harmonic => x,
            Self::DoubleWell { a, b } => 4.0 * a * x.powi(3) - 2.0 * b * x,
        }
    }

    /// Sample the potential over an array of coordinates.
    pub fn sample<S>(&self, x: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        x.mapv(|xk| self.eval(xk))
    }
}
