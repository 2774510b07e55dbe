//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! Division by zero in the gravitational force law (two coincident bodies) is
//! deliberately *not* an error: it produces non-finite values that propagate
//! through the remainder of a trajectory.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ode_solvers::dop_shared::IntegrationError;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when an experiment is configured inconsistently.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Returned when a matrix-application strategy name is not recognized.
    #[error("unknown matrix method {0:?}; expected one of \"dense\", \"sparse\", \"sliced\"")]
    UnknownMatrixMethod(String),

    /// Returned when an integration method name is not recognized.
    #[error("unknown integration method {0:?}; expected one of \"leapfrog\", \"rk4\", \"reference\"")]
    UnknownMethod(String),

    /// Returned when a step count is requested in periods before the spatial
    /// grid (and hence the time step) has been defined.
    #[error("space steps must be set before the number of periods")]
    SpaceStepsUnset,

    /// Returned when evolution is requested without a step count.
    #[error("time steps must be set before evolution")]
    TimeStepsUnset,

    /// Returned when evolution is requested before an initial state exists.
    #[error("state must be initialized before evolution")]
    StateUninitialized,

    /// Returned when observables are requested before evolution.
    #[error("state must be evolved before computing observables")]
    NotEvolved,

    /// Returned when a spatial grid has too few points.
    #[error("spatial grids require at least 3 points; got {0}")]
    BadGridSize(usize),

    /// Returned when spatial grid bounds are empty or reversed.
    #[error("spatial grid bounds must satisfy left < right; got [{0}, {1}]")]
    BadBounds(f64, f64),

    /// Returned when a non-positive (or non-finite) time step is encountered.
    #[error("time steps must be finite and greater than 0; got {0}")]
    BadTimeStep(f64),

    /// Returned when a non-positive number of periods is encountered.
    #[error("number of periods must be finite and greater than 0; got {0}")]
    BadPeriods(f64),

    /// Returned when a non-positive angular rate is encountered.
    #[error("angular rate must be finite and greater than 0; got {0}")]
    BadAngularRate(f64),

    /// Returned when a non-positive error tolerance is encountered.
    #[error("error tolerances must be greater than 0; got {0}")]
    BadTolerance(f64),

    /// Returned when a run is asked to hold no states at all.
    #[error("number of time steps must be greater than 0")]
    BadStepCount,

    /// Returned when a recording stride of zero is encountered.
    #[error("recording stride must be greater than 0")]
    BadStride,

    /// Returned when a non-positive (or non-finite) mass is encountered.
    #[error("masses must be finite and greater than 0; got {0}")]
    BadMass(f64),

    /// Returned when the Euler collinear separation has no real, positive
    /// solution for the given masses.
    #[error("no positive collinear separation exists for these masses; got a³w² = {0}")]
    BadSeparation(f64),
}

impl ConfigError {
    pub(crate) fn check_time_step(dt: f64) -> Result<(), Self> {
        (dt.is_finite() && dt > 0.0).then_some(()).ok_or(Self::BadTimeStep(dt))
    }

    pub(crate) fn check_step_count(n: usize) -> Result<(), Self> {
        (n > 0).then_some(()).ok_or(Self::BadStepCount)
    }

    pub(crate) fn check_periods(p: f64) -> Result<(), Self> {
        (p.is_finite() && p > 0.0).then_some(()).ok_or(Self::BadPeriods(p))
    }

    pub(crate) fn check_angular_rate(w: f64) -> Result<(), Self> {
        (w.is_finite() && w > 0.0).then_some(()).ok_or(Self::BadAngularRate(w))
    }

    pub(crate) fn check_masses(m: &[f64]) -> Result<(), Self> {
        m.iter()
            .find(|mk| !(mk.is_finite() && **mk > 0.0))
            .map_or(Ok(()), |mk| Err(Self::BadMass(*mk)))
    }

    pub(crate) fn check_tolerance(tol: f64) -> Result<(), Self> {
        (tol > 0.0).then_some(()).ok_or(Self::BadTolerance(tol))
    }

    pub(crate) fn check_grid(left: f64, right: f64, n: usize)
        -> Result<(), Self>
    {
        (n >= 3).then_some(()).ok_or(Self::BadGridSize(n))?;
        (left < right).then_some(()).ok_or(Self::BadBounds(left, right))
    }
}

/// Returned from functions in [`roots`][crate::roots].
#[derive(Debug, Error)]
pub enum RootError {
    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when the first derivative vanishes at an iterate.
    #[error("derivative vanished at x = {0}")]
    ZeroDerivative(f64),

    /// Returned when the iteration fails to settle within the allowed number
    /// of iterations.
    #[error("root not found after {iters} iterations; last iterate x = {x}")]
    NotConverged { x: f64, iters: usize },
}

impl RootError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }
}

/// Returned from the [reference integrator][crate::integrate::reference].
#[derive(Debug, Error)]
pub enum RefError {
    /// Returned when the time grid has fewer than two points.
    #[error("reference integration requires at least 2 output times; got {0}")]
    ShortGrid(usize),

    /// Returned when the dense output of the solver does not include one of
    /// the requested output times.
    #[error("reference integrator produced no sample at t = {0}")]
    MissingSample(f64),

    /// [`IntegrationError`]
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// Returned from three-body experiment drivers.
#[derive(Debug, Error)]
pub enum ThreeBodyError {
    /// [`ConfigError`]
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// [`RootError`]
    #[error("root error: {0}")]
    Root(#[from] RootError),

    /// [`RefError`]
    #[error("reference integrator error: {0}")]
    Reference(#[from] RefError),
}

/// Returned from TDSE experiment drivers.
#[derive(Debug, Error)]
pub enum WaveError {
    /// [`ConfigError`]
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),
}
