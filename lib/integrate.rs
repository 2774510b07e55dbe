//! Single-step time integrators shared by both models.
//!
//! Model parameters (masses, coupling matrices, ...) are captured by the
//! closures passed in, so each integrator has the shape `step(state, t, h) ->
//! state`. The fixed-step integrators work over `ndarray` arrays of any
//! dimension.
//!
//! ```
//! use ndarray as nd;
//! use phasestep::integrate::{ leapfrog, Part };
//!
//! // simple harmonic oscillator: dr/dt = v, dv/dt = -r
//! let sho = |part: Part, _t: f64, r: &nd::Array1<f64>, v: &nd::Array1<f64>| {
//!     match part {
//!         Part::Position => v.clone(),
//!         Part::Velocity => -r,
//!     }
//! };
//! let r0 = nd::array![1.0];
//! let v0 = nd::array![0.0];
//! let (r1, v1) = leapfrog(sho, &r0, &v0, 0.0, 0.01);
//! let (r2, v2) = leapfrog(sho, &r1, &(-&v1), 0.01, 0.01);
//! assert!((r2[0] - r0[0]).abs() < 1e-14);
//! assert!((v2[0] + v0[0]).abs() < 1e-14);
//! ```

use ndarray as nd;
use ode_solvers::{ SVector, System };
use crate::{
    Arr1,
    error::{ ConfigError, RefError },
};

pub type RefResult<T> = Result<T, RefError>;

// perform the operation `a + v * b` succinctly
pub(crate) fn array_step<S, T, D>(
    a: &nd::ArrayBase<S, D>,
    v: f64,
    b: &nd::ArrayBase<T, D>,
) -> nd::Array<f64, D>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
    D: nd::Dimension,
{
    nd::Zip::from(a).and(b)
        .map_collect(|ak, bk| ak + v * bk)
}

/// Take a single classical fourth-order Runge-Kutta step of size `h` from
/// state `y` at time `t`.
///
/// `f(t, y)` must return dy/dt with the same shape as `y`. The step size is
/// never adapted; a step too large for the problem shows up as unbounded growth
/// in the returned state rather than as an error.
pub fn rk4<F, D>(mut f: F, y: &nd::Array<f64, D>, t: f64, h: f64)
    -> nd::Array<f64, D>
where
    F: FnMut(f64, &nd::Array<f64, D>) -> nd::Array<f64, D>,
    D: nd::Dimension,
{
    let k1 = f(t, y);
    let k2 = f(t + h / 2.0, &array_step(y, h / 2.0, &k1));
    let k3 = f(t + h / 2.0, &array_step(y, h / 2.0, &k2));
    let k4 = f(t + h, &array_step(y, h, &k3));
    let mut y1 = y.clone();
    nd::Zip::from(&mut y1).and(&k1).and(&k2).and(&k3).and(&k4)
        .for_each(|yk, k1k, k2k, k3k, k4k| {
            *yk += h / 6.0 * (k1k + 2.0 * (k2k + k3k) + k4k);
        });
    y1
}

/// Selects which half of a second-order system a derivative function should
/// evaluate in [`leapfrog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Part {
    /// dr/dt, the position-like half.
    Position,
    /// dv/dt, the velocity-like half.
    Velocity,
}

/// Take a single leapfrog step of size `h` from `(r0, v0)` at time `t`.
///
/// `f(part, t, r, v)` returns dr/dt for [`Part::Position`] and dv/dt for
/// [`Part::Velocity`]. The step is ordered as a half-step position update with
/// the old velocity, a full-step velocity update at the half-updated position,
/// and a second half-step position update with the new velocity. This makes
/// the map exactly time-reversible: stepping from `(r1, -v1)` returns
/// `(r0, -v0)` up to round-off.
pub fn leapfrog<F, D>(
    mut f: F,
    r0: &nd::Array<f64, D>,
    v0: &nd::Array<f64, D>,
    t: f64,
    h: f64,
) -> (nd::Array<f64, D>, nd::Array<f64, D>)
where
    F: FnMut(Part, f64, &nd::Array<f64, D>, &nd::Array<f64, D>) -> nd::Array<f64, D>,
    D: nd::Dimension,
{
    let dr = f(Part::Position, t, r0, v0);
    let rh = array_step(r0, h / 2.0, &dr);
    let dv = f(Part::Velocity, t + h / 2.0, &rh, v0);
    let v1 = array_step(v0, h, &dv);
    let dr = f(Part::Position, t + h, &rh, &v1);
    let r1 = array_step(&rh, h / 2.0, &dr);
    (r1, v1)
}

/// Absolute and relative error bounds for the [reference integrator][reference].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerance {
    pub abs: f64,
    pub rel: f64,
}

impl Default for Tolerance {
    fn default() -> Self { Self { abs: 1e-12, rel: 1e-12 } }
}

impl Tolerance {
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        ConfigError::check_tolerance(self.abs)?;
        ConfigError::check_tolerance(self.rel)
    }
}

// adapts a plain right-hand side closure to the solver's system interface
struct Rhs<F, const N: usize>(F);

impl<F, const N: usize> System<f64, SVector<f64, N>> for Rhs<F, N>
where F: Fn(f64, &[f64; N]) -> [f64; N]
{
    fn system(&self, t: f64, y: &SVector<f64, N>, dy: &mut SVector<f64, N>) {
        let y: [f64; N] = (*y).into();
        *dy = SVector::from((self.0)(t, &y));
    }
}

/// Integrate `dy/dt = f(t, y)` with the adaptive Dormand-Prince 8(5,3) scheme
/// and return the state sampled at every time in `t`.
///
/// `t` must be uniformly spaced and increasing; the first element of the
/// returned vector is `y0` itself. Internal steps are chosen by the solver to
/// meet `tol`, and samples at the requested times come from its dense output.
pub fn reference<F, S, const N: usize>(
    f: F,
    y0: [f64; N],
    t: &Arr1<S>,
    tol: Tolerance,
) -> RefResult<Vec<[f64; N]>>
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
    S: nd::Data<Elem = f64>,
{
    let n = t.len();
    if n < 2 { return Err(RefError::ShortGrid(n)); }
    let t0 = t[0];
    let dt = t[1] - t[0];
    // run slightly past the last sample so that it is always produced
    let t_end = t[n - 1] + dt / 2.0;
    let mut stepper = ode_solvers::Dop853::new(
        Rhs(f), t0, t_end, dt, SVector::from(y0), tol.rel, tol.abs);
    let stats = stepper.integrate()?;
    log::debug!(
        "reference integrator: {} evaluations, {} accepted / {} rejected steps",
        stats.num_eval, stats.accepted_steps, stats.rejected_steps,
    );

    let t_out = stepper.x_out();
    let y_out = stepper.y_out();
    let mut samples: Vec<[f64; N]> = Vec::with_capacity(n);
    let mut p: usize = 0;
    for &tk in t.iter() {
        while p < t_out.len() && t_out[p] < tk - dt / 2.0 { p += 1; }
        if p < t_out.len() && (t_out[p] - tk).abs() <= dt / 2.0 {
            samples.push(y_out[p].into());
            p += 1;
        } else {
            return Err(RefError::MissingSample(tk));
        }
    }
    samples[0] = y0;
    Ok(samples)
}
