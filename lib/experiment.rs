//! Drivers that run a three-body initial condition through one of the
//! integrators over a uniform time grid, recording the full trajectory.
//!
//! ```
//! use phasestep::{
//!     experiment::{ run, Method, ThreeBodyConfig },
//!     threebody::{ figure_eight, FIGURE_EIGHT_RATE },
//! };
//!
//! let config = ThreeBodyConfig::default()
//!     .method(Method::Leapfrog)
//!     .w(FIGURE_EIGHT_RATE)
//!     .dt(0.01)
//!     .num_periods(1.0);
//! let traj = run(&config, &figure_eight()).unwrap();
//! assert_eq!(traj.len(), config.num_steps() + 1);
//! assert!(traj.max_relative_energy_error() < 1e-3);
//! ```

use std::{ f64::consts::TAU, str::FromStr };
use ndarray as nd;
use crate::{
    error::ConfigError,
    integrate::{ leapfrog, reference, rk4, Tolerance },
    threebody::{
        derivative,
        energy,
        pack,
        rhs,
        rhs_packed,
        stack,
        unpack,
        InitialCondition,
        ThreeBodyResult,
    },
};

/// Integration scheme used by [`run`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    /// [`leapfrog`]: symplectic, second order.
    Leapfrog,
    /// [`rk4`]: classical fourth-order Runge-Kutta.
    Rk4,
    /// [`reference`]: adaptive Dormand-Prince 8(5,3).
    Reference,
}

impl FromStr for Method {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "leapfrog" | "verlet" => Ok(Self::Leapfrog),
            "rk4" => Ok(Self::Rk4),
            "reference" | "dop853" => Ok(Self::Reference),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

/// Parameters of a single three-body run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ThreeBodyConfig {
    /// Integration scheme.
    pub method: Method,
    /// Angular rate defining one period, `2π / w`.
    pub w: f64,
    /// Fixed output (and, for the fixed-step schemes, integration) time step.
    pub dt: f64,
    /// Total duration in periods.
    pub num_periods: f64,
    /// Negate all velocities at the temporal midpoint.
    pub flip_vel: bool,
    /// Error bounds for [`Method::Reference`].
    pub tol: Tolerance,
}

impl Default for ThreeBodyConfig {
    fn default() -> Self {
        Self {
            method: Method::Leapfrog,
            w: 1.0,
            dt: 1e-3,
            num_periods: 1.0,
            flip_vel: false,
            tol: Tolerance::default(),
        }
    }
}

impl ThreeBodyConfig {
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn w(mut self, w: f64) -> Self {
        self.w = w;
        self
    }

    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    pub fn num_periods(mut self, num_periods: f64) -> Self {
        self.num_periods = num_periods;
        self
    }

    pub fn flip_vel(mut self, flip_vel: bool) -> Self {
        self.flip_vel = flip_vel;
        self
    }

    pub fn tol(mut self, tol: Tolerance) -> Self {
        self.tol = tol;
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        ConfigError::check_angular_rate(self.w)?;
        ConfigError::check_time_step(self.dt)?;
        ConfigError::check_periods(self.num_periods)?;
        if self.method == Method::Reference { self.tol.check()?; }
        Ok(())
    }

    /// Total simulated time, `num_periods · 2π / w`.
    pub fn duration(&self) -> f64 { self.num_periods * TAU / self.w }

    /// Number of steps of size `dt` covering [`Self::duration`].
    pub fn num_steps(&self) -> usize {
        (self.duration() / self.dt).round() as usize
    }

    /// Uniform time grid of `num_steps + 1` points starting at 0.
    pub fn time_grid(&self) -> nd::Array1<f64> {
        nd::Array1::from_shape_fn(self.num_steps() + 1, |k| k as f64 * self.dt)
    }
}

/// Recorded positions, velocities, and energy at every point of a time grid.
///
/// Position and velocity arrays are `steps × 3 × 2`; index 0 holds the initial
/// condition.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Masses
    pub m: [f64; 3],
    /// Times
    pub t: nd::Array1<f64>,
    /// Positions
    pub r: nd::Array3<f64>,
    /// Velocities
    pub v: nd::Array3<f64>,
    /// Total energy
    pub energy: nd::Array1<f64>,
}

impl Trajectory {
    fn new(m: [f64; 3], t: nd::Array1<f64>) -> Self {
        let n = t.len();
        Self {
            m,
            t,
            r: nd::Array3::zeros((n, 3, 2)),
            v: nd::Array3::zeros((n, 3, 2)),
            energy: nd::Array1::zeros(n),
        }
    }

    fn record<S, T>(&mut self, k: usize, r: &crate::Arr2<S>, v: &crate::Arr2<T>)
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        self.r.index_axis_mut(nd::Axis(0), k).assign(r);
        self.v.index_axis_mut(nd::Axis(0), k).assign(v);
        self.energy[k] = energy(r, v, &self.m);
    }

    /// Number of recorded states (steps + 1).
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// Positions and velocities at step `k`.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn state(&self, k: usize) -> (nd::ArrayView2<'_, f64>, nd::ArrayView2<'_, f64>) {
        (
            self.r.index_axis(nd::Axis(0), k),
            self.v.index_axis(nd::Axis(0), k),
        )
    }

    /// `(E(t) - E(0)) / |E(0)|` at every step.
    pub fn relative_energy_error(&self) -> nd::Array1<f64> {
        let e0 = self.energy[0];
        self.energy.mapv(|e| (e - e0) / e0.abs())
    }

    /// `max |E(t) - E(0)| / |E(0)|` over the trajectory.
    pub fn max_relative_energy_error(&self) -> f64 {
        self.relative_energy_error().iter()
            .fold(0.0, |acc, de| acc.max(de.abs()))
    }
}

/// Integrate `ic` according to `config` and record the trajectory.
///
/// If `config.flip_vel` is set, the state at the midpoint index is recorded
/// as-is and its velocities are then negated before integration continues,
/// so that a time-reversible scheme retraces its path back to `ic`.
pub fn run(config: &ThreeBodyConfig, ic: &InitialCondition)
    -> ThreeBodyResult<Trajectory>
{
    config.check()?;
    ConfigError::check_masses(&ic.m)?;
    let n = config.num_steps();
    let mid = n / 2;
    let h = config.dt;
    let m = ic.m;
    log::debug!(
        "three-body run: {:?}, {} steps of {:e}, flip_vel = {}",
        config.method, n, h, config.flip_vel,
    );
    let mut traj = Trajectory::new(m, config.time_grid());
    traj.record(0, &ic.r, &ic.v);

    match config.method {
        Method::Leapfrog => {
            let (mut r, mut v) = (ic.r.clone(), ic.v.clone());
            for k in 0..n {
                if config.flip_vel && k == mid { v.mapv_inplace(|vk| -vk); }
                (r, v) = leapfrog(
                    |part, _t, r, v| derivative(part, r, v, &m),
                    &r, &v, traj.t[k], h,
                );
                traj.record(k + 1, &r, &v);
            }
        },
        Method::Rk4 => {
            let mut y = stack(&ic.r, &ic.v);
            for k in 0..n {
                if config.flip_vel && k == mid {
                    y.index_axis_mut(nd::Axis(0), 1).mapv_inplace(|vk| -vk);
                }
                y = rk4(|_t, y| rhs(y, &m), &y, traj.t[k], h);
                traj.record(
                    k + 1,
                    &y.index_axis(nd::Axis(0), 0),
                    &y.index_axis(nd::Axis(0), 1),
                );
            }
        },
        Method::Reference if n > 0 => {
            let f = |_t: f64, y: &[f64; 12]| rhs_packed(y, &m);
            let y0
                = if config.flip_vel && mid == 0 {
                    pack(&ic.r, &(-&ic.v))
                } else {
                    pack(&ic.r, &ic.v)
                };
            let segments: Vec<(usize, [f64; 12])>
                = if config.flip_vel && mid > 0 {
                    let first = reference(
                        f, y0, &traj.t.slice(nd::s![..=mid]), config.tol)?;
                    let (r_mid, v_mid) = unpack(&first[mid]);
                    let y_mid = pack(&r_mid, &(-v_mid));
                    let second = reference(
                        f, y_mid, &traj.t.slice(nd::s![mid..]), config.tol)?;
                    first.into_iter().enumerate()
                        .chain(second.into_iter().enumerate().skip(1)
                            .map(|(k, y)| (k + mid, y)))
                        .collect()
                } else {
                    reference(f, y0, &traj.t, config.tol)?
                        .into_iter().enumerate()
                        .collect()
                };
            for (k, y) in segments.into_iter().skip(1) {
                let (r, v) = unpack(&y);
                traj.record(k, &r, &v);
            }
        },
        Method::Reference => { },
    }

    if let Some(k) = traj.energy.iter().position(|e| !e.is_finite()) {
        log::warn!(
            "three-body run: energy became non-finite at t = {} (step {}); \
            bodies likely collided",
            traj.t[k], k,
        );
    }
    log::info!(
        "three-body run: {:?} finished; max relative energy error {:e}",
        config.method, traj.max_relative_energy_error(),
    );
    Ok(traj)
}
