//! Time evolution of a wavefunction under the 1+1-dimensional Schrödinger
//! equation (TDSE) for a static potential on a periodic grid.
//!
//! Writing ψ = R + i I, the TDSE i ∂ψ/∂t = H ψ splits into
//! ```text
//! ∂R/∂t =  H I
//! ∂I/∂t = -H R
//! ```
//! which has the form of a separable second-order system with R playing the
//! role of position and I that of velocity. Each time step is therefore a
//! single [`leapfrog`] step, with `H` applied by the chosen [`MatrixMethod`].
//!
//! In all 2D arrays, the first (or zero-th) axis indexes recorded time steps.
//!
//! ```
//! use phasestep::{
//!     hamiltonian::MatrixMethod,
//!     potential::Potential,
//!     timedep::HamiltonianExperiment,
//!     utils::Wavepacket,
//! };
//!
//! let mut exp = HamiltonianExperiment::new(Potential::Harmonic);
//! exp.set_space_steps(-10.0, 10.0, 200).unwrap();
//! exp.set_time_steps(100).unwrap();
//! let packet = Wavepacket { sigma: 0.5, x0: -2.0, k0: 0.0 };
//! exp.initialize_state(|x| packet.eval(x)).unwrap();
//! exp.evolve(MatrixMethod::Sliced).unwrap();
//! let norm = exp.norm().unwrap();
//! assert!(norm.iter().all(|n| (n - 1.0).abs() < 1e-3));
//! ```

use std::{ cell::OnceCell, f64::consts::TAU };
use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    error::{ ConfigError, LengthError, WaveError },
    hamiltonian::{ Coupling, MatrixMethod, Operator, WaveGrid },
    integrate::{ leapfrog, Part },
    potential::Potential,
    utils::{ gradient, momentum_density, simpson, Wavepacket },
};

pub type WaveResult<T> = Result<T, WaveError>;

/// Real and imaginary parts of the wavefunction at every recorded step.
#[derive(Clone, Debug)]
pub struct WaveTrajectory {
    /// Times of the recorded steps
    pub t: nd::Array1<f64>,
    /// Real part, `steps × n`
    pub R: nd::Array2<f64>,
    /// Imaginary part, `steps × n`
    pub I: nd::Array2<f64>,
}

impl WaveTrajectory {
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// The wavefunction at recorded step `k` as a complex array.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn psi(&self, k: usize) -> nd::Array1<C64> {
        nd::Zip::from(self.R.row(k)).and(self.I.row(k))
            .map_collect(|r, i| C64::new(*r, *i))
    }
}

// lazily computed observables, cleared whenever the trajectory changes
#[derive(Clone, Debug, Default)]
struct Cache {
    density: OnceCell<nd::Array2<f64>>,
    norm: OnceCell<nd::Array1<f64>>,
    position: OnceCell<nd::Array1<f64>>,
    kinetic: OnceCell<nd::Array1<f64>>,
    potential: OnceCell<nd::Array1<f64>>,
    virial: OnceCell<nd::Array1<f64>>,
}

/// A single TDSE run: grid, potential, initial state, and recorded
/// trajectory.
///
/// Configuration happens in the order [`Self::set_space_steps`] →
/// ([`Self::set_time_steps`] | [`Self::set_periods`]) →
/// [`Self::initialize_state`] → [`Self::evolve`]; observables are available
/// afterward and are computed on first access.
#[derive(Clone, Debug)]
pub struct HamiltonianExperiment {
    potential: Potential,
    grid: Option<WaveGrid>,
    dt: Option<f64>,
    n_dt: Option<usize>,
    record_every: usize,
    coupling: Option<Coupling>,
    psi0: Option<(nd::Array1<f64>, nd::Array1<f64>)>,
    traj: Option<WaveTrajectory>,
    cache: Cache,
}

impl HamiltonianExperiment {
    pub fn new(potential: Potential) -> Self {
        Self {
            potential,
            grid: None,
            dt: None,
            n_dt: None,
            record_every: 1,
            coupling: None,
            psi0: None,
            traj: None,
            cache: Cache::default(),
        }
    }

    fn reset(&mut self) {
        self.traj = None;
        self.cache = Cache::default();
    }

    pub fn potential(&self) -> Potential { self.potential }

    pub fn grid(&self) -> Option<&WaveGrid> { self.grid.as_ref() }

    pub fn dt(&self) -> Option<f64> { self.dt }

    pub fn n_dt(&self) -> Option<usize> { self.n_dt }

    pub fn trajectory(&self) -> Option<&WaveTrajectory> { self.traj.as_ref() }

    /// Build an `n`-point grid over `[left, right]` and set the time step to
    /// the stability limit `h² / 2`.
    ///
    /// Any previously initialized state is discarded.
    pub fn set_space_steps(&mut self, left: f64, right: f64, n: usize)
        -> WaveResult<()>
    {
        let grid = WaveGrid::new(left, right, n)?;
        self.dt = Some(grid.stable_dt());
        log::debug!(
            "tdse: {} grid points on [{}, {}], h = {:e}, dt = {:e}",
            n, left, right, grid.h, grid.stable_dt(),
        );
        self.grid = Some(grid);
        self.coupling = None;
        self.psi0 = None;
        self.reset();
        Ok(())
    }

    /// Set the number of time steps (including the initial state) directly.
    ///
    /// Fails if `n` is zero.
    pub fn set_time_steps(&mut self, n: usize) -> WaveResult<()> {
        ConfigError::check_step_count(n)?;
        self.n_dt = Some(n);
        self.reset();
        Ok(())
    }

    /// Set the number of time steps to cover `p` periods of a unit-frequency
    /// oscillator, `n = p · 2π / dt`.
    ///
    /// Fails if the grid (and hence `dt`) has not been set.
    pub fn set_periods(&mut self, p: f64) -> WaveResult<()> {
        ConfigError::check_periods(p)?;
        let dt = self.dt.ok_or(ConfigError::SpaceStepsUnset)?;
        self.set_time_steps((p * TAU / dt).round() as usize)
    }

    /// Store only every `k`-th time step (the initial state is always
    /// stored).
    pub fn set_record_every(&mut self, k: usize) -> WaveResult<()> {
        (k > 0).then_some(()).ok_or(ConfigError::BadStride)?;
        self.record_every = k;
        self.reset();
        Ok(())
    }

    /// Build the Hamiltonian coupling for the current grid and potential and
    /// seed the state from a complex wavefunction.
    pub fn initialize_state<F>(&mut self, wavepacket: F) -> WaveResult<()>
    where F: Fn(f64) -> C64
    {
        let grid = self.grid.as_ref().ok_or(ConfigError::SpaceStepsUnset)?;
        let psi = grid.x.mapv(wavepacket);
        let R0 = psi.mapv(|q| q.re);
        let I0 = psi.mapv(|q| q.im);
        self.initialize_state_arrays(R0, I0)
    }

    /// Like [`Self::initialize_state`], but with the real and imaginary parts
    /// of the initial state already sampled on the grid.
    pub fn initialize_state_arrays(
        &mut self,
        R0: nd::Array1<f64>,
        I0: nd::Array1<f64>,
    ) -> WaveResult<()>
    {
        let grid = self.grid.as_ref().ok_or(ConfigError::SpaceStepsUnset)?;
        LengthError::check(&grid.x, &R0)?;
        LengthError::check(&grid.x, &I0)?;
        self.coupling = Some(Coupling::new(grid, &self.potential));
        self.psi0 = Some((R0, I0));
        self.reset();
        Ok(())
    }

    /// Advance the initial state through every time step, applying the
    /// Hamiltonian with `method`.
    pub fn evolve(&mut self, method: MatrixMethod) -> WaveResult<()> {
        let n_dt = self.n_dt.ok_or(ConfigError::TimeStepsUnset)?;
        let dt = self.dt.ok_or(ConfigError::SpaceStepsUnset)?;
        let coupling = self.coupling.as_ref().ok_or(ConfigError::StateUninitialized)?;
        let (R0, I0) = self.psi0.as_ref().ok_or(ConfigError::StateUninitialized)?;
        let stride = self.record_every;
        let n_rec = n_dt.saturating_sub(1) / stride + 1;
        log::debug!(
            "tdse: evolving {} steps with {:?}, recording {}",
            n_dt, method, n_rec,
        );

        let mut op = Operator::new(method, coupling);
        let mut t: nd::Array1<f64> = nd::Array1::zeros(n_rec);
        let mut R: nd::Array2<f64> = nd::Array2::zeros((n_rec, R0.len()));
        let mut I: nd::Array2<f64> = nd::Array2::zeros((n_rec, I0.len()));
        R.row_mut(0).assign(R0);
        I.row_mut(0).assign(I0);
        let mut Rk = R0.clone();
        let mut Ik = I0.clone();
        let mut deriv = |part: Part, _t: f64, R: &nd::Array1<f64>, I: &nd::Array1<f64>| {
            match part {
                Part::Position => op.apply(I),
                Part::Velocity => -op.apply(R),
            }
        };
        for k in 1..n_dt {
            (Rk, Ik) = leapfrog(&mut deriv, &Rk, &Ik, (k - 1) as f64 * dt, dt);
            if k % stride == 0 {
                let j = k / stride;
                t[j] = k as f64 * dt;
                R.row_mut(j).assign(&Rk);
                I.row_mut(j).assign(&Ik);
            }
        }
        self.traj = Some(WaveTrajectory { t, R, I });
        self.cache = Cache::default();
        log::info!("tdse: evolved {} steps with {:?}", n_dt, method);
        Ok(())
    }

    fn require(&self) -> WaveResult<(&WaveGrid, &WaveTrajectory)> {
        let grid = self.grid.as_ref().ok_or(ConfigError::SpaceStepsUnset)?;
        let traj = self.traj.as_ref().ok_or(ConfigError::NotEvolved)?;
        Ok((grid, traj))
    }

    /// The potential sampled on the grid.
    pub fn potential_curve(&self) -> WaveResult<nd::Array1<f64>> {
        let grid = self.grid.as_ref().ok_or(ConfigError::SpaceStepsUnset)?;
        Ok(self.potential.sample(&grid.x))
    }

    /// Probability density `R² + I²` at every recorded step.
    pub fn density(&self) -> WaveResult<&nd::Array2<f64>> {
        let (_, traj) = self.require()?;
        Ok(self.cache.density.get_or_init(|| {
            nd::Zip::from(&traj.R).and(&traj.I)
                .map_collect(|r, i| r * r + i * i)
        }))
    }

    /// `∫ |ψ|² dx` at every recorded step.
    pub fn norm(&self) -> WaveResult<&nd::Array1<f64>> {
        let (grid, _) = self.require()?;
        let rho = self.density()?;
        Ok(self.cache.norm.get_or_init(|| {
            rho.rows().into_iter()
                .map(|rhok| simpson(&rhok, grid.h))
                .collect()
        }))
    }

    /// `⟨x⟩ = ∫ x |ψ|² dx` at every recorded step.
    pub fn position_expectation(&self) -> WaveResult<&nd::Array1<f64>> {
        let (grid, _) = self.require()?;
        let rho = self.density()?;
        Ok(self.cache.position.get_or_init(|| {
            rho.rows().into_iter()
                .map(|rhok| simpson(&(&rhok * &grid.x), grid.h))
                .collect()
        }))
    }

    /// Instantaneous kinetic energy `½ ∫ |∂ψ/∂x|² dx` at every recorded step,
    /// with derivatives taken by finite differences.
    pub fn kinetic_series(&self) -> WaveResult<&nd::Array1<f64>> {
        let (grid, traj) = self.require()?;
        Ok(self.cache.kinetic.get_or_init(|| {
            traj.R.rows().into_iter().zip(traj.I.rows())
                .map(|(Rk, Ik)| {
                    let dR = gradient(&Rk, grid.h);
                    let dI = gradient(&Ik, grid.h);
                    0.5 * simpson(&(&dR * &dR + &dI * &dI), grid.h)
                })
                .collect()
        }))
    }

    /// Instantaneous potential energy `∫ V |ψ|² dx` at every recorded step.
    pub fn potential_series(&self) -> WaveResult<&nd::Array1<f64>> {
        let (grid, _) = self.require()?;
        let rho = self.density()?;
        Ok(self.cache.potential.get_or_init(|| {
            let V = self.potential.sample(&grid.x);
            rho.rows().into_iter()
                .map(|rhok| simpson(&(&rhok * &V), grid.h))
                .collect()
        }))
    }

    /// `⟨T⟩ + ⟨V⟩` at every recorded step.
    pub fn energy_series(&self) -> WaveResult<nd::Array1<f64>> {
        Ok(self.kinetic_series()? + self.potential_series()?)
    }

    // `∫ x V'(x) |ψ|² dx` at every recorded step
    fn virial_series(&self) -> WaveResult<&nd::Array1<f64>> {
        let (grid, _) = self.require()?;
        let rho = self.density()?;
        Ok(self.cache.virial.get_or_init(|| {
            let xdV = grid.x.mapv(|xk| xk * self.potential.deriv(xk));
            rho.rows().into_iter()
                .map(|rhok| simpson(&(&rhok * &xdV), grid.h))
                .collect()
        }))
    }

    // average a per-step series over the recorded steps falling within the
    // first unit-frequency period
    fn period_average<S>(&self, series: &Arr1<S>) -> WaveResult<f64>
    where S: nd::Data<Elem = f64>
    {
        let (_, traj) = self.require()?;
        let m = traj.t.iter().take_while(|tk| **tk < TAU).count().max(1);
        if traj.t[traj.len() - 1] < TAU {
            log::warn!(
                "tdse: trajectory ends at t = {} before one full period; \
                averaging over the whole trajectory",
                traj.t[traj.len() - 1],
            );
        }
        Ok(series.iter().take(m).sum::<f64>() / m as f64)
    }

    /// One-period average of the kinetic energy, `⟨T⟩`.
    pub fn kinetic_expectation(&self) -> WaveResult<f64> {
        self.period_average(self.kinetic_series()?)
    }

    /// One-period average of the potential energy, `⟨V⟩`.
    pub fn potential_expectation(&self) -> WaveResult<f64> {
        self.period_average(self.potential_series()?)
    }

    /// `2⟨T⟩ / ⟨x dV/dx⟩` over one period, which the virial theorem sets to 1.
    ///
    /// For the harmonic potential `⟨x dV/dx⟩ = 2⟨V⟩`, so this is `⟨T⟩ / ⟨V⟩`.
    pub fn virial_ratio(&self) -> WaveResult<f64> {
        let two_t = 2.0 * self.kinetic_expectation()?;
        let xdv = self.period_average(self.virial_series()?)?;
        Ok(two_t / xdv)
    }

    /// Momentum-space density `(k, |φ(k)|²)` at recorded step `k`.
    ///
    /// *Panics if `k` is out of bounds*.
    pub fn momentum_density(&self, k: usize)
        -> WaveResult<(nd::Array1<f64>, nd::Array1<f64>)>
    {
        let (grid, traj) = self.require()?;
        Ok(momentum_density(&traj.psi(k), grid.left(), grid.h))
    }
}

/// Duration of a TDSE run, either as a step count or in periods of a
/// unit-frequency oscillator.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Duration {
    Steps(usize),
    Periods(f64),
}

/// Parameters of a single TDSE run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TdseConfig {
    pub left: f64,
    pub right: f64,
    /// Number of grid points
    pub n: usize,
    pub potential: Potential,
    pub duration: Duration,
    pub wavepacket: Wavepacket,
    pub method: MatrixMethod,
    pub record_every: usize,
}

impl Default for TdseConfig {
    fn default() -> Self {
        Self {
            left: -10.0,
            right: 10.0,
            n: 1000,
            potential: Potential::Harmonic,
            duration: Duration::Periods(1.0),
            wavepacket: Wavepacket::default(),
            method: MatrixMethod::Sliced,
            record_every: 1,
        }
    }
}

impl TdseConfig {
    pub fn bounds(mut self, left: f64, right: f64) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = n;
        self
    }

    pub fn potential(mut self, potential: Potential) -> Self {
        self.potential = potential;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn wavepacket(mut self, wavepacket: Wavepacket) -> Self {
        self.wavepacket = wavepacket;
        self
    }

    pub fn method(mut self, method: MatrixMethod) -> Self {
        self.method = method;
        self
    }

    pub fn record_every(mut self, record_every: usize) -> Self {
        self.record_every = record_every;
        self
    }
}

/// Configure, initialize, and evolve a [`HamiltonianExperiment`] in one call.
pub fn run_tdse(config: &TdseConfig) -> WaveResult<HamiltonianExperiment> {
    let mut exp = HamiltonianExperiment::new(config.potential);
    exp.set_space_steps(config.left, config.right, config.n)?;
    match config.duration {
        Duration::Steps(n) => exp.set_time_steps(n)?,
        Duration::Periods(p) => exp.set_periods(p)?,
    }
    exp.set_record_every(config.record_every)?;
    let packet = config.wavepacket;
    exp.initialize_state(|x| packet.eval(x))?;
    exp.evolve(config.method)?;
    Ok(exp)
}
