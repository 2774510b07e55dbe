#![allow(non_snake_case)]

//! Provides fixed-step and reference time integrators and the two models they
//! are compared on: planar three-body gravitational dynamics and the
//! one-dimensional, time-dependent Schrödinger equation (TDSE) discretized on
//! a uniform periodic grid.
//!
//! Provides implementations for the following numerical routines:
//! - Integrators:
//!     - Classical fourth-order Runge-Kutta
//!     - Drift-kick-drift leapfrog (symplectic, time-reversible)
//!     - Adaptive Dormand-Prince 8(5,3) reference via [`ode_solvers`]
//! - Three-body:
//!     - Inverse-square acceleration and total energy
//!     - Euler collinear initial conditions (quintic root via Halley's method)
//!     - Chenciner-Montgomery figure-eight initial conditions
//! - TDSE:
//!     - Real/imaginary leapfrog evolution under a tridiagonal-plus-periodic
//!       Hamiltonian, applied as a dense, sparse, or sliced operator
//!     - Density, position, kinetic, and potential expectation values
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod integrate;
pub mod roots;
pub mod threebody;
pub mod experiment;
pub mod potential;
pub mod hamiltonian;
pub mod timedep;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-14;
pub(crate) const DEF_MAXITERS: usize = 50;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
