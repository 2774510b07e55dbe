//! Gravitational dynamics of exactly three point masses in the plane.
//!
//! Units are chosen such that the gravitational constant is 1. Positions and
//! velocities of the three bodies are stored as `3×2` arrays whose rows index
//! the bodies; body *i* interacts with its two partners *(i + 1) mod 3* and
//! *(i + 2) mod 3*.
//!
//! Coincident bodies are not guarded against: the force law divides by zero
//! and the resulting non-finite values are returned as-is.

use std::f64::consts::TAU;
use ndarray as nd;
use crate::{
    Arr2,
    error::{ ConfigError, ThreeBodyError },
    integrate::Part,
    roots::{ newton, poly_eval, RootResult },
    DEF_EPSILON,
    DEF_MAXITERS,
};

pub type ThreeBodyResult<T> = Result<T, ThreeBodyError>;

/// Seed for the Newton solve of the Euler quintic.
pub const EULER_SEED: f64 = 0.78;

/// Period of the [figure-eight orbit][figure_eight].
pub const FIGURE_EIGHT_PERIOD: f64 = 6.32591398;

/// Angular rate `2π / T` of the [figure-eight orbit][figure_eight].
pub const FIGURE_EIGHT_RATE: f64 = TAU / FIGURE_EIGHT_PERIOD;

/// A single point mass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    /// Mass
    pub m: f64,
    /// Position
    pub r: [f64; 2],
    /// Velocity
    pub v: [f64; 2],
}

/// Masses, positions, and velocities of a three-body system at a single
/// instant.
#[derive(Clone, Debug, PartialEq)]
pub struct InitialCondition {
    /// Masses
    pub m: [f64; 3],
    /// Positions, `3×2`
    pub r: nd::Array2<f64>,
    /// Velocities, `3×2`
    pub v: nd::Array2<f64>,
}

impl InitialCondition {
    /// Collect three bodies into a single state.
    pub fn from_bodies(bodies: [Body; 3]) -> Self {
        let m = bodies.map(|b| b.m);
        let r = nd::Array2::from_shape_fn((3, 2), |(i, k)| bodies[i].r[k]);
        let v = nd::Array2::from_shape_fn((3, 2), |(i, k)| bodies[i].v[k]);
        Self { m, r, v }
    }

    /// Split the state back into individual bodies.
    pub fn bodies(&self) -> [Body; 3] {
        std::array::from_fn(|i| {
            Body {
                m: self.m[i],
                r: [self.r[[i, 0]], self.r[[i, 1]]],
                v: [self.v[[i, 0]], self.v[[i, 1]]],
            }
        })
    }

    /// Total mechanical energy; see [`energy`].
    pub fn energy(&self) -> f64 { energy(&self.r, &self.v, &self.m) }

    /// Mass-weighted mean position.
    pub fn center_of_mass(&self) -> [f64; 2] {
        let mtot: f64 = self.m.iter().sum();
        let mut com = [0.0; 2];
        self.r.rows().into_iter().zip(&self.m)
            .for_each(|(ri, mi)| {
                com[0] += mi * ri[0] / mtot;
                com[1] += mi * ri[1] / mtot;
            });
        com
    }

    /// Total linear momentum.
    pub fn momentum(&self) -> [f64; 2] {
        let mut p = [0.0; 2];
        self.v.rows().into_iter().zip(&self.m)
            .for_each(|(vi, mi)| {
                p[0] += mi * vi[0];
                p[1] += mi * vi[1];
            });
        p
    }
}

// interaction partners of body `i`
fn partners(i: usize) -> [usize; 2] { [(i + 1) % 3, (i + 2) % 3] }

/// Compute the gravitational acceleration of each body due to the other two.
///
/// ```text
/// a[i] = -m[j] (r[i] - r[j]) / |r[i] - r[j]|³ - m[k] (r[i] - r[k]) / |r[i] - r[k]|³
/// ```
pub fn acceleration<S>(r: &Arr2<S>, m: &[f64; 3]) -> nd::Array2<f64>
where S: nd::Data<Elem = f64>
{
    let mut a: nd::Array2<f64> = nd::Array2::zeros((3, 2));
    for i in 0..3 {
        for j in partners(i) {
            let dx = r[[i, 0]] - r[[j, 0]];
            let dy = r[[i, 1]] - r[[j, 1]];
            let d3 = (dx * dx + dy * dy).sqrt().powi(3);
            a[[i, 0]] -= m[j] * dx / d3;
            a[[i, 1]] -= m[j] * dy / d3;
        }
    }
    a
}

/// Compute the total mechanical energy of the system.
///
/// The potential term walks the cyclic pairs *(i, (i + 1) mod 3)*, which for
/// three bodies visits each unordered pair exactly once.
pub fn energy<S, T>(r: &Arr2<S>, v: &Arr2<T>, m: &[f64; 3]) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let kinetic: f64
        = v.rows().into_iter().zip(m)
        .map(|(vi, mi)| 0.5 * mi * (vi[0].powi(2) + vi[1].powi(2)))
        .sum();
    let potential: f64
        = (0..3)
        .map(|i| {
            let j = (i + 1) % 3;
            let d = (r[[i, 0]] - r[[j, 0]]).hypot(r[[i, 1]] - r[[j, 1]]);
            -m[i] * m[j] / d
        })
        .sum();
    kinetic + potential
}

/// Evaluate one half of the equations of motion for use with
/// [`leapfrog`][crate::integrate::leapfrog].
pub fn derivative(
    part: Part,
    r: &nd::Array2<f64>,
    v: &nd::Array2<f64>,
    m: &[f64; 3],
) -> nd::Array2<f64>
{
    match part {
        Part::Position => v.clone(),
        Part::Velocity => acceleration(r, m),
    }
}

/// Evaluate the first-order equations of motion for a stacked `2×3×2` state
/// whose first axis holds positions then velocities, for use with
/// [`rk4`][crate::integrate::rk4].
pub fn rhs(y: &nd::Array3<f64>, m: &[f64; 3]) -> nd::Array3<f64> {
    let r = y.index_axis(nd::Axis(0), 0);
    let v = y.index_axis(nd::Axis(0), 1);
    let mut dy: nd::Array3<f64> = nd::Array3::zeros(y.raw_dim());
    dy.index_axis_mut(nd::Axis(0), 0).assign(&v);
    dy.index_axis_mut(nd::Axis(0), 1).assign(&acceleration(&r, m));
    dy
}

/// Stack positions and velocities into a `2×3×2` state for [`rhs`].
pub fn stack<S, T>(r: &Arr2<S>, v: &Arr2<T>) -> nd::Array3<f64>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let mut y: nd::Array3<f64> = nd::Array3::zeros((2, 3, 2));
    y.index_axis_mut(nd::Axis(0), 0).assign(r);
    y.index_axis_mut(nd::Axis(0), 1).assign(v);
    y
}

/// Flatten positions and velocities into a fixed-size state for
/// [`reference`][crate::integrate::reference]: six position components
/// followed by six velocity components.
pub fn pack<S, T>(r: &Arr2<S>, v: &Arr2<T>) -> [f64; 12]
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let mut y = [0.0; 12];
    r.iter().chain(v.iter()).zip(y.iter_mut())
        .for_each(|(src, yk)| { *yk = *src; });
    y
}

/// Inverse of [`pack`].
pub fn unpack(y: &[f64; 12]) -> (nd::Array2<f64>, nd::Array2<f64>) {
    let r = nd::Array2::from_shape_fn((3, 2), |(i, k)| y[2 * i + k]);
    let v = nd::Array2::from_shape_fn((3, 2), |(i, k)| y[6 + 2 * i + k]);
    (r, v)
}

/// Evaluate the first-order equations of motion on a [packed][pack] state.
pub fn rhs_packed(y: &[f64; 12], m: &[f64; 3]) -> [f64; 12] {
    let (r, v) = unpack(y);
    pack(&v, &acceleration(&r, m))
}

/// Coefficients of the quintic whose positive root fixes the Euler collinear
/// configuration, ordered from the fifth power down to the constant term.
///
/// ```text
/// (m2 + m3) x⁵ + (2 m2 + 3 m3) x⁴ + (m2 + 3 m3) x³
///     - (3 m1 + m2) x² - (3 m1 + 2 m2) x - (m1 + m2) = 0
/// ```
pub fn euler_quintic(m: &[f64; 3]) -> [f64; 6] {
    let [m1, m2, m3] = *m;
    [
        m2 + m3,
        2.0 * m2 + 3.0 * m3,
        m2 + 3.0 * m3,
        -(3.0 * m1 + m2),
        -(3.0 * m1 + 2.0 * m2),
        -(m1 + m2),
    ]
}

/// Solve the [Euler quintic][euler_quintic] for the distance ratio λ using
/// Halley's method seeded at [`EULER_SEED`].
pub fn euler_lambda(m: &[f64; 3]) -> RootResult<f64> {
    let c = euler_quintic(m);
    newton(
        |x: f64| poly_eval(&c, x).0,
        |x: f64| poly_eval(&c, x).1,
        Some(|x: f64| poly_eval(&c, x).2),
        EULER_SEED,
        DEF_EPSILON,
        DEF_MAXITERS,
    )
}

/// Construct the Euler collinear solution rotating rigidly at angular rate
/// `w`.
///
/// The bodies lie on the x-axis in the order 3, 2, 1, with body 2 a distance
/// *a* from body 3 and λ*a* from body 1, where
/// ```text
/// a³ w² = m2 + m3 - m1 (1 + 2λ) / (λ² (1 + λ)²)
/// ```
/// Positions are taken relative to the center of mass and velocities are
/// those of rigid rotation, *v* = (0, *w* *x*).
pub fn euler_collinear(m: [f64; 3], w: f64)
    -> ThreeBodyResult<InitialCondition>
{
    ConfigError::check_masses(&m)?;
    ConfigError::check_angular_rate(w)?;
    let [m1, m2, m3] = m;
    let lambda = euler_lambda(&m)?;
    let a3w2
        = m2 + m3
        - m1 * (1.0 + 2.0 * lambda)
            / (lambda.powi(2) * (1.0 + lambda).powi(2));
    if !(a3w2 > 0.0) {
        return Err(ConfigError::BadSeparation(a3w2).into());
    }
    let a = (a3w2 / w.powi(2)).cbrt();
    let x = [lambda * a, 0.0, -a];
    let mtot = m1 + m2 + m3;
    let xcm: f64 = x.iter().zip(&m).map(|(xi, mi)| mi * xi).sum::<f64>() / mtot;
    let bodies: [Body; 3]
        = std::array::from_fn(|i| {
            let xi = x[i] - xcm;
            Body { m: m[i], r: [xi, 0.0], v: [0.0, w * xi] }
        });
    Ok(InitialCondition::from_bodies(bodies))
}

/// The Chenciner-Montgomery figure-eight orbit for three unit masses, with
/// period [`FIGURE_EIGHT_PERIOD`].
pub fn figure_eight() -> InitialCondition {
    const R1: [f64; 2] = [0.97000436, -0.24308753];
    const V3: [f64; 2] = [-0.93240737, -0.86473146];
    InitialCondition::from_bodies([
        Body { m: 1.0, r: R1, v: [-V3[0] / 2.0, -V3[1] / 2.0] },
        Body { m: 1.0, r: [-R1[0], -R1[1]], v: [-V3[0] / 2.0, -V3[1] / 2.0] },
        Body { m: 1.0, r: [0.0, 0.0], v: V3 },
    ])
}
