use std::f64::consts::TAU;
use ndarray as nd;
use phasestep::{
    experiment::{ run, Method, ThreeBodyConfig },
    integrate::{ leapfrog, rk4, Part },
    threebody::{
        euler_collinear,
        euler_lambda,
        euler_quintic,
        figure_eight,
        FIGURE_EIGHT_RATE,
    },
    roots::poly_eval,
};

fn max_abs_diff<S, T>(a: &nd::ArrayBase<S, nd::Ix2>, b: &nd::ArrayBase<T, nd::Ix2>) -> f64
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    nd::Zip::from(a).and(b).fold(0.0_f64, |acc, ak, bk| acc.max((ak - bk).abs()))
}

// ==================================================================================
// Integrators on the harmonic oscillator
// ==================================================================================

const SHO_STEP: f64 = 0.1;
const SHO_STEPS: usize = 1000;

#[test]
fn leapfrog_retraces_oscillator() {
    let sho = |part: Part, _t: f64, r: &nd::Array1<f64>, v: &nd::Array1<f64>| {
        match part {
            Part::Position => v.clone(),
            Part::Velocity => -r,
        }
    };
    let r0 = nd::array![1.0];
    let v0 = nd::array![0.0];
    let (mut r, mut v) = (r0.clone(), v0.clone());
    for k in 0..SHO_STEPS {
        (r, v) = leapfrog(sho, &r, &v, k as f64 * SHO_STEP, SHO_STEP);
    }
    v.mapv_inplace(|vk| -vk);
    for k in 0..SHO_STEPS {
        (r, v) = leapfrog(sho, &r, &v, k as f64 * SHO_STEP, SHO_STEP);
    }
    assert!((r[0] - r0[0]).abs() < 1e-10);
    assert!((v[0] + v0[0]).abs() < 1e-10);
}

#[test]
fn rk4_does_not_retrace_oscillator() {
    let sho = |_t: f64, y: &nd::Array1<f64>| nd::array![y[1], -y[0]];
    let y0 = nd::array![1.0, 0.0];
    let mut y = y0.clone();
    for k in 0..SHO_STEPS {
        y = rk4(sho, &y, k as f64 * SHO_STEP, SHO_STEP);
    }
    y[1] = -y[1];
    for k in 0..SHO_STEPS {
        y = rk4(sho, &y, k as f64 * SHO_STEP, SHO_STEP);
    }
    let miss = (y[0] - y0[0]).abs().max((y[1] + y0[1]).abs());
    assert!(miss > 1e-8);
    assert!(miss < 1e-3);
}

// ==================================================================================
// Energy behavior
// ==================================================================================

#[test]
fn leapfrog_energy_error_stays_bounded() {
    let config = ThreeBodyConfig::default()
        .method(Method::Leapfrog)
        .w(FIGURE_EIGHT_RATE)
        .dt(0.01)
        .num_periods(8.0);
    let traj = run(&config, &figure_eight()).unwrap();
    let err = traj.relative_energy_error().mapv(f64::abs);
    let half = err.len() / 2;
    let first = err.slice(nd::s![..half]).fold(0.0_f64, |acc, e| acc.max(*e));
    let second = err.slice(nd::s![half..]).fold(0.0_f64, |acc, e| acc.max(*e));
    assert!(traj.max_relative_energy_error() < 1e-3);
    assert!(second < 3.0 * first);
}

// mean energy over each of `periods` equal chunks of the trajectory
fn period_means(energy: &nd::Array1<f64>, periods: usize) -> Vec<f64> {
    let chunk = (energy.len() - 1) / periods;
    (0..periods)
        .map(|p| energy.slice(nd::s![p * chunk..(p + 1) * chunk]).mean().unwrap())
        .collect()
}

#[test]
fn rk4_energy_drifts_downward() {
    let ic = figure_eight();
    let config = ThreeBodyConfig::default()
        .method(Method::Rk4)
        .w(FIGURE_EIGHT_RATE)
        .dt(0.05)
        .num_periods(8.0);
    let traj = run(&config, &ic).unwrap();
    let means = period_means(&traj.energy, 8);
    assert!(means[7] < means[0], "period-averaged energies {:?}", means);
    assert!(means[4..].iter().sum::<f64>() < means[..4].iter().sum::<f64>());
    assert!(traj.energy[traj.len() - 1] < ic.energy());
}

#[test]
fn reference_conserves_energy() {
    let config = ThreeBodyConfig::default()
        .method(Method::Reference)
        .w(FIGURE_EIGHT_RATE)
        .dt(0.01)
        .num_periods(2.0);
    let traj = run(&config, &figure_eight()).unwrap();
    assert!(traj.max_relative_energy_error() < 1e-9);
}

// ==================================================================================
// Initial conditions
// ==================================================================================

#[test]
fn euler_quintic_root_for_unequal_masses() {
    let m = [1.0, 2.0, 3.0];
    let lambda = euler_lambda(&m).unwrap();
    assert!(lambda > 0.0);
    assert!(poly_eval(&euler_quintic(&m), lambda).0.abs() < 1e-10);
}

#[test]
fn euler_collinear_returns_after_one_period() {
    let ic = euler_collinear([1.0, 2.0, 3.0], 1.0).unwrap();
    let config = ThreeBodyConfig::default()
        .method(Method::Rk4)
        .w(1.0)
        .dt(TAU / 6000.0)
        .num_periods(1.0);
    let traj = run(&config, &ic).unwrap();
    assert_eq!(traj.len(), 6001);
    let (r, v) = traj.state(traj.len() - 1);
    assert!(max_abs_diff(&r, &ic.r) < 1e-3);
    assert!(max_abs_diff(&v, &ic.v) < 1e-3);
}

#[test]
fn velocity_flip_returns_to_start() {
    let ic = figure_eight();
    for (method, tol) in [
        (Method::Leapfrog, 1e-10),
        (Method::Rk4, 1e-8),
        (Method::Reference, 1e-9),
    ] {
        let config = ThreeBodyConfig::default()
            .method(method)
            .w(1.0)
            .dt(TAU / 1000.0)
            .num_periods(1.0)
            .flip_vel(true);
        let traj = run(&config, &ic).unwrap();
        assert_eq!(traj.len(), 1001);
        // the midpoint record holds the state before its velocities flip
        let (_, v_mid) = traj.state(500);
        let (_, v_next) = traj.state(501);
        assert!(max_abs_diff(&v_mid, &(-&v_next)) < 0.1, "{:?}", method);
        let (r, v) = traj.state(1000);
        let dr = max_abs_diff(&r, &ic.r);
        let dv = max_abs_diff(&(-&v), &ic.v);
        assert!(dr < tol && dv < tol, "{:?}: dr = {:e}, dv = {:e}", method, dr, dv);
    }
}
