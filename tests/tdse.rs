use ndarray as nd;
use phasestep::{
    error::{ ConfigError, WaveError },
    hamiltonian::MatrixMethod,
    potential::Potential,
    timedep::{ run_tdse, Duration, HamiltonianExperiment, TdseConfig },
    utils::Wavepacket,
};

fn max_deviation(a: &HamiltonianExperiment, b: &HamiltonianExperiment) -> f64 {
    let ta = a.trajectory().unwrap();
    let tb = b.trajectory().unwrap();
    assert_eq!(ta.R.shape(), tb.R.shape());
    nd::Zip::from(&ta.R).and(&ta.I)
        .and(&tb.R).and(&tb.I)
        .fold(0.0_f64, |acc, r, i, r0, i0| {
            acc.max((r - r0).abs()).max((i - i0).abs())
        })
}

fn run_all_methods(config: &TdseConfig) -> Vec<HamiltonianExperiment> {
    [MatrixMethod::Dense, MatrixMethod::Sparse, MatrixMethod::Sliced]
        .into_iter()
        .map(|method| run_tdse(&config.method(method)).unwrap())
        .collect()
}

fn oscillator(n: usize, duration: Duration) -> TdseConfig {
    TdseConfig::default()
        .bounds(-10.0, 10.0)
        .n(n)
        .potential(Potential::Harmonic)
        .duration(duration)
        .wavepacket(Wavepacket { sigma: 0.5, x0: -2.0, k0: 0.0 })
}

// ==================================================================================
// Matrix strategies
// ==================================================================================

#[test]
fn matrix_methods_agree() {
    let base = oscillator(200, Duration::Steps(1000)).record_every(100);
    let runs = run_all_methods(&base);
    for exp in runs.iter().skip(1) {
        let diff = max_deviation(exp, &runs[0]);
        assert!(diff < 1e-9, "max deviation {:e}", diff);
    }
}

#[test]
fn matrix_methods_agree_across_periodic_boundary() {
    // a fast packet started near the right edge wraps around to the left
    let config = TdseConfig::default()
        .bounds(-10.0, 10.0)
        .n(200)
        .potential(Potential::Free)
        .duration(Duration::Steps(600))
        .wavepacket(Wavepacket { sigma: 0.5, x0: 5.0, k0: 5.0 })
        .record_every(100);
    let runs = run_all_methods(&config);
    for exp in runs.iter().skip(1) {
        let diff = max_deviation(exp, &runs[0]);
        assert!(diff < 1e-9, "max deviation {:e}", diff);
    }

    let grid = runs[2].grid().unwrap();
    let rho = runs[2].density().unwrap();
    let left_mass = |k: usize| -> f64 {
        nd::Zip::from(rho.row(k)).and(&grid.x)
            .fold(0.0, |acc, rhok, xk| if *xk < 0.0 { acc + rhok * grid.h } else { acc })
    };
    assert!(left_mass(0) < 1e-6);
    assert!(left_mass(rho.nrows() - 1) > 0.3);
}

#[test]
#[ignore = "full-size grid; slow without optimizations"]
fn full_size_free_packet_matrix_methods_agree() {
    let config = TdseConfig::default()
        .bounds(-10.0, 10.0)
        .n(1000)
        .potential(Potential::Free)
        .duration(Duration::Steps(15000))
        .wavepacket(Wavepacket { sigma: 0.5, x0: -5.0, k0: 5.0 })
        .record_every(100);
    let runs = run_all_methods(&config);
    for exp in runs.iter().skip(1) {
        let diff = max_deviation(exp, &runs[0]);
        assert!(diff < 1e-9, "max deviation {:e}", diff);
    }
}

#[test]
fn unknown_matrix_method_is_rejected() {
    assert!(matches!(
        "tridiagonal".parse::<MatrixMethod>(),
        Err(ConfigError::UnknownMatrixMethod(s)) if s == "tridiagonal",
    ));
}

// ==================================================================================
// Observables
// ==================================================================================

#[test]
fn oscillator_norm_is_preserved() {
    let exp = run_tdse(&oscillator(500, Duration::Periods(1.0)).record_every(10)).unwrap();
    let norm = exp.norm().unwrap();
    assert!(norm.len() > 2);
    for (k, nk) in norm.iter().enumerate() {
        assert!((nk - 1.0).abs() < 1e-3, "norm {} at record {}", nk, k);
    }
}

#[test]
fn oscillator_satisfies_virial_theorem() {
    let exp = run_tdse(&oscillator(500, Duration::Periods(1.0)).record_every(10)).unwrap();
    let kin = exp.kinetic_expectation().unwrap();
    let pot = exp.potential_expectation().unwrap();
    let ratio = exp.virial_ratio().unwrap();
    assert!((ratio - 1.0).abs() < 2e-2, "virial ratio {}", ratio);
    assert!((kin / pot - ratio).abs() < 1e-12);
    // displaced packet: E = 1/(8σ²) + 1/2 (σ² + x0²)
    assert!((kin + pot - 2.625).abs() < 5e-2, "energy {}", kin + pot);
}

#[test]
fn oscillator_packet_swings_through_origin() {
    // half a period carries x0 to -x0
    let config = oscillator(500, Duration::Periods(0.5));
    let exp = run_tdse(&config).unwrap();
    let x = exp.position_expectation().unwrap();
    assert!((x[0] + 2.0).abs() < 1e-6);
    assert!((x[x.len() - 1] - 2.0).abs() < 2e-2);
}

#[test]
fn free_packet_moves_at_group_velocity() {
    let packet = Wavepacket { sigma: 0.5, x0: -3.0, k0: 2.0 };
    let mut exp = HamiltonianExperiment::new(Potential::Free);
    exp.set_space_steps(-10.0, 10.0, 500).unwrap();
    let dt = exp.dt().unwrap();
    let steps = (1.0 / dt).round() as usize + 1;
    exp.set_time_steps(steps).unwrap();
    exp.initialize_state(|x| packet.eval(x)).unwrap();
    exp.evolve(MatrixMethod::Sparse).unwrap();
    let t = &exp.trajectory().unwrap().t;
    let x = exp.position_expectation().unwrap();
    let last = x.len() - 1;
    assert!((x[last] - (-3.0 + 2.0 * t[last])).abs() < 2e-2);
}

#[test]
fn energy_is_conserved() {
    let exp = run_tdse(&oscillator(300, Duration::Steps(4000)).record_every(40)).unwrap();
    let e = exp.energy_series().unwrap();
    let e0 = e[0];
    assert!(e.iter().all(|ek| ((ek - e0) / e0).abs() < 1e-2));
}

// ==================================================================================
// Configuration
// ==================================================================================

#[test]
fn periods_before_grid_is_an_error() {
    let mut exp = HamiltonianExperiment::new(Potential::Harmonic);
    assert!(matches!(
        exp.set_periods(1.0),
        Err(WaveError::Config(ConfigError::SpaceStepsUnset)),
    ));
}

#[test]
fn zero_time_steps_is_an_error() {
    let mut exp = HamiltonianExperiment::new(Potential::Harmonic);
    assert!(matches!(
        exp.set_time_steps(0),
        Err(WaveError::Config(ConfigError::BadStepCount)),
    ));
}

#[test]
fn observables_before_evolution_are_an_error() {
    let mut exp = HamiltonianExperiment::new(Potential::Harmonic);
    exp.set_space_steps(-10.0, 10.0, 100).unwrap();
    exp.set_time_steps(10).unwrap();
    exp.initialize_state(|x| Wavepacket::default().eval(x)).unwrap();
    assert!(matches!(
        exp.virial_ratio(),
        Err(WaveError::Config(ConfigError::NotEvolved)),
    ));
}

#[test]
#[ignore = "full-size grid; slow without optimizations"]
fn full_size_oscillator_virial() {
    let config = TdseConfig::default()
        .n(1000)
        .duration(Duration::Periods(2.0))
        .record_every(50);
    let exp = run_tdse(&config).unwrap();
    assert!((exp.virial_ratio().unwrap() - 1.0).abs() < 2e-2);
    let norm = exp.norm().unwrap();
    assert!(norm.iter().all(|nk| (nk - 1.0).abs() < 1e-3));
}
