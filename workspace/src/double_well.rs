use std::{ fs, path::PathBuf };
use ndarray_npy::NpzWriter;
use phasestep::{
    hamiltonian::MatrixMethod,
    potential::Potential,
    timedep::{ run_tdse, Duration, TdseConfig },
    utils::Wavepacket,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    // start in the left well and watch it tunnel
    let potential = Potential::DoubleWell { a: 0.05, b: 1.0 };
    let config = TdseConfig::default()
        .n(1000)
        .potential(potential)
        .duration(Duration::Periods(4.0))
        .wavepacket(Wavepacket { sigma: 0.5, x0: -10.0_f64.sqrt(), k0: 0.0 })
        .method(MatrixMethod::Sparse)
        .record_every(50);
    let exp = run_tdse(&config)?;

    let x_avg = exp.position_expectation()?;
    let energy = exp.energy_series()?;
    log::info!(
        "double well: <x> from {:.4} to {:.4}; energy from {:.6} to {:.6}",
        x_avg[0], x_avg[x_avg.len() - 1], energy[0], energy[energy.len() - 1],
    );

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(fs::File::create(outdir.join("double_well.npz"))?);
    let grid = exp.grid().expect("grid set by run_tdse");
    let traj = exp.trajectory().expect("evolved by run_tdse");
    npz.add_array("x", &grid.x)?;
    npz.add_array("v", &exp.potential_curve()?)?;
    npz.add_array("t", &traj.t)?;
    npz.add_array("rho", exp.density()?)?;
    npz.add_array("x_avg", x_avg)?;
    npz.add_array("energy", &energy)?;
    npz.finish()?;
    Ok(())
}
