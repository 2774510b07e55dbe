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

    // displaced ground state; should swing about the origin without spreading
    let config = TdseConfig::default()
        .bounds(-10.0, 10.0)
        .n(1000)
        .potential(Potential::Harmonic)
        .duration(Duration::Periods(2.0))
        .wavepacket(Wavepacket { sigma: 0.5_f64.sqrt(), x0: -5.0, k0: 0.0 })
        .method(MatrixMethod::Sliced)
        .record_every(20);
    let exp = run_tdse(&config)?;

    let T = exp.kinetic_expectation()?;
    let V = exp.potential_expectation()?;
    log::info!("qho: <T> = {:.6}, <V> = {:.6}, <E> = {:.6}", T, V, T + V);
    log::info!("qho: virial ratio {:.6}", exp.virial_ratio()?);

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(fs::File::create(outdir.join("qho.npz"))?);
    let grid = exp.grid().expect("grid set by run_tdse");
    let traj = exp.trajectory().expect("evolved by run_tdse");
    npz.add_array("x", &grid.x)?;
    npz.add_array("v", &exp.potential_curve()?)?;
    npz.add_array("t", &traj.t)?;
    npz.add_array("rho", exp.density()?)?;
    npz.add_array("x_avg", exp.position_expectation()?)?;
    npz.add_array("kinetic", exp.kinetic_series()?)?;
    npz.add_array("potential", exp.potential_series()?)?;
    npz.add_array("norm", exp.norm()?)?;
    npz.finish()?;
    Ok(())
}
