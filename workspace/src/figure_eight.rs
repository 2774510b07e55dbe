use std::{ fs, path::PathBuf };
use ndarray_npy::NpzWriter;
use phasestep::{
    experiment::{ run, Method, ThreeBodyConfig },
    threebody::{ figure_eight, FIGURE_EIGHT_RATE },
};

const DT: f64 = 1e-3;
const PERIODS: f64 = 8.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let ic = figure_eight();
    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(fs::File::create(outdir.join("figure_eight.npz"))?);

    for (name, method) in [
        ("leapfrog", Method::Leapfrog),
        ("rk4", Method::Rk4),
        ("reference", Method::Reference),
    ] {
        let config = ThreeBodyConfig::default()
            .method(method)
            .w(FIGURE_EIGHT_RATE)
            .dt(DT)
            .num_periods(PERIODS);
        let traj = run(&config, &ic)?;
        log::info!(
            "{}: max relative energy error {:e}",
            name, traj.max_relative_energy_error(),
        );
        if method == Method::Leapfrog { npz.add_array("t", &traj.t)?; }
        npz.add_array(format!("r_{}", name), &traj.r)?;
        npz.add_array(format!("v_{}", name), &traj.v)?;
        npz.add_array(format!("energy_{}", name), &traj.energy)?;
    }
    npz.finish()?;
    Ok(())
}
