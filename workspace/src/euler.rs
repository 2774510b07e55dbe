use std::{ fs, path::PathBuf };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use phasestep::{
    experiment::{ run, Method, ThreeBodyConfig },
    threebody::{ euler_collinear, euler_lambda },
};

const MASSES: [f64; 3] = [1.0, 2.0, 3.0];
const RATE: f64 = 1.0;
const DT: f64 = 1e-3;
const PERIODS: f64 = 2.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let lambda = euler_lambda(&MASSES)?;
    let ic = euler_collinear(MASSES, RATE)?;
    log::info!("euler: λ = {}, E = {}", lambda, ic.energy());

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(fs::File::create(outdir.join("euler.npz"))?);
    npz.add_array("m", &nd::arr1(&MASSES))?;

    for (name, method) in [("leapfrog", Method::Leapfrog), ("rk4", Method::Rk4)] {
        // forward then back again; both schemes should land on the start
        let config = ThreeBodyConfig::default()
            .method(method)
            .w(RATE)
            .dt(DT)
            .num_periods(PERIODS)
            .flip_vel(true);
        let traj = run(&config, &ic)?;
        let (r, _) = traj.state(traj.len() - 1);
        let miss = (&r - &ic.r).mapv(f64::abs).fold(0.0_f64, |acc, d| acc.max(*d));
        log::info!("{}: return distance after velocity flip {:e}", name, miss);
        if method == Method::Leapfrog { npz.add_array("t", &traj.t)?; }
        npz.add_array(format!("r_{}", name), &traj.r)?;
        npz.add_array(format!("energy_{}", name), &traj.energy)?;
    }
    npz.finish()?;
    Ok(())
}
