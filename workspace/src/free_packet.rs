use std::{ fs, path::PathBuf, time::Instant };
use ndarray_npy::NpzWriter;
use phasestep::{
    hamiltonian::MatrixMethod,
    potential::Potential,
    timedep::{ run_tdse, Duration, TdseConfig },
    utils::Wavepacket,
};

const STEPS: usize = 5000;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    let base = TdseConfig::default()
        .potential(Potential::Free)
        .duration(Duration::Steps(STEPS))
        .wavepacket(Wavepacket { sigma: 0.5, x0: -5.0, k0: 5.0 })
        .record_every(50);

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)?;
    let mut npz = NpzWriter::new(fs::File::create(outdir.join("free_packet.npz"))?);

    for method in [MatrixMethod::Sliced, MatrixMethod::Sparse, MatrixMethod::Dense] {
        let t0 = Instant::now();
        let exp = run_tdse(&base.method(method))?;
        log::info!("{:?}: {:.3} s for {} steps", method, t0.elapsed().as_secs_f64(), STEPS);
        if method == MatrixMethod::Sliced {
            let grid = exp.grid().expect("grid set by run_tdse");
            let traj = exp.trajectory().expect("evolved by run_tdse");
            npz.add_array("x", &grid.x)?;
            npz.add_array("t", &traj.t)?;
            npz.add_array("rho", exp.density()?)?;
            npz.add_array("x_avg", exp.position_expectation()?)?;
            npz.add_array("norm", exp.norm()?)?;
            let (k, phi) = exp.momentum_density(0)?;
            npz.add_array("k", &k)?;
            npz.add_array("phi", &phi)?;
        }
    }
    npz.finish()?;
    Ok(())
}
