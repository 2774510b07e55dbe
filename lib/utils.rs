//! Miscellaneous tools.

use std::f64::consts::{ PI, TAU };
use ndarray::{ self as nd, Ix1, concatenate };
use rustfft as fft;
use num_complex::Complex64 as C64;
use crate::Arr1;

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S>(y: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = f64>
{
    let n: usize = y.len();
    (dx / 2.0) * (y[0] + 2.0 * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Integrate uniformly sampled data using the composite Simpson's rule.
///
/// For an even number of samples (odd number of intervals), the last interval
/// is integrated with the quadratic through the final three samples. Two
/// samples fall back to [`trapz`].
///
/// *Panics if `y` has length less than 2*.
pub fn simpson<S>(y: &nd::ArrayBase<S, Ix1>, dx: f64) -> f64
where S: nd::Data<Elem = f64>
{
    let n: usize = y.len();
    if n == 2 { return trapz(y, dx); }
    let m = if n % 2 == 1 { n } else { n - 1 };
    let inner: f64
        = y.iter().take(m).enumerate()
        .map(|(k, yk)| {
            if k == 0 || k == m - 1 {
                *yk
            } else if k % 2 == 1 {
                4.0 * yk
            } else {
                2.0 * yk
            }
        })
        .sum();
    let mut total = dx / 3.0 * inner;
    if m < n {
        total += dx / 12.0 * (5.0 * y[n - 1] + 8.0 * y[n - 2] - y[n - 3]);
    }
    total
}

/// Differentiate uniformly sampled data with second-order central differences
/// in the interior and first-order one-sided differences at the edges.
///
/// *Panics if `y` has length less than 2*.
pub fn gradient<S>(y: &nd::ArrayBase<S, Ix1>, dx: f64) -> nd::Array1<f64>
where S: nd::Data<Elem = f64>
{
    let n: usize = y.len();
    let mut dy: nd::Array1<f64> = nd::Array1::zeros(n);
    nd::Zip::from(dy.slice_mut(nd::s![1..n - 1]))
        .and(y.slice(nd::s![..n - 2]))
        .and(y.slice(nd::s![2..]))
        .for_each(|dyk, ykm1, ykp1| { *dyk = (ykp1 - ykm1) / (2.0 * dx); });
    dy[0] = (y[1] - y[0]) / dx;
    dy[n - 1] = (y[n - 1] - y[n - 2]) / dx;
    dy
}

/// A Gaussian wavepacket
/// ```text
/// ψ(x) = (2π σ²)^(-1/4) exp(-(x - x0)² / (4 σ²) + i k0 x)
/// ```
/// normalized to unit probability on the real line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Wavepacket {
    /// Position width
    pub sigma: f64,
    /// Center
    pub x0: f64,
    /// Mean wavenumber
    pub k0: f64,
}

impl Default for Wavepacket {
    fn default() -> Self { Self { sigma: 0.5, x0: -5.0, k0: 0.0 } }
}

impl Wavepacket {
    /// Evaluate the wavepacket at a single point.
    pub fn eval(&self, x: f64) -> C64 {
        let amp = (TAU * self.sigma.powi(2)).powf(-0.25);
        let env = (-(x - self.x0).powi(2) / (4.0 * self.sigma.powi(2))).exp();
        amp * env * C64::cis(self.k0 * x)
    }

    /// Sample the wavepacket over an array of coordinates.
    pub fn sample<S>(&self, x: &Arr1<S>) -> nd::Array1<C64>
    where S: nd::Data<Elem = f64>
    {
        x.mapv(|xk| self.eval(xk))
    }
}

/// Generate an array of frequency-space coordinates to accompany a FFT of `n`
/// points for sampling time `dt`.
pub fn fft_freq(n: usize, dt: f64) -> nd::Array1<f64> {
    let np = (n + 1) / 2;
    let fp: nd::Array1<f64>
        = (0..np)
        .map(|k| k as f64 / (n as f64 * dt))
        .collect();
    let fm: nd::Array1<f64>
        = (1..n - np + 1).rev()
        .map(|k| -(k as f64) / (n as f64 * dt))
        .collect();
    concatenate!(nd::Axis(0), fp, fm)
}

/// Perform the one-dimensional, complex-valued FFT.
///
/// *Panics if `x` is not contiguous*.
pub fn fft<S>(x: &nd::ArrayBase<S, Ix1>) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let n: usize = x.len();
    let mut f = x.as_standard_layout().into_owned();
    let mut plan = fft::FftPlanner::new();
    let fft_plan = plan.plan_fft_forward(n);
    fft_plan.process(f.as_slice_mut().expect("standard layout is contiguous"));
    f
}

/// Return a copy of `x` with indices shifted to map super-Nyquist frequency
/// components to negative frequencies.
pub fn fft_shift<S, A>(x: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Clone,
{
    let n = x.len();
    let (p, m) = x.view().split_at(nd::Axis(0), (n + 1) / 2);
    concatenate!(nd::Axis(0), m.into_owned(), p.into_owned())
}

/// Compute the momentum-space probability density |φ(k)|² of a wavefunction
/// sampled on a uniform grid starting at `x0` with spacing `dx`.
///
/// Returns `(k, |φ(k)|²)` with `k` in increasing order; the density integrates
/// to the same value as |ψ(x)|² does in position space.
pub fn momentum_density<S>(q: &nd::ArrayBase<S, Ix1>, x0: f64, dx: f64)
    -> (nd::Array1<f64>, nd::Array1<f64>)
where S: nd::Data<Elem = C64>
{
    let n = q.len();
    let k = fft_freq(n, dx).mapv(|f| TAU * f);
    let scale = dx / (2.0 * PI).sqrt();
    let phi: nd::Array1<f64>
        = nd::Zip::from(&fft(q)).and(&k)
        .map_collect(|phik, kk| (scale * *phik * C64::cis(-kk * x0)).norm_sqr());
    (fft_shift(&k), fft_shift(&phi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn simpson_is_exact_for_cubics() {
        for n in [5_usize, 11, 41] {
            let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 2.0, n);
            let y = x.mapv(|xk| xk.powi(3) - xk + 1.0);
            let dx = x[1] - x[0];
            assert_abs_diff_eq!(simpson(&y, dx), 4.0 - 2.0 + 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn simpson_even_samples_exact_for_quadratics() {
        for n in [4_usize, 6, 40] {
            let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 3.0, n);
            let y = x.mapv(|xk| 2.0 * xk * xk - xk);
            let dx = x[1] - x[0];
            assert_abs_diff_eq!(simpson(&y, dx), 18.0 - 4.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn trapz_is_exact_for_lines() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 7);
        let y = x.mapv(|xk| 3.0 * xk + 1.0);
        assert_abs_diff_eq!(trapz(&y, x[1] - x[0]), 2.5, epsilon = 1e-14);
    }

    #[test]
    fn gradient_of_quadratic() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-1.0, 1.0, 21);
        let dx = x[1] - x[0];
        let dy = gradient(&x.mapv(|xk| xk * xk), dx);
        (1..20).for_each(|k| assert_abs_diff_eq!(dy[k], 2.0 * x[k], epsilon = 1e-12));
    }

    #[test]
    fn wavepacket_is_normalized() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-10.0, 10.0, 1001);
        let dx = x[1] - x[0];
        let packet = Wavepacket { sigma: 0.5, x0: -2.0, k0: 3.0 };
        let rho = packet.sample(&x).mapv(|q| q.norm_sqr());
        assert_abs_diff_eq!(simpson(&rho, dx), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn fft_freq_ordering() {
        assert_eq!(fft_freq(4, 1.0), nd::array![0.0, 0.25, -0.5, -0.25]);
        assert_eq!(fft_freq(5, 1.0), nd::array![0.0, 0.2, 0.4, -0.4, -0.2]);
        assert_eq!(fft_shift(&fft_freq(4, 1.0)), nd::array![-0.5, -0.25, 0.0, 0.25]);
    }

    #[test]
    fn momentum_density_of_gaussian() {
        let x: nd::Array1<f64> = nd::Array1::linspace(-20.0, 20.0, 1024);
        let dx = x[1] - x[0];
        let packet = Wavepacket { sigma: 0.5, x0: 1.0, k0: 4.0 };
        let (k, rho) = momentum_density(&packet.sample(&x), x[0], dx);
        let dk = k[1] - k[0];
        assert_abs_diff_eq!(rho.sum() * dk, 1.0, epsilon = 1e-6);
        let mean = (&k * &rho).sum() * dk;
        assert_abs_diff_eq!(mean, 4.0, epsilon = 1e-6);
    }
}
