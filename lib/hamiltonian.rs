//! Spatial discretization of the one-dimensional Hamiltonian
//! `H = -½ ∂²/∂x² + V(x)` on a uniform, periodic grid.
//!
//! The discretized operator is tridiagonal plus two wraparound elements:
//! ```text
//! (H q)[i] = a[i] q[i] + b (q[i - 1] + q[i + 1]),  indices mod n
//! a[i] = 1/h² + V(x[i])
//! b    = -1/(2 h²)
//! ```
//! and can be applied to a state in any of three numerically equivalent ways;
//! see [`MatrixMethod`].

use std::str::FromStr;
use ndarray as nd;
use sprs::{ CsMat, TriMat };
use crate::{
    Arr1,
    error::ConfigError,
    potential::Potential,
};

/// Uniform grid of `n` points over `[left, right]`.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveGrid {
    /// Coordinates
    pub x: nd::Array1<f64>,
    /// Spacing, `(right - left) / (n - 1)`
    pub h: f64,
}

impl WaveGrid {
    pub fn new(left: f64, right: f64, n: usize) -> Result<Self, ConfigError> {
        ConfigError::check_grid(left, right, n)?;
        let x: nd::Array1<f64> = nd::Array1::linspace(left, right, n);
        let h = (right - left) / (n - 1) as f64;
        Ok(Self { x, h })
    }

    /// Number of grid points.
    pub fn len(&self) -> usize { self.x.len() }

    pub fn is_empty(&self) -> bool { self.x.is_empty() }

    pub fn left(&self) -> f64 { self.x[0] }

    pub fn right(&self) -> f64 { self.x[self.x.len() - 1] }

    /// Largest time step, `h² / 2`, for which the explicit real/imaginary
    /// leapfrog scheme remains stable for the kinetic term.
    pub fn stable_dt(&self) -> f64 { 0.5 * self.h.powi(2) }
}

/// Diagonal and off-diagonal coefficients of the discretized Hamiltonian.
#[derive(Clone, Debug, PartialEq)]
pub struct Coupling {
    /// Diagonal, `1/h² + V(x[i])`
    pub a: nd::Array1<f64>,
    /// Off-diagonal (including the periodic corners), `-1/(2 h²)`
    pub b: f64,
}

impl Coupling {
    pub fn new(grid: &WaveGrid, potential: &Potential) -> Self {
        let oh2 = grid.h.powi(2).recip();
        let a = grid.x.mapv(|xk| oh2 + potential.eval(xk));
        Self { a, b: -0.5 * oh2 }
    }

    pub fn len(&self) -> usize { self.a.len() }

    pub fn is_empty(&self) -> bool { self.a.is_empty() }

    /// Assemble the full `n×n` matrix.
    pub fn dense(&self) -> nd::Array2<f64> {
        let n = self.a.len();
        let mut A: nd::Array2<f64> = nd::Array2::from_diag(&self.a);
        A.slice_mut(nd::s![1..n, 0..n - 1]).diag_mut().fill(self.b);
        A.slice_mut(nd::s![0..n - 1, 1..n]).diag_mut().fill(self.b);
        A[[0, n - 1]] = self.b;
        A[[n - 1, 0]] = self.b;
        A
    }

    /// Assemble the matrix in compressed sparse row form.
    pub fn sparse(&self) -> CsMat<f64> {
        let n = self.a.len();
        let mut tri: TriMat<f64> = TriMat::with_capacity((n, n), 3 * n);
        for (i, &ai) in self.a.iter().enumerate() {
            tri.add_triplet(i, i, ai);
            tri.add_triplet(i, (i + 1) % n, self.b);
            tri.add_triplet((i + 1) % n, i, self.b);
        }
        tri.to_csr()
    }
}

/// Strategy used to apply the discretized Hamiltonian to a state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatrixMethod {
    /// Dense matrix-vector product.
    Dense,
    /// Sparse (CSR) matrix-vector product.
    Sparse,
    /// Elementwise products with shifted copies of the state.
    Sliced,
}

impl FromStr for MatrixMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            "sliced" | "slice" => Ok(Self::Sliced),
            _ => Err(ConfigError::UnknownMatrixMethod(s.to_string())),
        }
    }
}

/// The discretized Hamiltonian, prepared for repeated application by one
/// [`MatrixMethod`].
#[derive(Clone, Debug)]
pub enum Operator {
    Dense(nd::Array2<f64>),
    Sparse(CsMat<f64>),
    Sliced {
        a: nd::Array1<f64>,
        b: f64,
        // q with one wraparound neighbor padded on either side
        buf: nd::Array1<f64>,
    },
}

impl Operator {
    pub fn new(method: MatrixMethod, coupling: &Coupling) -> Self {
        match method {
            MatrixMethod::Dense => Self::Dense(coupling.dense()),
            MatrixMethod::Sparse => Self::Sparse(coupling.sparse()),
            MatrixMethod::Sliced => Self::Sliced {
                a: coupling.a.clone(),
                b: coupling.b,
                buf: nd::Array1::zeros(coupling.len() + 2),
            },
        }
    }

    pub fn method(&self) -> MatrixMethod {
        match self {
            Self::Dense(_) => MatrixMethod::Dense,
            Self::Sparse(_) => MatrixMethod::Sparse,
            Self::Sliced { .. } => MatrixMethod::Sliced,
        }
    }

    /// Compute `H q`.
    ///
    /// *Panics if `q` does not match the size of the grid*.
    pub fn apply<S>(&mut self, q: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        match self {
            Self::Dense(A) => A.dot(q),
            Self::Sparse(A) => &*A * q,
            Self::Sliced { a, b, buf } => {
                let n = a.len();
                buf.slice_mut(nd::s![1..n + 1]).assign(q);
                buf[0] = q[n - 1];
                buf[n + 1] = q[0];
                let b = *b;
                nd::Zip::from(&*a).and(q)
                    .and(buf.slice(nd::s![..n]))
                    .and(buf.slice(nd::s![2..]))
                    .map_collect(|ai, qi, ql, qr| ai * qi + b * (ql + qr))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn coupling() -> Coupling {
        let grid = WaveGrid::new(-2.0, 2.0, 9).unwrap();
        Coupling::new(&grid, &Potential::Harmonic)
    }

    #[test]
    fn grid_spacing_and_stable_step() {
        let grid = WaveGrid::new(-10.0, 10.0, 1001).unwrap();
        assert_abs_diff_eq!(grid.h, 0.02, epsilon = 1e-15);
        assert_abs_diff_eq!(grid.stable_dt(), 2e-4, epsilon = 1e-15);
        assert_eq!(grid.left(), -10.0);
        assert_eq!(grid.right(), 10.0);
        assert!(matches!(WaveGrid::new(0.0, 1.0, 2), Err(ConfigError::BadGridSize(2))));
        assert!(matches!(WaveGrid::new(1.0, 0.0, 10), Err(ConfigError::BadBounds(..))));
    }

    #[test]
    fn dense_matrix_structure() {
        let c = coupling();
        let A = c.dense();
        let n = c.len();
        assert_eq!(A[[0, 0]], c.a[0]);
        assert_eq!(A[[3, 4]], c.b);
        assert_eq!(A[[4, 3]], c.b);
        assert_eq!(A[[0, n - 1]], c.b);
        assert_eq!(A[[n - 1, 0]], c.b);
        assert_eq!(A[[0, 2]], 0.0);
        assert_eq!(A, A.t());
    }

    #[test]
    fn sparse_matches_dense() {
        let c = coupling();
        assert_eq!(c.sparse().to_dense(), c.dense());
        assert_eq!(c.sparse().nnz(), 3 * c.len());
    }

    #[test]
    fn strategies_agree() {
        let c = coupling();
        let q: nd::Array1<f64> = nd::Array1::from_shape_fn(c.len(), |k| (k as f64).sin());
        let mut ops: Vec<Operator>
            = [MatrixMethod::Dense, MatrixMethod::Sparse, MatrixMethod::Sliced]
            .into_iter()
            .map(|method| Operator::new(method, &c))
            .collect();
        let results: Vec<nd::Array1<f64>> = ops.iter_mut().map(|op| op.apply(&q)).collect();
        for Hq in results.iter().skip(1) {
            nd::Zip::from(Hq).and(&results[0])
                .for_each(|l, r| assert_abs_diff_eq!(l, r, epsilon = 1e-12));
        }
        assert_eq!(ops[2].method(), MatrixMethod::Sliced);
    }

    #[test]
    fn constant_state_sees_only_potential() {
        // the kinetic stencil annihilates constants, including across the
        // periodic boundary
        let c = coupling();
        let grid = WaveGrid::new(-2.0, 2.0, 9).unwrap();
        let mut op = Operator::new(MatrixMethod::Sliced, &c);
        let Hq = op.apply(&nd::Array1::<f64>::ones(c.len()));
        nd::Zip::from(&Hq).and(&grid.x)
            .for_each(|Hqk, xk| assert_abs_diff_eq!(*Hqk, 0.5 * xk * xk, epsilon = 1e-12));
    }

    #[test]
    fn matrix_method_from_str() {
        assert_eq!("dense".parse::<MatrixMethod>().unwrap(), MatrixMethod::Dense);
        assert_eq!("Sparse".parse::<MatrixMethod>().unwrap(), MatrixMethod::Sparse);
        assert_eq!("sliced".parse::<MatrixMethod>().unwrap(), MatrixMethod::Sliced);
        assert!(matches!(
            "banded".parse::<MatrixMethod>(),
            Err(ConfigError::UnknownMatrixMethod(_)),
        ));
    }
}
