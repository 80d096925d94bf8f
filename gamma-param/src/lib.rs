//! Gamma-distributed variational parameters over dense matrices and
//! vectors: shape/rate sufficient statistics with cached posterior mean
//! and digamma-based posterior log-mean estimates.

pub mod gamma_matrix;
pub mod gamma_vector;
pub mod io;
pub mod traits;

pub use gamma_matrix::GammaMatrix;
pub use gamma_vector::GammaVector;

/// Dense matrix type shared across the toolkit
pub type Mat = nalgebra::DMatrix<f64>;
/// Dense (column) vector type shared across the toolkit
pub type DVec = nalgebra::DVector<f64>;
