//! Hierarchical Poisson Factorization (HPF) for implicit-count rating data.
//!
//! Learns latent user/item feature matrices by mean-field variational
//! inference with closed-form coordinate updates, monitoring convergence
//! on the average predictive log-likelihood of a held-out validation
//! split.
//!
//! # Model
//!
//! Gamma-Poisson factorization with per-entity activity hierarchy.
//!
//! # References
//!
//! Gopalan, Hofman & Blei (2013). "Scalable Recommendation with
//! Poisson Factorization." arXiv:1311.1704.

pub mod hyper;
pub mod likelihood;
pub mod model;
pub mod phi;
pub mod state;
pub mod stopping;
pub mod train;

pub use hyper::HpfHyperParameters;
pub use likelihood::LikelihoodMode;
pub use model::HpfModel;
pub use state::VariationalState;
pub use stopping::{
    IterationCountStoppingCondition, StoppingCondition, ThresholdStoppingCondition,
    TrainingLoopController,
};
pub use train::{HpfOptions, HpfTrainer};

/// Dense matrix type shared across the toolkit
pub type Mat = gamma_param::Mat;
/// Dense (column) vector type shared across the toolkit
pub type DVec = gamma_param::DVec;
