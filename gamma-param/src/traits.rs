/// A parameter array with two sufficient statistics (shape and rate)
/// seeded by the hyper parameters a0 and b0
pub trait TwoStatParam {
    type Mat;
    type Scalar;

    fn new(dims: (usize, usize), a0: Self::Scalar, b0: Self::Scalar) -> Self;
    fn reset_stat(&mut self);

    /// Gamma parameters must stay strictly positive; a zero or negative
    /// rate would silently turn into NaN downstream.
    fn check_positive(&self) -> anyhow::Result<()>;
}

/// Posterior estimates derived from the sufficient statistics
pub trait Inference {
    type Mat;

    /// Refresh the cached estimates from the current statistics
    fn calibrate(&mut self);

    /// `E[x] = a / b`
    fn posterior_mean(&self) -> &Self::Mat;

    /// `E[ln x] = digamma(a) - ln(b)`
    fn posterior_log_mean(&self) -> &Self::Mat;

    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
}
