extern crate special;

use crate::traits::*;
use crate::Mat;

/// A rows x K matrix of independent Gamma variational parameters.
#[derive(Debug, Clone)]
pub struct GammaMatrix {
    num_rows: usize,
    num_columns: usize,
    //////////////////////
    // hyper parameters //
    //////////////////////
    a0: f64,
    b0: f64,
    ///////////////////////////
    // sufficient statistics //
    ///////////////////////////
    shape: Mat,
    rate: Mat,
    //////////////////////////
    // estimated parameters //
    //////////////////////////
    estimated_mean: Mat,
    estimated_log_mean: Mat,
}

impl GammaMatrix {
    pub fn shape(&self) -> &Mat {
        &self.shape
    }

    pub fn rate(&self) -> &Mat {
        &self.rate
    }

    pub fn shape_mut(&mut self) -> &mut Mat {
        &mut self.shape
    }

    pub fn rate_mut(&mut self) -> &mut Mat {
        &mut self.rate
    }

    /// Both statistics at once, for updates that write shape and rate
    /// in the same pass.
    pub fn stats_mut(&mut self) -> (&mut Mat, &mut Mat) {
        (&mut self.shape, &mut self.rate)
    }
}

impl TwoStatParam for GammaMatrix {
    type Mat = Mat;
    type Scalar = f64;

    fn new(dims: (usize, usize), a0: Self::Scalar, b0: Self::Scalar) -> Self {
        Self {
            num_rows: dims.0,
            num_columns: dims.1,
            a0,
            b0,
            shape: Mat::from_element(dims.0, dims.1, a0),
            rate: Mat::from_element(dims.0, dims.1, b0),
            estimated_mean: Mat::zeros(dims.0, dims.1),
            estimated_log_mean: Mat::zeros(dims.0, dims.1),
        }
    }

    fn reset_stat(&mut self) {
        self.shape.fill(self.a0);
        self.rate.fill(self.b0);
    }

    fn check_positive(&self) -> anyhow::Result<()> {
        for &a in self.shape.iter() {
            anyhow::ensure!(a.is_finite() && a > 0.0, "non-positive shape: {}", a);
        }
        for &b in self.rate.iter() {
            anyhow::ensure!(b.is_finite() && b > 0.0, "non-positive rate: {}", b);
        }
        Ok(())
    }
}

impl Inference for GammaMatrix {
    type Mat = Mat;

    fn calibrate(&mut self) {
        use special::Gamma;
        self.estimated_mean = self.shape.zip_map(&self.rate, |a, b| a / b);
        self.estimated_log_mean = self.shape.zip_map(&self.rate, |a, b| a.digamma() - b.ln());
    }

    fn posterior_mean(&self) -> &Self::Mat {
        &self.estimated_mean
    }

    fn posterior_log_mean(&self) -> &Self::Mat {
        &self.estimated_log_mean
    }

    fn nrows(&self) -> usize {
        self.num_rows
    }

    fn ncols(&self) -> usize {
        self.num_columns
    }
}
