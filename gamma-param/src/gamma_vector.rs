use crate::DVec;

/// A length-n vector of independent Gamma variational parameters,
/// used for the per-entity activity scalars.
#[derive(Debug, Clone)]
pub struct GammaVector {
    a0: f64,
    b0: f64,
    shape: DVec,
    rate: DVec,
}

impl GammaVector {
    pub fn new(len: usize, a0: f64, b0: f64) -> Self {
        Self {
            a0,
            b0,
            shape: DVec::from_element(len, a0),
            rate: DVec::from_element(len, b0),
        }
    }

    pub fn len(&self) -> usize {
        self.shape.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape.len() == 0
    }

    pub fn shape(&self) -> &DVec {
        &self.shape
    }

    pub fn rate(&self) -> &DVec {
        &self.rate
    }

    pub fn shape_mut(&mut self) -> &mut DVec {
        &mut self.shape
    }

    pub fn rate_mut(&mut self) -> &mut DVec {
        &mut self.rate
    }

    /// Both statistics at once, for updates that write shape and rate
    /// in the same pass.
    pub fn stats_mut(&mut self) -> (&mut DVec, &mut DVec) {
        (&mut self.shape, &mut self.rate)
    }

    /// `E[x_i] = a_i / b_i`
    pub fn mean_at(&self, i: usize) -> f64 {
        self.shape[i] / self.rate[i]
    }

    pub fn reset_stat(&mut self) {
        self.shape.fill(self.a0);
        self.rate.fill(self.b0);
    }

    pub fn check_positive(&self) -> anyhow::Result<()> {
        for &a in self.shape.iter() {
            anyhow::ensure!(a.is_finite() && a > 0.0, "non-positive shape: {}", a);
        }
        for &b in self.rate.iter() {
            anyhow::ensure!(b.is_finite() && b > 0.0, "non-positive rate: {}", b);
        }
        Ok(())
    }
}
