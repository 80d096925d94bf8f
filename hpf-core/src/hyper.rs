/// Hyper-parameters of the hierarchical Poisson factorization model.
///
/// All six prior scalars must be strictly positive and the feature
/// count at least one; `validate` is called before training starts.
#[derive(Debug, Clone, PartialEq)]
pub struct HpfHyperParameters {
    /// Shape prior `a` of the user weights. Default: 0.3
    pub user_weight_shape: f64,
    /// Shape prior `a'` of the user activity. Default: 0.3
    pub user_activity_shape: f64,
    /// Rate-prior mean `b'` of the user activity. Default: 1.0
    pub user_activity_mean: f64,
    /// Shape prior `c` of the item weights. Default: 0.3
    pub item_weight_shape: f64,
    /// Shape prior `c'` of the item activity. Default: 0.3
    pub item_activity_shape: f64,
    /// Rate-prior mean `d'` of the item activity. Default: 1.0
    pub item_activity_mean: f64,
    /// Latent feature dimensionality `K`. Default: 30
    pub num_factors: usize,
}

impl Default for HpfHyperParameters {
    fn default() -> Self {
        HpfHyperParameters {
            user_weight_shape: 0.3,
            user_activity_shape: 0.3,
            user_activity_mean: 1.0,
            item_weight_shape: 0.3,
            item_activity_shape: 0.3,
            item_activity_mean: 1.0,
            num_factors: 30,
        }
    }
}

impl HpfHyperParameters {
    pub fn validate(&self) -> anyhow::Result<()> {
        let priors = [
            ("user weight shape", self.user_weight_shape),
            ("user activity shape", self.user_activity_shape),
            ("user activity mean", self.user_activity_mean),
            ("item weight shape", self.item_weight_shape),
            ("item activity shape", self.item_activity_shape),
            ("item activity mean", self.item_activity_mean),
        ];
        for (name, value) in priors {
            anyhow::ensure!(
                value.is_finite() && value > 0.0,
                "{} prior should be positive: {}",
                name,
                value
            );
        }
        anyhow::ensure!(self.num_factors >= 1, "need at least one latent factor");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(HpfHyperParameters::default().validate().is_ok());
    }

    #[test]
    fn non_positive_priors_are_rejected() {
        let mut hyper = HpfHyperParameters::default();
        hyper.user_activity_mean = 0.0;
        assert!(hyper.validate().is_err());

        let mut hyper = HpfHyperParameters::default();
        hyper.item_weight_shape = -0.3;
        assert!(hyper.validate().is_err());

        let mut hyper = HpfHyperParameters::default();
        hyper.num_factors = 0;
        assert!(hyper.validate().is_err());
    }
}
