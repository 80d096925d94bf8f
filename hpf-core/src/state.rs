use crate::hyper::HpfHyperParameters;
use crate::Mat;

use gamma_param::traits::*;
use gamma_param::{GammaMatrix, GammaVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mutable variational parameters of one training run.
///
/// Per user: a K-column Gamma weight matrix (γ) and an activity scalar
/// pair (κ); per item the same with λ and τ. The two `*_shape_next`
/// accumulators collect the next iteration's weight shapes while the
/// current ones stay readable, and are re-seeded to the weight shape
/// priors as they are consumed.
#[derive(Debug, Clone)]
pub struct VariationalState {
    pub user_weights: GammaMatrix,
    pub item_weights: GammaMatrix,
    pub user_activity: GammaVector,
    pub item_activity: GammaVector,
    pub user_shape_next: Mat,
    pub item_shape_next: Mat,
}

impl VariationalState {
    ///
    /// Allocate and randomly initialize the state. A single seeded
    /// stream is consumed in a fixed order--for each user in index
    /// order, per feature a shape then a rate draw, then the activity
    /// shape draw; then the same pattern for items--so initialization
    /// is reproducible bit-for-bit for a fixed seed. Activity rates
    /// are not randomized: they start at `shape prior + K`.
    ///
    pub fn new(
        hyper: &HpfHyperParameters,
        num_users: usize,
        num_items: usize,
        seed: u64,
        max_offset_shape: f64,
        max_offset_rate: f64,
    ) -> Self {
        let kk = hyper.num_factors;
        let a = hyper.user_weight_shape;
        let a_prime = hyper.user_activity_shape;
        let c = hyper.item_weight_shape;
        let c_prime = hyper.item_activity_shape;

        let mut user_weights = GammaMatrix::new((num_users, kk), a, a_prime);
        let mut item_weights = GammaMatrix::new((num_items, kk), c, c_prime);
        let mut user_activity = GammaVector::new(num_users, a_prime, a_prime + kk as f64);
        let mut item_activity = GammaVector::new(num_items, c_prime, c_prime + kk as f64);

        let mut rng = StdRng::seed_from_u64(seed);

        {
            let (shp, rte) = user_weights.stats_mut();
            let kappa_shp = user_activity.shape_mut();
            for u in 0..num_users {
                for k in 0..kk {
                    shp[(u, k)] = a + max_offset_shape * rng.random::<f64>();
                    rte[(u, k)] = a_prime + max_offset_rate * rng.random::<f64>();
                }
                kappa_shp[u] = a_prime + max_offset_shape * rng.random::<f64>();
            }
        }

        {
            let (shp, rte) = item_weights.stats_mut();
            let tau_shp = item_activity.shape_mut();
            for i in 0..num_items {
                for k in 0..kk {
                    shp[(i, k)] = c + max_offset_shape * rng.random::<f64>();
                    rte[(i, k)] = c_prime + max_offset_rate * rng.random::<f64>();
                }
                tau_shp[i] = c_prime + max_offset_shape * rng.random::<f64>();
            }
        }

        Self {
            user_weights,
            item_weights,
            user_activity,
            item_activity,
            user_shape_next: Mat::from_element(num_users, kk, a),
            item_shape_next: Mat::from_element(num_items, kk, c),
        }
    }

    /// Pin the activity shapes to their closed-form fixed points
    /// `a' + K a` and `c' + K c`; applied once after the first
    /// iteration, after which only the activity rates evolve.
    pub fn fix_activity_shapes(&mut self, hyper: &HpfHyperParameters) {
        let kk = hyper.num_factors as f64;
        self.user_activity
            .shape_mut()
            .fill(hyper.user_activity_shape + kk * hyper.user_weight_shape);
        self.item_activity
            .shape_mut()
            .fill(hyper.item_activity_shape + kk * hyper.item_weight_shape);
    }

    /// Fatal-invariant guard: every shape and rate must stay strictly
    /// positive and finite throughout training.
    pub fn check_positive(&self) -> anyhow::Result<()> {
        self.user_weights.check_positive()?;
        self.item_weights.check_positive()?;
        self.user_activity.check_positive()?;
        self.item_activity.check_positive()?;
        Ok(())
    }

    pub fn num_users(&self) -> usize {
        self.user_weights.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.item_weights.nrows()
    }

    pub fn num_factors(&self) -> usize {
        self.user_weights.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn toy_hyper(kk: usize) -> HpfHyperParameters {
        HpfHyperParameters {
            num_factors: kk,
            ..Default::default()
        }
    }

    #[test]
    fn initialization_is_deterministic() {
        let hyper = toy_hyper(4);
        let a = VariationalState::new(&hyper, 5, 3, 42, 1.0, 1.0);
        let b = VariationalState::new(&hyper, 5, 3, 42, 1.0, 1.0);

        assert_eq!(a.user_weights.shape(), b.user_weights.shape());
        assert_eq!(a.user_weights.rate(), b.user_weights.rate());
        assert_eq!(a.item_weights.shape(), b.item_weights.shape());
        assert_eq!(a.item_weights.rate(), b.item_weights.rate());
        assert_eq!(a.user_activity.shape(), b.user_activity.shape());
        assert_eq!(a.item_activity.shape(), b.item_activity.shape());

        let c = VariationalState::new(&hyper, 5, 3, 43, 1.0, 1.0);
        assert_ne!(a.user_weights.shape(), c.user_weights.shape());
    }

    #[test]
    fn jitter_stays_within_the_offsets() {
        let hyper = toy_hyper(3);
        let state = VariationalState::new(&hyper, 10, 10, 7, 0.5, 0.25);

        for &x in state.user_weights.shape().iter() {
            assert!(x >= 0.3 && x <= 0.3 + 0.5);
        }
        for &x in state.user_weights.rate().iter() {
            assert!(x >= 0.3 && x <= 0.3 + 0.25);
        }
        // activity rates are deterministic: shape prior + K
        for &x in state.user_activity.rate().iter() {
            assert_abs_diff_eq!(x, 0.3 + 3.0);
        }
        for &x in state.item_activity.rate().iter() {
            assert_abs_diff_eq!(x, 0.3 + 3.0);
        }
        // accumulators start at the weight shape priors
        assert!(state.user_shape_next.iter().all(|&x| x == 0.3));
        assert!(state.item_shape_next.iter().all(|&x| x == 0.3));
    }

    #[test]
    fn activity_shape_fixed_point() {
        let hyper = toy_hyper(4);
        let mut state = VariationalState::new(&hyper, 3, 2, 1, 1.0, 1.0);
        state.fix_activity_shapes(&hyper);

        for &x in state.user_activity.shape().iter() {
            assert_abs_diff_eq!(x, 0.3 + 4.0 * 0.3);
        }
        for &x in state.item_activity.shape().iter() {
            assert_abs_diff_eq!(x, 0.3 + 4.0 * 0.3);
        }
        assert!(state.check_positive().is_ok());
    }
}
