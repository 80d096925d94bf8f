//! Mean-field variational inference loop for hierarchical Poisson
//! factorization: per-entry soft-count accumulation, closed-form
//! per-user and per-item coordinate updates, and periodic held-out
//! likelihood evaluation feeding the stopping condition.

use crate::hyper::HpfHyperParameters;
use crate::likelihood::{average_predictive_log_likelihood, LikelihoodMode};
use crate::model::HpfModel;
use crate::phi::accumulate_soft_counts;
use crate::state::VariationalState;
use crate::stopping::StoppingCondition;
use crate::DVec;

use anyhow::Context;
use gamma_param::traits::Inference;
use log::{debug, info};
use rec_data::RatingSplit;

/// Options for one HPF training run.
#[derive(Debug, Clone)]
pub struct HpfOptions {
    pub hyper: HpfHyperParameters,
    /// Evaluate the validation likelihood every this many iterations. Default: 10
    pub eval_frequency: usize,
    /// Random seed for initialization. Default: 42
    pub seed: u64,
    /// Maximum uniform jitter added to the shape priors. Default: 1.0
    pub max_offset_shape: f64,
    /// Maximum uniform jitter added to the rate priors. Default: 1.0
    pub max_offset_rate: f64,
    /// Held-out scoring mode. Default: Count
    pub likelihood: LikelihoodMode,
}

impl Default for HpfOptions {
    fn default() -> Self {
        HpfOptions {
            hyper: HpfHyperParameters::default(),
            eval_frequency: 10,
            seed: 42,
            max_offset_shape: 1.0,
            max_offset_rate: 1.0,
            likelihood: LikelihoodMode::Count,
        }
    }
}

impl HpfOptions {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.hyper.validate()?;
        anyhow::ensure!(
            self.eval_frequency >= 1,
            "evaluation frequency should be positive"
        );
        anyhow::ensure!(
            self.max_offset_shape.is_finite() && self.max_offset_shape > 0.0,
            "max shape offset should be positive: {}",
            self.max_offset_shape
        );
        anyhow::ensure!(
            self.max_offset_rate.is_finite() && self.max_offset_rate > 0.0,
            "max rate offset should be positive: {}",
            self.max_offset_rate
        );
        Ok(())
    }
}

/// HPF trainer: owns the options, borrows the split and the stopping
/// policy for the duration of one `fit` call.
pub struct HpfTrainer {
    options: HpfOptions,
}

impl HpfTrainer {
    pub fn new(options: HpfOptions) -> Self {
        HpfTrainer { options }
    }

    pub fn options(&self) -> &HpfOptions {
        &self.options
    }

    ///
    /// Run variational inference to convergence and return the
    /// posterior-mean factor matrices. Deterministic for a fixed seed
    /// and split.
    ///
    pub fn fit(
        &self,
        split: &RatingSplit,
        stopping: &dyn StoppingCondition,
    ) -> anyhow::Result<HpfModel> {
        self.options.validate()?;
        let hyper = &self.options.hyper;

        anyhow::ensure!(!split.train().is_empty(), "empty training split");
        anyhow::ensure!(!split.validation().is_empty(), "empty validation split");

        let num_users = split.num_users();
        let num_items = split.num_items();
        for entry in split.train().iter().chain(split.validation()) {
            anyhow::ensure!(
                entry.user < num_users && entry.item < num_items,
                "rating entry ({}, {}) outside the {} x {} index range",
                entry.user,
                entry.item,
                num_users,
                num_items
            );
        }

        let mut state = VariationalState::new(
            hyper,
            num_users,
            num_items,
            self.options.seed,
            self.options.max_offset_shape,
            self.options.max_offset_rate,
        );
        info!(
            "initialized variational state: {} users x {} items, K = {}",
            state.num_users(),
            state.num_items(),
            state.num_factors()
        );

        let mut controller = stopping.new_loop();
        let mut avg_pll_prev = f64::MAX;
        let mut diff_pll = 1.0;

        while controller.keep_training(diff_pll) {
            let iter = controller.iteration_count();

            // log-means of the current iterates drive the phi update
            state.user_weights.calibrate();
            state.item_weights.calibrate();

            accumulate_soft_counts(&mut state, split.train());
            debug!("iteration {} soft-count accumulation finished", iter);

            update_user_parameters(&mut state, hyper);
            debug!("iteration {} user update finished", iter);

            update_item_parameters(&mut state, hyper);
            debug!("iteration {} item update finished", iter);

            state
                .check_positive()
                .with_context(|| format!("variational state degenerated at iteration {}", iter))?;

            if iter == 1 {
                state.fix_activity_shapes(hyper);
            }

            if iter % self.options.eval_frequency == 0 {
                let avg_pll = average_predictive_log_likelihood(
                    &state,
                    split.validation(),
                    self.options.likelihood,
                )?;
                diff_pll = ((avg_pll - avg_pll_prev) / avg_pll_prev).abs();
                avg_pll_prev = avg_pll;
                info!(
                    "iteration {}: average validation log-likelihood {:.6} (relative change {:.3e})",
                    iter, avg_pll, diff_pll
                );
            }
        }

        info!(
            "training finished after {} iterations",
            controller.iteration_count()
        );

        state.user_weights.calibrate();
        state.item_weights.calibrate();

        Ok(HpfModel {
            user_features: state.user_weights.posterior_mean().clone(),
            item_features: state.item_weights.posterior_mean().clone(),
            user_index: split.user_index().clone(),
            item_index: split.item_index().clone(),
        })
    }
}

///
/// Phase-2 closed-form update. For each user: the new weight shapes
/// come out of the phase-1 accumulator (which is reset to the prior
/// `a`); the new weight rates are the per-feature sums of the *stale*
/// item means plus the user's stale activity mean; the activity rate
/// is then recomputed from the just-updated weights, `a'/b' + sum_k
/// E[θ_uk]`.
///
fn update_user_parameters(state: &mut VariationalState, hyper: &HpfHyperParameters) {
    let kk = hyper.num_factors;
    let num_users = state.num_users();
    let num_items = state.num_items();

    // per-feature sums over the stale item parameters, one pass
    let mut item_weight_sum = DVec::zeros(kk);
    {
        let shp = state.item_weights.shape();
        let rte = state.item_weights.rate();
        for k in 0..kk {
            let mut sum_k = 0.0;
            for i in 0..num_items {
                sum_k += shp[(i, k)] / rte[(i, k)];
            }
            item_weight_sum[k] = sum_k;
        }
    }

    let a = hyper.user_weight_shape;
    let kappa_rate_prior = hyper.user_activity_shape / hyper.user_activity_mean;

    let VariationalState {
        user_weights,
        user_activity,
        user_shape_next,
        ..
    } = state;

    let (gamma_shp, gamma_rte) = user_weights.stats_mut();
    let (kappa_shp, kappa_rte) = user_activity.stats_mut();

    for u in 0..num_users {
        // stale activity mean feeds the weight rates of this user
        let activity_mean = kappa_shp[u] / kappa_rte[u];
        let mut kappa_rte_u = 0.0;

        for k in 0..kk {
            let shp_uk = user_shape_next[(u, k)];
            gamma_shp[(u, k)] = shp_uk;
            user_shape_next[(u, k)] = a;

            let rte_uk = item_weight_sum[k] + activity_mean;
            gamma_rte[(u, k)] = rte_uk;

            kappa_rte_u += shp_uk / rte_uk;
        }

        kappa_rte[u] = kappa_rte_u + kappa_rate_prior;
    }
}

///
/// Phase-3 closed-form update, the mirror image of phase 2; must run
/// strictly after it so the per-feature user sums are taken over the
/// freshly updated user weights.
///
fn update_item_parameters(state: &mut VariationalState, hyper: &HpfHyperParameters) {
    let kk = hyper.num_factors;
    let num_users = state.num_users();
    let num_items = state.num_items();

    let mut user_weight_sum = DVec::zeros(kk);
    {
        let shp = state.user_weights.shape();
        let rte = state.user_weights.rate();
        for k in 0..kk {
            let mut sum_k = 0.0;
            for u in 0..num_users {
                sum_k += shp[(u, k)] / rte[(u, k)];
            }
            user_weight_sum[k] = sum_k;
        }
    }

    let c = hyper.item_weight_shape;
    let tau_rate_prior = hyper.item_activity_shape / hyper.item_activity_mean;

    let VariationalState {
        item_weights,
        item_activity,
        item_shape_next,
        ..
    } = state;

    let (lambda_shp, lambda_rte) = item_weights.stats_mut();
    let (tau_shp, tau_rte) = item_activity.stats_mut();

    for i in 0..num_items {
        let activity_mean = tau_shp[i] / tau_rte[i];
        let mut tau_rte_i = 0.0;

        for k in 0..kk {
            let shp_ik = item_shape_next[(i, k)];
            lambda_shp[(i, k)] = shp_ik;
            item_shape_next[(i, k)] = c;

            let rte_ik = user_weight_sum[k] + activity_mean;
            lambda_rte[(i, k)] = rte_ik;

            tau_rte_i += shp_ik / rte_ik;
        }

        tau_rte[i] = tau_rte_i + tau_rate_prior;
    }
}
