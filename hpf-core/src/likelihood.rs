//! Held-out goodness of fit: the average predictive log-likelihood of
//! the validation split under the current variational estimates.

use crate::state::VariationalState;
use rec_data::RatingEntry;

/// How a held-out rating is scored against its expected rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikelihoodMode {
    /// Bernoulli-style probability that the pair was observed at all
    Probability,
    /// Poisson log-likelihood of the observed count
    Count,
}

///
/// Average predictive log-likelihood over the validation split. The
/// expected rate of each entry is `sum_k E[θ_uk] E[β_ik]` read off the
/// current shape/rate statistics.
///
/// Errors on an empty validation slice; averaging over nothing would
/// silently produce NaN.
///
pub fn average_predictive_log_likelihood(
    state: &VariationalState,
    validation: &[RatingEntry],
    mode: LikelihoodMode,
) -> anyhow::Result<f64> {
    use special::Gamma;

    anyhow::ensure!(
        !validation.is_empty(),
        "empty validation split; cannot average the predictive log-likelihood"
    );

    let kk = state.num_factors();
    let user_shp = state.user_weights.shape();
    let user_rte = state.user_weights.rate();
    let item_shp = state.item_weights.shape();
    let item_rte = state.item_weights.rate();

    let mut total = 0.0;
    for entry in validation {
        let (u, i) = (entry.user, entry.item);

        let mut rate = 0.0;
        for k in 0..kk {
            let e_theta = user_shp[(u, k)] / user_rte[(u, k)];
            let e_beta = item_shp[(i, k)] / item_rte[(i, k)];
            rate += e_theta * e_beta;
        }

        let rating = entry.value;
        total += match mode {
            LikelihoodMode::Probability => {
                if rating == 0.0 {
                    -rate
                } else {
                    (1.0 - (-rate).exp()).ln()
                }
            }
            LikelihoodMode::Count => {
                rating * rate.ln() - rate - Gamma::ln_gamma(rating + 1.0).0
            }
        };
    }

    Ok(total / validation.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyper::HpfHyperParameters;
    use approx::assert_abs_diff_eq;

    fn unit_state(kk: usize) -> VariationalState {
        // zero jitter puts every entry exactly at its prior
        let hyper = HpfHyperParameters {
            num_factors: kk,
            ..Default::default()
        };
        VariationalState::new(&hyper, 2, 2, 0, 0.0, 0.0)
    }

    #[test]
    fn empty_validation_is_a_configuration_error() {
        let state = unit_state(2);
        assert!(average_predictive_log_likelihood(&state, &[], LikelihoodMode::Count).is_err());
    }

    #[test]
    fn count_mode_matches_the_poisson_term() {
        let state = unit_state(1);
        // with zero jitter: E[θ] = E[β] = a / a' = 1, so rate = 1
        let validation = vec![RatingEntry {
            user: 0,
            item: 1,
            value: 2.0,
        }];
        let pll =
            average_predictive_log_likelihood(&state, &validation, LikelihoodMode::Count).unwrap();
        // 2 ln(1) - 1 - ln Γ(3) = -1 - ln 2
        assert_abs_diff_eq!(pll, -1.0 - 2.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn probability_mode_handles_both_branches() {
        let state = unit_state(1);

        let zero = vec![RatingEntry {
            user: 0,
            item: 0,
            value: 0.0,
        }];
        let pll = average_predictive_log_likelihood(&state, &zero, LikelihoodMode::Probability)
            .unwrap();
        assert_abs_diff_eq!(pll, -1.0, epsilon = 1e-12);

        let seen = vec![RatingEntry {
            user: 0,
            item: 0,
            value: 1.0,
        }];
        let pll = average_predictive_log_likelihood(&state, &seen, LikelihoodMode::Probability)
            .unwrap();
        assert_abs_diff_eq!(pll, (1.0 - (-1.0_f64).exp()).ln(), epsilon = 1e-12);
    }
}
