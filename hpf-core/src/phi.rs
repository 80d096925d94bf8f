//! Per-observation soft assignment (φ) of each rating's count across
//! the K latent features, accumulated into the next-iteration shape
//! matrices.

use crate::state::VariationalState;
use crate::DVec;

use gamma_param::traits::Inference;
use rec_data::RatingEntry;

///
/// Normalize a vector of unnormalized log-weights in place so that it
/// becomes a probability vector summing to one. The log-sum is
/// accumulated left-to-right with the two-term stable recurrence, so
/// arbitrarily large log-weight magnitudes do not overflow.
///
pub fn log_normalize(phi: &mut DVec) {
    let size = phi.len();
    if size == 1 {
        phi[0] = 1.0;
    }

    if size > 1 {
        let mut logsum = phi[0];
        for i in 1..size {
            let phi_k = phi[i];
            if phi_k < logsum {
                logsum += (1.0 + (phi_k - logsum).exp()).ln();
            } else {
                logsum = phi_k + (1.0 + (logsum - phi_k).exp()).ln();
            }
        }

        for k in 0..size {
            phi[k] = (phi[k] - logsum).exp();
        }
    }
}

///
/// Phase-1 update: for every training entry with a positive value,
/// compute the per-feature log-weights `E[ln θ_uk] + E[ln β_ik]` from
/// the calibrated log-means, normalize them in log space, scale by the
/// rating value when it exceeds one, and add the result into the
/// `*_shape_next` accumulator rows of the entry's user and item.
/// Entries with value <= 0 are unobserved and contribute nothing.
///
/// Precondition: `user_weights` and `item_weights` have been
/// calibrated on the current statistics.
///
pub fn accumulate_soft_counts(state: &mut VariationalState, train: &[RatingEntry]) {
    let VariationalState {
        user_weights,
        item_weights,
        user_shape_next,
        item_shape_next,
        ..
    } = state;

    let user_log_mean = user_weights.posterior_log_mean();
    let item_log_mean = item_weights.posterior_log_mean();

    let kk = user_weights.ncols();
    let mut phi = DVec::zeros(kk);

    for entry in train {
        if entry.value <= 0.0 {
            continue;
        }

        for k in 0..kk {
            phi[k] = user_log_mean[(entry.user, k)] + item_log_mean[(entry.item, k)];
        }
        log_normalize(&mut phi);

        // counts above one act as proportionally larger pseudo-observations;
        // values in (0, 1] are deliberately left unscaled
        if entry.value > 1.0 {
            phi *= entry.value;
        }

        for k in 0..kk {
            user_shape_next[(entry.user, k)] += phi[k];
            item_shape_next[(entry.item, k)] += phi[k];
        }
    }
}
