use crate::triplets::RawTriplet;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Gamma, Poisson};

/// Knobs for the Gamma-Poisson rating simulator.
pub struct SimArgs {
    pub users: usize,
    pub items: usize,
    pub factors: usize,
    /// Gamma shape of the latent strengths. Default: 0.3
    pub shape: f64,
    /// Gamma scale of the latent strengths. Default: 1.0
    pub scale: f64,
    pub rseed: u64,
}

impl Default for SimArgs {
    fn default() -> Self {
        SimArgs {
            users: 100,
            items: 50,
            factors: 5,
            shape: 0.3,
            scale: 1.0,
            rseed: 42,
        }
    }
}

///
/// Generate implicit-count rating triplets from a factored Gamma-Poisson
/// model:
///
/// ```text
/// theta(u,k) ~ Gamma(shape, scale)
/// beta(i,k)  ~ Gamma(shape, scale)
/// Y(u,i)     ~ Poisson( sum_k theta(u,k) * beta(i,k) )
/// ```
///
/// Zero counts are omitted (implicit-feedback convention). Output is
/// deterministic for a fixed `rseed`.
///
pub fn generate_gamma_poisson_ratings(args: &SimArgs) -> anyhow::Result<Vec<RawTriplet>> {
    anyhow::ensure!(args.users > 0, "need at least one user");
    anyhow::ensure!(args.items > 0, "need at least one item");
    anyhow::ensure!(args.factors > 0, "need at least one factor");

    let mut rng = StdRng::seed_from_u64(args.rseed);
    let rgamma = Gamma::new(args.shape, args.scale)?;

    let kk = args.factors;

    let theta: Vec<Vec<f64>> = (0..args.users)
        .map(|_| (0..kk).map(|_| rgamma.sample(&mut rng)).collect())
        .collect();
    let beta: Vec<Vec<f64>> = (0..args.items)
        .map(|_| (0..kk).map(|_| rgamma.sample(&mut rng)).collect())
        .collect();

    let mut triplets = vec![];
    for (u, theta_u) in theta.iter().enumerate() {
        for (i, beta_i) in beta.iter().enumerate() {
            let rate: f64 = theta_u.iter().zip(beta_i.iter()).map(|(t, b)| t * b).sum();
            if let Ok(rpois) = Poisson::new(rate) {
                let y_ui: f64 = rpois.sample(&mut rng);
                if y_ui > 0.0 {
                    triplets.push((u as u64, i as u64, y_ui));
                }
            }
        }
    }

    info!(
        "sampled Poisson ratings with {} non-zero counts out of {} pairs",
        triplets.len(),
        args.users * args.items
    );

    Ok(triplets)
}
