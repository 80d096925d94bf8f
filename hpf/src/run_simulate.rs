use clap::Args;
use log::info;
use rec_data::simulate::{generate_gamma_poisson_ratings, SimArgs};
use rec_data::triplets::write_rating_triplets;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// number of users
    #[arg(long, short = 'u', default_value_t = 100)]
    users: usize,

    /// number of items
    #[arg(long, short = 'i', default_value_t = 50)]
    items: usize,

    /// number of latent factors
    #[arg(long, short = 'k', default_value_t = 5)]
    factors: usize,

    /// Gamma shape of the latent strengths
    #[arg(long, default_value_t = 0.3)]
    shape: f64,

    /// Gamma scale of the latent strengths
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// random seed
    #[arg(long, default_value_t = 42)]
    rseed: u64,

    /// output rating triplet file (`.gz` recommended)
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Sample a synthetic implicit-count rating file
pub fn run_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let triplets = generate_gamma_poisson_ratings(&SimArgs {
        users: args.users,
        items: args.items,
        factors: args.factors,
        shape: args.shape,
        scale: args.scale,
        rseed: args.rseed,
    })?;

    write_rating_triplets(&triplets, &args.out)?;
    info!("wrote {} ratings to {}", triplets.len(), &args.out);

    Ok(())
}
