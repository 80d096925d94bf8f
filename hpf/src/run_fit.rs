use clap::{Args, ValueEnum};
use log::info;

use hpf_core::stopping::ThresholdStoppingCondition;
use hpf_core::{HpfHyperParameters, HpfOptions, HpfTrainer, LikelihoodMode};
use rec_data::split::RatingSplit;
use rec_data::triplets::read_rating_triplets;

#[derive(ValueEnum, Clone, Debug, PartialEq)]
#[clap(rename_all = "lowercase")]
enum LikelihoodArg {
    /// Poisson log-likelihood of the held-out counts
    Count,
    /// Bernoulli-style observation probability
    Probability,
}

#[derive(Args, Debug)]
pub struct FitArgs {
    /// rating triplet file: one `user item value` record per line,
    /// either gzipped or not
    #[arg(required = true)]
    data_file: Box<str>,

    /// output header; writes `{out}.user.parquet` and
    /// `{out}.item.parquet`
    #[arg(long, short, required = true)]
    out: Box<str>,

    /// number of latent factors
    #[arg(long, short = 'k', default_value_t = 30)]
    num_factors: usize,

    /// user weight shape prior `a`
    #[arg(long, default_value_t = 0.3)]
    user_weight_shape: f64,

    /// user activity shape prior `a'`
    #[arg(long, default_value_t = 0.3)]
    user_activity_shape: f64,

    /// user activity rate-prior mean `b'`
    #[arg(long, default_value_t = 1.0)]
    user_activity_mean: f64,

    /// item weight shape prior `c`
    #[arg(long, default_value_t = 0.3)]
    item_weight_shape: f64,

    /// item activity shape prior `c'`
    #[arg(long, default_value_t = 0.3)]
    item_activity_shape: f64,

    /// item activity rate-prior mean `d'`
    #[arg(long, default_value_t = 1.0)]
    item_activity_mean: f64,

    /// fraction of ratings held out for convergence monitoring
    #[arg(long, short = 'f', default_value_t = 0.1)]
    validation_fraction: f64,

    /// random seed for the split and the initialization
    #[arg(long, default_value_t = 42)]
    rseed: u64,

    /// evaluate the held-out likelihood every this many iterations
    #[arg(long, default_value_t = 10)]
    eval_frequency: usize,

    /// maximum uniform jitter added to the shape priors at initialization
    #[arg(long, default_value_t = 1.0)]
    max_offset_shape: f64,

    /// maximum uniform jitter added to the rate priors at initialization
    #[arg(long, default_value_t = 1.0)]
    max_offset_rate: f64,

    /// held-out scoring mode
    #[arg(long, value_enum, default_value = "count")]
    likelihood: LikelihoodArg,

    /// relative-change convergence threshold
    #[arg(long, default_value_t = 1e-6)]
    threshold: f64,

    /// minimum number of iterations
    #[arg(long, default_value_t = 10)]
    min_iter: usize,

    /// maximum number of iterations
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,

    /// verbosity
    #[arg(long, short)]
    verbose: bool,
}

/// Fit an HPF model on a rating triplet file
pub fn run_fit(args: FitArgs) -> anyhow::Result<()> {
    if args.verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let triplets = read_rating_triplets(&args.data_file)?;
    info!("read {} ratings from {}", triplets.len(), &args.data_file);

    let split = RatingSplit::from_triplets(&triplets, args.validation_fraction, args.rseed)?;

    let options = HpfOptions {
        hyper: HpfHyperParameters {
            user_weight_shape: args.user_weight_shape,
            user_activity_shape: args.user_activity_shape,
            user_activity_mean: args.user_activity_mean,
            item_weight_shape: args.item_weight_shape,
            item_activity_shape: args.item_activity_shape,
            item_activity_mean: args.item_activity_mean,
            num_factors: args.num_factors,
        },
        eval_frequency: args.eval_frequency,
        seed: args.rseed,
        max_offset_shape: args.max_offset_shape,
        max_offset_rate: args.max_offset_rate,
        likelihood: match args.likelihood {
            LikelihoodArg::Count => LikelihoodMode::Count,
            LikelihoodArg::Probability => LikelihoodMode::Probability,
        },
    };

    let stopping = ThresholdStoppingCondition {
        threshold: args.threshold,
        min_iterations: args.min_iter,
        max_iterations: args.max_iter,
    };

    let model = HpfTrainer::new(options).fit(&split, &stopping)?;
    model.to_parquet(&args.out)?;

    info!(
        "wrote {} user and {} item factor rows (K = {}) under {}",
        model.num_users(),
        model.num_items(),
        model.num_factors(),
        &args.out
    );

    Ok(())
}
