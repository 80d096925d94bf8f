mod run_fit;
mod run_simulate;

use run_fit::*;
use run_simulate::*;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HPF",
    long_about = "Hierarchical Poisson Factorization for implicit-feedback recommendation.\n\
		  Rating files are plain `user item value` triplets,\n\
		  either gzipped or not."
)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Simulate implicit-count rating data",
        long_about = "Sample rating triplets from a factored Gamma-Poisson model\n\
		      and write them as a `user item value` file."
    )]
    Simulate(SimulateArgs),

    #[command(
        about = "Fit an HPF model by variational inference",
        long_about = "Estimate latent user/item factor matrices in three stages:\n\
		      (1) Randomly split the ratings into training and validation\n\
		      (2) Run mean-field coordinate updates until the held-out\n\
		          likelihood stops improving\n\
		      (3) Write the posterior-mean factor matrices.\n"
    )]
    Fit(FitArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.commands {
        Commands::Simulate(args) => {
            run_simulate(args)?;
        }
        Commands::Fit(args) => {
            run_fit(args)?;
        }
    }

    Ok(())
}
