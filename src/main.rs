// Entrypoint for the reseed CLI.
// - Keeps `main` small: parse arguments, set up logging, run the pipeline.
// - Errors are printed rather than returned so the pause prompt still shows;
//   the process exits the same way on success and failure.

use biorand_reseed::pipeline::{self, Outcome};
use biorand_reseed::{cli::Args, ui};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "biorand_reseed=debug"
    } else {
        "biorand_reseed=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match pipeline::run(&args.run_options()) {
        Ok(Outcome::Completed {
            seed,
            zip_path,
            entries,
        }) => println!(
            "Seed {seed}: {entries} entries installed from {}",
            zip_path.display()
        ),
        Ok(Outcome::Aborted) => {}
        Err(err) => ui::failure(&format!("{err:#}")),
    }
    println!();

    if !args.no_pause {
        ui::pause();
    }
}
