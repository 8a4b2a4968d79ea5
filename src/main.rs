use clap::Parser;
use submission_download::cli::{Cli, Verbosity};

fn setup_logging(verbosity: Verbosity) {
    // RUST_LOG wins over --verbosity when set.
    let env = env_logger::Env::default().default_filter_or(verbosity.to_string());
    env_logger::Builder::from_env(env).init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbosity);
    cli.execute()?;
    Ok(())
}
