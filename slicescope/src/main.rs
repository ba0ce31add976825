use clap::Parser as _;
use slicescope::cli::{self, Args};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber; `--debug` raises the default level.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    cli::run(args)
}
