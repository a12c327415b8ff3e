mod cli;

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    // RUST_LOG controls the level; default to WARN.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;

    fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let command_line_interface = cli::CommandLineInterface::load();
    command_line_interface.run()
}
