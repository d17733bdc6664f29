use clap::Parser;
use rollcall_lib::bootstrap::tracing::init_tracing_subscriber;
use rollcall_lib::bootstrap::AppPaths;
use rollcall_lib::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::resolve()?;

    if let Err(err) = init_tracing_subscriber(Some(&paths.logs_dir)) {
        eprintln!("Failed to initialize tracing: {err}");
    }

    cli::run(cli, &paths).await
}
