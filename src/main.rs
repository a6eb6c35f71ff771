use std::process;

use clap::Parser;
use tracing::error;

use mc_bundler_lib::cli::{self, Args};

#[tokio::main]
async fn main() {
    mc_bundler_lib::init_tracing();
    tracing::info!("mc-bundler starting...");

    let exit_code = match cli::run(Args::parse()).await {
        Ok(_) => 0,
        Err(e) => {
            error!("Bundle failed: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
