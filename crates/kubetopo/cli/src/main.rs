mod args;
mod commands;

use std::process::exit;

use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let args = self::args::Args::parse();
    args.init_logger();

    match args.run().await {
        Ok(()) => (),
        Err(error) => {
            error!("{error}");
            exit(1)
        }
    }
}
