use std::process;

use clap::Parser;
use liveclass_ops::cli::LiveclassOps;

#[tokio::main]
async fn main() {
    let app = LiveclassOps::parse();

    if let Err(error) = app.run().await {
        tracing::debug!(?error);
        eprintln!("error: {error:?}");
        process::exit(1)
    }
}
