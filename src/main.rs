use clap::Parser;
use windfarm_processor::cli::{run, Cli};
use windfarm_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
