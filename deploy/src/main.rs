mod command_line;
mod config;
mod contracts;
mod deploy;
mod executor;
mod output;
mod tools;

use anyhow::Result;
use clap::Parser;
use command_line::CommandLine;
use executor::ToolFailure;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cmd = CommandLine::parse();
    if let Err(err) = cmd.execute().await {
        // Exit with the external tool's own status.
        if let Some(failure) = err.downcast_ref::<ToolFailure>() {
            eprintln!("Error: {:?}", err);
            std::process::exit(failure.exit_code());
        }
        return Err(err);
    }
    Ok(())
}
