//! Relay command - run the WebSocket echo relay until interrupted.

use ridemap::relay::RelayServer;
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the relay command.
pub fn run(port: Option<u16>, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("relay");
    let port = port.unwrap_or(runner.config().relay.port);

    let server = runner
        .runtime()
        .block_on(RelayServer::bind(("0.0.0.0", port)))?;
    let addr = server.local_addr()?;

    println!("Echo relay listening on ws://{}", addr);
    println!("Press Ctrl+C to stop");
    println!();

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping relay...");
        signal.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runner.runtime().block_on(server.run(shutdown))?;

    println!("Relay stopped.");
    Ok(())
}
