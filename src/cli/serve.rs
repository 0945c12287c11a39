//! `worklog serve` command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::server::Server;
use crate::storage::FileBackend;
use std::sync::Arc;
use tracing::{info, warn};

/// Run the storage endpoint until Ctrl+C.
///
/// # Errors
///
/// Returns an error if the host cannot be resolved or the port cannot be bound.
pub async fn run(config: &Config) -> Result<()> {
    let store = FileBackend::new(config.storage.data_file.clone());
    let addr = config.server.socket_addr().await?;
    let server = Server::bind(addr, Arc::new(store)).await?;

    info!(
        addr = %server.local_addr()?,
        data_file = %config.storage.data_file.display(),
        "storage endpoint listening"
    );
    println!("Server running at http://{}", server.local_addr()?);
    println!("Press Ctrl+C to stop");

    server
        .serve(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
        })
        .await
}
