/*
 * Responsibility
 * - tokio runtime
 * - call boat_api::app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    boat_api::app::run().await
}
