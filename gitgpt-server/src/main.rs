use clap::Parser;
use gitgpt_server::{init_tracing, serve, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();
    init_tracing(config.log_format).map_err(|err| anyhow::anyhow!(err))?;
    serve(config).await
}
