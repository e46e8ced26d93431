use anyhow::Context;
use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use cmd_gateway::routes::RouteTable;
use cmd_gateway::{AppState, Args, Config, logging, server};

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let start_time = Instant::now();

    // parse cli arguments
    let args = Args::parse();
    let log_target = args.log_target();
    logging::init(&log_target, &args.log_level)?;

    let config = Config::try_from(&args)?;
    let route_source = args.route_source()?;
    let routes = RouteTable::load(&route_source)?;

    let addr = format!("{}:{}", config.ip, config.port);
    let listener = tokio::net::TcpListener::bind((config.ip.as_str(), config.port))
        .await
        .with_context(|| format!("couldn't listen on {addr}"))?;

    let allowed_ips: Vec<&str> = config.whitelist.addresses().collect();
    info!(
        timetaken = ?start_time.elapsed(),
        ip = %config.ip,
        port = config.port,
        routes = routes.len(),
        config_location = %route_source,
        allowed_ips = ?allowed_ips,
        log_location = %log_target,
        "Startup finished"
    );
    println!("Listening on {addr}");

    // creating shared state
    let state = Arc::new(AppState::new(config, routes));
    server::serve(listener, state).await?;
    Ok(())
}
