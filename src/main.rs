use anyhow::{Context, Result};
use clap::Parser;
use dockviewer::server::{self, App};
use dockviewer::{Config, Docker};
use log::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let level = if config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    let docker = Docker::connect(&config.docker_host)
        .with_context(|| format!("could not connect to {}", config.docker_host))?;
    // the page reports daemon failures per request, so only warn here
    match docker.ping().await {
        Ok(()) => info!("connected to docker daemon at {}", config.docker_host),
        Err(err) => warn!("docker daemon at {} not reachable: {err}", config.docker_host),
    }

    let projector = config.projector();
    info!(
        "host ip: {}, portainer port: {}",
        projector.host_ip().unwrap_or("unset"),
        config.portainer_port
    );

    let app = App::new(docker, projector)?;
    server::serve(app, config.listen, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutting down");
        }
    })
    .await?;
    Ok(())
}
