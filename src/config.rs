use crate::docker::DEFAULT_DOCKER_HOST;
use crate::projector::{Projector, DEFAULT_PORTAINER_PORT};
use clap::Parser;
use std::net::SocketAddr;

/// Web page listing the running Docker containers.
#[derive(Parser, Debug, Clone)]
#[command(name = "dockviewer", version, about)]
pub struct Config {
    /// Host address used in quick access links and shown in the page header
    #[arg(long, env = "HOST_IP")]
    pub host_ip: Option<String>,

    /// Port of the Portainer web UI used for stack links
    #[arg(long, env = "PORTAINER_PORT", default_value_t = DEFAULT_PORTAINER_PORT)]
    pub portainer_port: u16,

    /// Host of the Portainer web UI, defaults to the host address
    #[arg(long, env = "PORTAINER_URL")]
    pub portainer_url: Option<String>,

    /// Address the web page is served on
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Docker daemon address, unix:///path or tcp://host:port
    #[arg(long, env = "DOCKER_HOST", default_value = DEFAULT_DOCKER_HOST)]
    pub docker_host: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl Config {
    pub fn projector(&self) -> Projector {
        Projector::new(
            non_empty(&self.host_ip),
            non_empty(&self.portainer_url),
            self.portainer_port,
        )
    }
}
