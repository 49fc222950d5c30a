//! Derives the display rows of the container table.
//!
//! Every row is rebuilt from a [`ContainerSnapshot`] on each request. Labels
//! that are missing or malformed fall back to defaults, so projection never
//! fails.

use crate::snapshot::{ContainerSnapshot, HostMapping, PortBinding};
use serde::Serialize;

/// Compose project a container belongs to.
pub const STACK_LABEL: &str = "com.docker.compose.project";
/// Prefix of the per container port scheme override, e.g. `viewer.protocol.443`.
pub const PROTOCOL_LABEL_PREFIX: &str = "viewer.protocol.";
/// Replaces `{scheme}://{host_ip}` in quick access links.
pub const BASEURL_LABEL: &str = "viewer.baseurl";
/// When `"true"`, the base url is used as is without a host port.
pub const OVERRIDE_PORT_LABEL: &str = "viewer.override_dynamic_port";

pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_PORTAINER_PORT: u16 = 9443;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub name: String,
    pub stack: Option<String>,
    pub stack_link: Option<String>,
    pub image: String,
    pub ip_addresses: Vec<String>,
    pub ports: Vec<String>,
    pub links: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Projector {
    host_ip: Option<String>,
    portainer_url: Option<String>,
    portainer_port: u16,
}

impl Projector {
    pub fn new(host_ip: Option<String>, portainer_url: Option<String>, portainer_port: u16) -> Self {
        Self {
            host_ip,
            portainer_url,
            portainer_port,
        }
    }

    pub fn host_ip(&self) -> Option<&str> {
        self.host_ip.as_deref()
    }

    /// One row per container, in the order given.
    pub fn project(&self, containers: &[ContainerSnapshot]) -> Vec<DisplayRow> {
        containers.iter().map(|c| self.project_one(c)).collect()
    }

    fn project_one(&self, container: &ContainerSnapshot) -> DisplayRow {
        let stack = container.labels.get(STACK_LABEL).cloned();
        let stack_link = stack.as_deref().map(|stack| self.stack_link(stack));

        let image = container
            .image
            .tags
            .first()
            .cloned()
            .unwrap_or_else(|| container.image.short_id.clone());

        let ip_addresses = container
            .networks
            .iter()
            .map(|(network, ip)| format!("{network}: {ip}"))
            .collect();

        let mut ports = Vec::new();
        let mut links = Vec::new();
        for (binding, mapping) in published(&container.ports) {
            ports.push(format!(
                "{}->{}/{}",
                mapping.host_port, binding.port, binding.protocol
            ));
            links.push(self.link(container, binding, mapping));
        }

        DisplayRow {
            name: container.name.clone(),
            stack,
            stack_link,
            image,
            ip_addresses,
            ports,
            links,
        }
    }

    fn stack_link(&self, stack: &str) -> String {
        let host = self
            .portainer_url
            .as_deref()
            .or(self.host_ip.as_deref())
            .unwrap_or_default();
        format!(
            "https://{host}:{}/#!/2/docker/stacks/{stack}",
            self.portainer_port
        )
    }

    fn link(&self, container: &ContainerSnapshot, binding: &PortBinding, mapping: &HostMapping) -> String {
        let labels = &container.labels;
        let baseurl = labels
            .get(BASEURL_LABEL)
            .map(|b| b.trim())
            .filter(|b| !b.is_empty());
        if let Some(baseurl) = baseurl {
            let override_port = labels
                .get(OVERRIDE_PORT_LABEL)
                .map_or(false, |v| v.trim().eq_ignore_ascii_case("true"));
            return if override_port {
                baseurl.to_owned()
            } else {
                // `https://host/` would otherwise become `https://host/:8080`
                format!("{}:{}", baseurl.trim_end_matches('/'), mapping.host_port)
            };
        }

        let protocol = labels
            .get(&format!("{PROTOCOL_LABEL_PREFIX}{}", binding.port))
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROTOCOL);
        format!(
            "{protocol}://{}:{}",
            self.host_ip.as_deref().unwrap_or_default(),
            mapping.host_port
        )
    }
}

/// Host mappings that actually carry a host port, in port iteration order.
fn published(ports: &[PortBinding]) -> impl Iterator<Item = (&PortBinding, &HostMapping)> {
    ports.iter().flat_map(|binding| {
        binding
            .mappings
            .iter()
            .filter(|m| !m.host_port.is_empty())
            .map(move |m| (binding, m))
    })
}

/// Distinct stack names for the stack filter, `N/A` standing in for
/// containers outside any stack.
pub fn stack_names(rows: &[DisplayRow]) -> Vec<String> {
    let mut stacks: Vec<String> = rows
        .iter()
        .map(|row| row.stack.clone().unwrap_or_else(|| "N/A".to_owned()))
        .collect();
    stacks.sort();
    stacks.dedup();
    stacks
}
