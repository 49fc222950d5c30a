//! Typed view of a running container, decoupled from the Engine API wire
//! format.

use crate::container::{Container, ContainerFilters};
use crate::docker::Docker;
use crate::errors::Result;
use crate::image::{short_id, SummaryImage};
use std::collections::HashMap;

/// Image a container runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub tags: Vec<String>,
    pub short_id: String,
}

/// One host side binding of a published port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMapping {
    pub host_ip: String,
    pub host_port: String,
}

/// A container port (`80/tcp`) and where it is published on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    pub port: u16,
    pub protocol: String,
    pub mappings: Vec<HostMapping>,
}

impl PortBinding {
    /// Port specifier such as `80/tcp`.
    pub fn spec(&self) -> String {
        format!("{}/{}", self.port, self.protocol)
    }

    /// Parse a port specifier such as `80/tcp`.
    ///
    /// A missing protocol means `tcp`. Returns `None` when the port number
    /// does not parse.
    pub fn from_spec(spec: &str, mappings: Vec<HostMapping>) -> Option<Self> {
        let (port, protocol) = spec.split_once('/').unwrap_or((spec, "tcp"));
        Some(Self {
            port: port.trim().parse().ok()?,
            protocol: protocol.to_owned(),
            mappings,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub id: String,
    pub name: String,
    pub image: ImageRef,
    pub labels: HashMap<String, String>,
    /// network name and assigned address, ordered by network name
    pub networks: Vec<(String, String)>,
    pub ports: Vec<PortBinding>,
}

impl ContainerSnapshot {
    /// Build a snapshot from a `/containers/json` entry.
    ///
    /// `images` resolves the container's image id to its tags.
    pub fn from_summary(container: Container, images: &HashMap<String, Vec<String>>) -> Self {
        let image_id = if container.ImageID.is_empty() {
            &container.Image
        } else {
            &container.ImageID
        };
        let image = ImageRef {
            tags: images.get(image_id).cloned().unwrap_or_default(),
            short_id: short_id(image_id),
        };

        let networks = container
            .NetworkSettings
            .as_ref()
            .map(|settings| {
                settings
                    .Networks
                    .iter()
                    .map(|(name, net)| (name.clone(), net.IPAddress.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let mut ports: Vec<PortBinding> = Vec::new();
        for port in &container.Ports {
            let idx = match ports
                .iter()
                .position(|b| b.port == port.PrivatePort && b.protocol == port.Type)
            {
                Some(idx) => idx,
                None => {
                    ports.push(PortBinding {
                        port: port.PrivatePort,
                        protocol: port.Type.clone(),
                        mappings: Vec::new(),
                    });
                    ports.len() - 1
                }
            };
            if let Some(public) = port.PublicPort {
                ports[idx].mappings.push(HostMapping {
                    host_ip: port.IP.clone().unwrap_or_default(),
                    host_port: public.to_string(),
                });
            }
        }

        // the daemon lists ports in map order; sort by `80/tcp` style key,
        // the order `docker inspect` reports them in. Mapping order is kept.
        ports.sort_by_cached_key(|b| b.spec());

        Self {
            name: container.name().to_owned(),
            id: container.Id,
            image,
            labels: container.Labels,
            networks,
            ports,
        }
    }
}

/// Something that can list the running containers.
#[async_trait::async_trait]
pub trait ContainerSource {
    async fn running_containers(&self) -> Result<Vec<ContainerSnapshot>>;
}

/// Index image tags by image id.
pub fn tags_by_image_id(images: Vec<SummaryImage>) -> HashMap<String, Vec<String>> {
    images
        .into_iter()
        .map(|image| {
            // untagged images report `<none>:<none>`
            let tags = image
                .RepoTags
                .into_iter()
                .filter(|tag| tag != "<none>:<none>")
                .collect();
            (image.Id, tags)
        })
        .collect()
}

#[async_trait::async_trait]
impl ContainerSource for Docker {
    async fn running_containers(&self) -> Result<Vec<ContainerSnapshot>> {
        let mut filters = ContainerFilters::new();
        filters.status("running");
        let containers = self.list_containers(Some(false), &filters).await?;
        let images = tags_by_image_id(self.images(false).await?);
        log::debug!(
            "{} running containers, {} images",
            containers.len(),
            images.len()
        );
        Ok(containers
            .into_iter()
            .map(|c| ContainerSnapshot::from_summary(c, &images))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_spec_parses_protocol() {
        let binding = PortBinding::from_spec("53/udp", vec![]).unwrap();
        assert_eq!(binding.port, 53);
        assert_eq!(binding.protocol, "udp");

        let binding = PortBinding::from_spec("8080", vec![]).unwrap();
        assert_eq!(binding.protocol, "tcp");

        assert!(PortBinding::from_spec("http/tcp", vec![]).is_none());
    }

    #[test]
    fn untagged_images_have_no_tags() {
        let images: Vec<SummaryImage> = serde_json::from_str(
            r#"[{"Id":"sha256:aa","RepoTags":["<none>:<none>"]},{"Id":"sha256:bb","RepoTags":null}]"#,
        )
        .unwrap();
        let tags = tags_by_image_id(images);
        assert!(tags["sha256:aa"].is_empty());
        assert!(tags["sha256:bb"].is_empty());
    }

    #[test]
    fn port_order_does_not_depend_on_listing_order() {
        let listing = |ports: &str| -> Container {
            serde_json::from_str(&format!(
                r#"{{"Id":"c1","Names":["/web"],"Image":"nginx","Ports":{ports}}}"#
            ))
            .unwrap()
        };
        let first = listing(
            r#"[{"IP":"0.0.0.0","PrivatePort":8443,"PublicPort":9443,"Type":"tcp"},
                {"IP":"0.0.0.0","PrivatePort":80,"PublicPort":8081,"Type":"tcp"},
                {"IP":"0.0.0.0","PrivatePort":53,"PublicPort":5353,"Type":"udp"},
                {"IP":"::","PrivatePort":80,"PublicPort":8081,"Type":"tcp"}]"#,
        );
        let second = listing(
            r#"[{"IP":"0.0.0.0","PrivatePort":80,"PublicPort":8081,"Type":"tcp"},
                {"IP":"0.0.0.0","PrivatePort":53,"PublicPort":5353,"Type":"udp"},
                {"IP":"::","PrivatePort":80,"PublicPort":8081,"Type":"tcp"},
                {"IP":"0.0.0.0","PrivatePort":8443,"PublicPort":9443,"Type":"tcp"}]"#,
        );

        let images = HashMap::new();
        let first = ContainerSnapshot::from_summary(first, &images);
        let second = ContainerSnapshot::from_summary(second, &images);
        assert_eq!(first.ports, second.ports);

        // string order of the specifier, as `docker inspect` reports it
        let specs: Vec<String> = first.ports.iter().map(PortBinding::spec).collect();
        assert_eq!(specs, vec!["53/udp", "80/tcp", "8443/tcp"]);
        let hosts: Vec<&str> = first.ports[1]
            .mappings
            .iter()
            .map(|m| m.host_ip.as_str())
            .collect();
        assert_eq!(hosts, vec!["0.0.0.0", "::"]);
    }

    #[test]
    fn ports_group_by_container_port() {
        let container: Container = serde_json::from_str(
            r#"{
                "Id": "c1",
                "Names": ["/web1"],
                "Image": "nginx:latest",
                "ImageID": "sha256:1111111111aaaa",
                "Ports": [
                    {"IP": "0.0.0.0", "PrivatePort": 80, "PublicPort": 8081, "Type": "tcp"},
                    {"PrivatePort": 443, "Type": "tcp"},
                    {"IP": "::", "PrivatePort": 80, "PublicPort": 8081, "Type": "tcp"}
                ],
                "Labels": {"com.docker.compose.project": "blog"},
                "NetworkSettings": {"Networks": {"z_net": {"IPAddress": "172.18.0.2"}, "a_net": {"IPAddress": "10.0.0.2"}}}
            }"#,
        )
        .unwrap();
        let images = HashMap::from([(
            "sha256:1111111111aaaa".to_owned(),
            vec!["nginx:latest".to_owned()],
        )]);

        let snapshot = ContainerSnapshot::from_summary(container, &images);
        assert_eq!(snapshot.name, "web1");
        assert_eq!(snapshot.image.tags, vec!["nginx:latest"]);
        assert_eq!(snapshot.image.short_id, "sha256:1111111111");
        assert_eq!(
            snapshot.networks,
            vec![
                ("a_net".to_owned(), "10.0.0.2".to_owned()),
                ("z_net".to_owned(), "172.18.0.2".to_owned())
            ]
        );
        assert_eq!(snapshot.ports.len(), 2);
        assert_eq!(snapshot.ports[0].port, 443);
        assert!(snapshot.ports[0].mappings.is_empty());
        assert_eq!(snapshot.ports[1].port, 80);
        assert_eq!(
            snapshot.ports[1].mappings,
            vec![
                HostMapping {
                    host_ip: "0.0.0.0".to_owned(),
                    host_port: "8081".to_owned()
                },
                HostMapping {
                    host_ip: "::".to_owned(),
                    host_port: "8081".to_owned()
                },
            ]
        );
    }
}
