use crate::container::{Container, ContainerFilters};
use crate::errors::*;
use crate::http_client::{HaveHttpClient, HttpClient};
use crate::hyper_client::HyperClient;
use crate::image::SummaryImage;
use http::{HeaderMap, Response};
use log::*;
use serde::de::DeserializeOwned;

/// The default `DOCKER_HOST` address that we will try to connect to.
#[cfg(unix)]
pub static DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

/// The default `DOCKER_HOST` address that we will try to connect to.
///
/// Windows pipes are not supported, the TCP port is still available.
#[cfg(windows)]
pub static DEFAULT_DOCKER_HOST: &str = "tcp://localhost:2375";

/// protocol connect to docker daemon
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub enum Protocol {
    /// unix domain socket
    Unix,
    /// tcp/ip (BSD like socket)
    Tcp,
}

/// Handle to connection to the docker daemon
#[derive(Debug, Clone)]
pub struct Docker {
    /// http client
    client: HyperClient,
    /// connection protocol
    protocol: Protocol,
}

/// Deserialize from json string
fn api_result<D: DeserializeOwned>(res: Response<Vec<u8>>) -> Result<D> {
    if res.status().is_success() {
        Ok(serde_json::from_slice::<D>(res.body())?)
    } else {
        Err(serde_json::from_slice::<DockerError>(res.body())?.into())
    }
}

impl Docker {
    fn new(client: HyperClient, protocol: Protocol) -> Self {
        Self { client, protocol }
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Connect to the Docker daemon at `host`
    ///
    /// `host` takes the same form as `DOCKER_HOST`: `unix:///path/to/socket`
    /// or `tcp://host:port`. TLS is not supported.
    pub fn connect(host: &str) -> Result<Docker> {
        if host.starts_with("unix://") {
            Docker::connect_with_unix(host)
        } else if host.starts_with("tcp://") || host.starts_with("http://") {
            Docker::connect_with_http(host)
        } else {
            Err(Error::UnsupportedScheme {
                host: host.to_owned(),
            })
        }
    }

    /// The unix socket provider expects a Path, so we don't need scheme.
    #[cfg(unix)]
    pub fn connect_with_unix(addr: &str) -> Result<Docker> {
        let path = addr.strip_prefix("unix://").unwrap_or(addr);
        let client = HyperClient::connect_with_unix(path);
        Ok(Docker::new(client, Protocol::Unix))
    }

    #[cfg(not(unix))]
    pub fn connect_with_unix(addr: &str) -> Result<Docker> {
        Err(Error::UnsupportedScheme {
            host: addr.to_owned(),
        })
    }

    /// Connect using unsecured HTTP.
    pub fn connect_with_http(addr: &str) -> Result<Docker> {
        let client = HyperClient::connect_with_http(addr)?;
        Ok(Docker::new(client, Protocol::Tcp))
    }

    /// List containers
    ///
    /// # API
    /// /containers/json
    pub async fn list_containers(
        &self,
        all: Option<bool>,
        filters: &ContainerFilters,
    ) -> Result<Vec<Container>> {
        // the serializer is not Send, finish it before awaiting
        let query = {
            let mut param = url::form_urlencoded::Serializer::new(String::new());
            param.append_pair("all", &(all.unwrap_or(false) as u64).to_string());
            if !filters.is_empty() {
                let filters = serde_json::to_string(filters)?;
                debug!("filter: {}", filters);
                param.append_pair("filters", &filters);
            }
            param.finish()
        };

        let res = self
            .http_client()
            .get(&HeaderMap::new(), &format!("/containers/json?{query}"))
            .await?;
        api_result(res)
    }

    /// List images
    ///
    /// # API
    /// /images/json
    pub async fn images(&self, all: bool) -> Result<Vec<SummaryImage>> {
        let res = self
            .http_client()
            .get(&HeaderMap::new(), &format!("/images/json?all={}", all as u32))
            .await?;
        api_result(res)
    }

    /// Ping the docker server
    ///
    /// # API
    /// /_ping
    pub async fn ping(&self) -> Result<()> {
        let res = self.http_client().get(&HeaderMap::new(), "/_ping").await?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(DockerError {
                message: String::from_utf8_lossy(res.body()).into_owned(),
            }
            .into())
        }
    }
}

impl HaveHttpClient for Docker {
    type Client = HyperClient;
    fn http_client(&self) -> &Self::Client {
        &self.client
    }
}
