use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub(crate) fn null_to_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let actual: Option<T> = Option::deserialize(de)?;
    Ok(actual.unwrap_or_default())
}

/// Entry of `GET /containers/json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Container {
    pub Id: String,
    #[serde(deserialize_with = "null_to_default", default)]
    pub Names: Vec<String>,
    pub Image: String,
    #[serde(default)]
    pub ImageID: String,
    #[serde(default)]
    pub State: String,
    #[serde(default)]
    pub Status: String,
    #[serde(deserialize_with = "null_to_default", default)]
    pub Ports: Vec<Port>,
    #[serde(deserialize_with = "null_to_default", default)]
    pub Labels: HashMap<String, String>,
    #[serde(default)]
    pub NetworkSettings: Option<SummaryNetworkSettings>,
}

impl Container {
    /// Primary name without the leading slash the daemon reports.
    pub fn name(&self) -> &str {
        self.Names
            .first()
            .map(|name| name.trim_start_matches('/'))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Port {
    pub IP: Option<String>,
    pub PrivatePort: u16,
    pub PublicPort: Option<u16>,
    pub Type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct SummaryNetworkSettings {
    #[serde(deserialize_with = "null_to_default", default)]
    pub Networks: BTreeMap<String, Network>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct Network {
    #[serde(default)]
    pub NetworkID: String,
    #[serde(default)]
    pub IPAddress: String,
    #[serde(default)]
    pub Gateway: String,
}

/// Filters of the list containers api
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContainerFilters {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    status: Vec<String>,
}

impl ContainerFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&mut self, status: &str) -> &mut Self {
        self.status.push(status.to_owned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
    }
}
