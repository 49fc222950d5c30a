use crate::container::null_to_default;
use serde::{Deserialize, Serialize};

/// Entry of `GET /images/json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(non_snake_case)]
pub struct SummaryImage {
    pub Id: String,
    #[serde(default)]
    pub ParentId: String,
    #[serde(deserialize_with = "null_to_default", default)]
    pub RepoTags: Vec<String>,
    #[serde(deserialize_with = "null_to_default", default)]
    pub RepoDigests: Vec<String>,
    #[serde(default)]
    pub Created: i64,
    #[serde(default)]
    pub Size: i64,
}

/// Abbreviated image id, the way `docker images` prints it.
///
/// `sha256:` prefixed ids keep the prefix and 10 hex digits, anything else
/// is cut to 12 characters.
pub fn short_id(id: &str) -> String {
    match id.strip_prefix("sha256:") {
        Some(hex) => format!("sha256:{}", truncate(hex, 10)),
        None => truncate(id, 12).to_owned(),
    }
}

fn truncate(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
