use super::JsonMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct BootstrapConfigDump {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<Bootstrap>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

/// The configuration the proxy was started with.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Bootstrap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,

    #[serde(flatten)]
    pub config: JsonMap,
}

/// Identifies the proxy to its management server.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub cluster: String,

    #[serde(flatten)]
    pub config: JsonMap,
}
