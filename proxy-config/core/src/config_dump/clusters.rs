use super::JsonMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ClustersConfigDump {
    #[serde(
        default,
        alias = "versionInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_info: Option<String>,

    /// Clusters declared in the proxy's bootstrap.
    #[serde(default, alias = "staticClusters")]
    pub static_clusters: Vec<StaticCluster>,

    /// Clusters pushed by the control plane and in use.
    #[serde(default, alias = "dynamicActiveClusters")]
    pub dynamic_active_clusters: Vec<DynamicCluster>,

    /// Clusters pushed by the control plane that are still initializing.
    #[serde(default, alias = "dynamicWarmingClusters")]
    pub dynamic_warming_clusters: Vec<DynamicCluster>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct StaticCluster {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DynamicCluster {
    #[serde(
        default,
        alias = "versionInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<Cluster>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Cluster {
    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub config: JsonMap,
}

// === impl ClustersConfigDump ===

impl ClustersConfigDump {
    /// Iterates over the static clusters, then the dynamic active clusters.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.static_clusters
            .iter()
            .filter_map(|c| c.cluster.as_ref())
            .chain(self.dynamic_active_clusters())
    }

    pub fn dynamic_active_clusters(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.dynamic_active_clusters
            .iter()
            .filter_map(|c| c.cluster.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.clusters().next().is_none()
    }
}
