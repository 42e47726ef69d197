//! The Envoy admin config dump.
//!
//! A dump is a list of sections, each tagged with the type URL of its message. Only the bootstrap,
//! cluster, listener and route sections are modeled; any other section is skipped. Both the
//! `envoy.admin.v3` and the legacy `envoy.admin.v2alpha` type URLs are accepted.
//!
//! Envoy renders field names in snake_case, while control planes may emit lowerCamelCase proto
//! JSON, so every modeled field accepts both spellings. Fields that are not modeled are preserved
//! as raw JSON so that a section can be re-rendered for comparison.

use serde::Deserialize;
use std::{fmt, str::FromStr};

mod bootstrap;
mod clusters;
mod listeners;
mod routes;

pub use self::{
    bootstrap::{Bootstrap, BootstrapConfigDump, Node},
    clusters::{Cluster, ClustersConfigDump, DynamicCluster, StaticCluster},
    listeners::{
        Address, DynamicListener, DynamicListenerState, FilterChain, Listener,
        ListenersConfigDump, NetworkFilter, SocketAddress, StaticListener,
    },
    routes::{
        DynamicRouteConfig, RouteConfiguration, RoutesConfigDump, StaticRouteConfig, VirtualHost,
    },
};

/// Fields that are carried through without being modeled.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A parsed config dump.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ConfigDump {
    #[serde(default)]
    configs: Vec<TypedConfig>,
}

/// A section of a config dump that can be extracted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Bootstrap,
    Clusters,
    Listeners,
    Routes,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid config dump: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no control plane replica returned a config dump")]
    NoControlPlaneDump,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("config dump has no {0} section")]
pub struct SectionAbsent(pub Section);

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "@type")]
enum TypedConfig {
    #[serde(
        rename = "type.googleapis.com/envoy.admin.v3.BootstrapConfigDump",
        alias = "type.googleapis.com/envoy.admin.v2alpha.BootstrapConfigDump"
    )]
    Bootstrap(BootstrapConfigDump),

    #[serde(
        rename = "type.googleapis.com/envoy.admin.v3.ClustersConfigDump",
        alias = "type.googleapis.com/envoy.admin.v2alpha.ClustersConfigDump"
    )]
    Clusters(ClustersConfigDump),

    #[serde(
        rename = "type.googleapis.com/envoy.admin.v3.ListenersConfigDump",
        alias = "type.googleapis.com/envoy.admin.v2alpha.ListenersConfigDump"
    )]
    Listeners(ListenersConfigDump),

    #[serde(
        rename = "type.googleapis.com/envoy.admin.v3.RoutesConfigDump",
        alias = "type.googleapis.com/envoy.admin.v2alpha.RoutesConfigDump"
    )]
    Routes(RoutesConfigDump),

    #[serde(other)]
    Unrecognized,
}

// === impl ConfigDump ===

impl ConfigDump {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(bytes).map_err(Into::into)
    }

    pub fn bootstrap(&self) -> Result<&BootstrapConfigDump, SectionAbsent> {
        self.configs
            .iter()
            .find_map(|config| match config {
                TypedConfig::Bootstrap(bootstrap) => Some(bootstrap),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Bootstrap))
    }

    pub fn clusters(&self) -> Result<&ClustersConfigDump, SectionAbsent> {
        self.configs
            .iter()
            .find_map(|config| match config {
                TypedConfig::Clusters(clusters) => Some(clusters),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Clusters))
    }

    pub fn listeners(&self) -> Result<&ListenersConfigDump, SectionAbsent> {
        self.configs
            .iter()
            .find_map(|config| match config {
                TypedConfig::Listeners(listeners) => Some(listeners),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Listeners))
    }

    pub fn routes(&self) -> Result<&RoutesConfigDump, SectionAbsent> {
        self.configs
            .iter()
            .find_map(|config| match config {
                TypedConfig::Routes(routes) => Some(routes),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Routes))
    }

    pub fn into_bootstrap(self) -> Result<BootstrapConfigDump, SectionAbsent> {
        self.configs
            .into_iter()
            .find_map(|config| match config {
                TypedConfig::Bootstrap(bootstrap) => Some(bootstrap),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Bootstrap))
    }

    pub fn into_clusters(self) -> Result<ClustersConfigDump, SectionAbsent> {
        self.configs
            .into_iter()
            .find_map(|config| match config {
                TypedConfig::Clusters(clusters) => Some(clusters),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Clusters))
    }

    pub fn into_listeners(self) -> Result<ListenersConfigDump, SectionAbsent> {
        self.configs
            .into_iter()
            .find_map(|config| match config {
                TypedConfig::Listeners(listeners) => Some(listeners),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Listeners))
    }

    pub fn into_routes(self) -> Result<RoutesConfigDump, SectionAbsent> {
        self.configs
            .into_iter()
            .find_map(|config| match config {
                TypedConfig::Routes(routes) => Some(routes),
                _ => None,
            })
            .ok_or(SectionAbsent(Section::Routes))
    }
}

impl FromStr for ConfigDump {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(s.as_bytes())
    }
}

// === impl Section ===

impl Section {
    /// A capitalized name, used to label diagnostic output.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Bootstrap => "Bootstrap",
            Self::Clusters => "Clusters",
            Self::Listeners => "Listeners",
            Self::Routes => "Routes",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => f.write_str("bootstrap"),
            Self::Clusters => f.write_str("clusters"),
            Self::Listeners => f.write_str("listeners"),
            Self::Routes => f.write_str("routes"),
        }
    }
}
