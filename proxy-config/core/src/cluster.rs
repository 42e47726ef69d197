use crate::{
    config_dump::{Cluster, ClustersConfigDump},
    Match,
};
use std::{fmt, num::ParseIntError, str::FromStr};

/// The direction of traffic that an Istio cluster serves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TrafficDirection {
    Inbound,
    InboundVip,
    Outbound,
}

/// An Istio cluster name, `<direction>|<port>|<subset>|<fqdn>`.
///
/// Clusters without a subset have an empty `subset`. Inbound clusters that are not bound to a
/// service (`inbound|<port>||`) have an empty `fqdn`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClusterName {
    pub direction: TrafficDirection,
    pub port: u16,
    pub subset: String,
    pub fqdn: String,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClusterNameError {
    #[error("cluster name must have the form <direction>|<port>|<subset>|<fqdn>")]
    Format,

    #[error("unknown traffic direction: {0}")]
    Direction(String),

    #[error("invalid port: {0}")]
    Port(#[from] ParseIntError),
}

/// Selects clusters by the components of their name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClusterFilter {
    pub fqdn: Match<String>,
    pub subset: Match<String>,
    pub direction: Match<TrafficDirection>,
    pub port: Match<u16>,
}

/// Returns true if the dump holds a static or dynamic active cluster that satisfies `filter`.
pub fn is_clustered_to(dump: &ClustersConfigDump, filter: &ClusterFilter) -> bool {
    dump.clusters().any(|cluster| filter.verify(cluster))
}

// === impl TrafficDirection ===

impl TrafficDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::InboundVip => "inbound-vip",
            Self::Outbound => "outbound",
        }
    }
}

impl FromStr for TrafficDirection {
    type Err = ClusterNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inbound" => Ok(Self::Inbound),
            "inbound-vip" => Ok(Self::InboundVip),
            "outbound" => Ok(Self::Outbound),
            s => Err(ClusterNameError::Direction(s.to_string())),
        }
    }
}

impl fmt::Display for TrafficDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl ClusterName ===

impl FromStr for ClusterName {
    type Err = ClusterNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, '|');
        let (Some(direction), Some(port), Some(subset), Some(fqdn)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ClusterNameError::Format);
        };

        Ok(Self {
            direction: direction.parse()?,
            port: port.parse()?,
            subset: subset.to_string(),
            fqdn: fqdn.to_string(),
        })
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            self.direction, self.port, self.subset, self.fqdn
        )
    }
}

// === impl ClusterFilter ===

impl ClusterFilter {
    pub fn fqdn(mut self, fqdn: impl Into<String>) -> Self {
        self.fqdn = Match::Exact(fqdn.into());
        self
    }

    pub fn subset(mut self, subset: impl Into<String>) -> Self {
        self.subset = Match::Exact(subset.into());
        self
    }

    pub fn direction(mut self, direction: TrafficDirection) -> Self {
        self.direction = Match::Exact(direction);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Match::Exact(port);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.fqdn.is_any() && self.subset.is_any() && self.direction.is_any() && self.port.is_any()
    }

    pub fn matches(&self, name: &ClusterName) -> bool {
        self.fqdn.matches(name.fqdn.as_str())
            && self.subset.matches(name.subset.as_str())
            && self.direction.matches(&name.direction)
            && self.port.matches(&name.port)
    }

    /// Tests a single cluster.
    ///
    /// A wildcard filter matches every cluster. Otherwise, clusters whose names are not in the
    /// Istio form (e.g. `BlackHoleCluster`) never match.
    pub fn verify(&self, cluster: &Cluster) -> bool {
        if self.is_wildcard() {
            return true;
        }

        match cluster.name.parse::<ClusterName>() {
            Ok(name) => self.matches(&name),
            Err(error) => {
                tracing::trace!(cluster = %cluster.name, %error, "Skipping cluster");
                false
            }
        }
    }
}

impl fmt::Display for ClusterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@{}:{}",
            self.direction, self.subset, self.fqdn, self.port
        )
    }
}
