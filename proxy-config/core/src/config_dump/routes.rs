use super::JsonMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RoutesConfigDump {
    #[serde(default, alias = "staticRouteConfigs")]
    pub static_route_configs: Vec<StaticRouteConfig>,

    #[serde(default, alias = "dynamicRouteConfigs")]
    pub dynamic_route_configs: Vec<DynamicRouteConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct StaticRouteConfig {
    #[serde(
        default,
        alias = "routeConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_config: Option<RouteConfiguration>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DynamicRouteConfig {
    #[serde(
        default,
        alias = "versionInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_info: Option<String>,

    #[serde(
        default,
        alias = "routeConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub route_config: Option<RouteConfiguration>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct RouteConfiguration {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "virtualHosts", skip_serializing_if = "Vec::is_empty")]
    pub virtual_hosts: Vec<VirtualHost>,

    #[serde(flatten)]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct VirtualHost {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,

    #[serde(flatten)]
    pub config: JsonMap,
}

// === impl RoutesConfigDump ===

impl RoutesConfigDump {
    /// Iterates over the static route configurations, then the dynamic ones. Entries without a
    /// route configuration are skipped.
    pub fn route_configs(&self) -> impl Iterator<Item = &RouteConfiguration> + '_ {
        self.static_route_configs
            .iter()
            .filter_map(|r| r.route_config.as_ref())
            .chain(self.dynamic_route_configs())
    }

    pub fn dynamic_route_configs(&self) -> impl Iterator<Item = &RouteConfiguration> + '_ {
        self.dynamic_route_configs
            .iter()
            .filter_map(|r| r.route_config.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.route_configs().next().is_none()
    }
}

// === impl RouteConfiguration ===

impl RouteConfiguration {
    pub fn has_virtual_host(&self, name: &str) -> bool {
        self.virtual_hosts.iter().any(|vhost| vhost.name == name)
    }
}
