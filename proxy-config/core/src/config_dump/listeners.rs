use super::JsonMap;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ListenersConfigDump {
    #[serde(
        default,
        alias = "versionInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_info: Option<String>,

    #[serde(default, alias = "staticListeners")]
    pub static_listeners: Vec<StaticListener>,

    /// Dynamic listeners and their states, as reported by `envoy.admin.v3`.
    #[serde(default, alias = "dynamicListeners")]
    pub dynamic_listeners: Vec<DynamicListener>,

    /// Active dynamic listeners, as reported by `envoy.admin.v2alpha`.
    #[serde(
        default,
        alias = "dynamicActiveListeners",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub dynamic_active_listeners: Vec<DynamicListenerState>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct StaticListener {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener: Option<Listener>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DynamicListener {
    #[serde(default)]
    pub name: String,

    #[serde(
        default,
        alias = "activeState",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_state: Option<DynamicListenerState>,

    #[serde(
        default,
        alias = "warmingState",
        skip_serializing_if = "Option::is_none"
    )]
    pub warming_state: Option<DynamicListenerState>,

    #[serde(
        default,
        alias = "drainingState",
        skip_serializing_if = "Option::is_none"
    )]
    pub draining_state: Option<DynamicListenerState>,

    #[serde(
        default,
        alias = "errorState",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_state: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct DynamicListenerState {
    #[serde(
        default,
        alias = "versionInfo",
        skip_serializing_if = "Option::is_none"
    )]
    pub version_info: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listener: Option<Listener>,

    #[serde(
        default,
        alias = "lastUpdated",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Listener {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,

    #[serde(default, alias = "filterChains", skip_serializing_if = "Vec::is_empty")]
    pub filter_chains: Vec<FilterChain>,

    #[serde(flatten)]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Address {
    #[serde(
        default,
        alias = "socketAddress",
        skip_serializing_if = "Option::is_none"
    )]
    pub socket_address: Option<SocketAddress>,

    #[serde(flatten)]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SocketAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default)]
    pub address: String,

    #[serde(default, alias = "portValue")]
    pub port_value: u32,

    #[serde(flatten)]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FilterChain {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<NetworkFilter>,

    #[serde(flatten)]
    pub config: JsonMap,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct NetworkFilter {
    #[serde(default)]
    pub name: String,

    #[serde(flatten)]
    pub config: JsonMap,
}

// === impl ListenersConfigDump ===

impl ListenersConfigDump {
    /// Iterates over the static listeners, then the active dynamic listeners.
    pub fn listeners(&self) -> impl Iterator<Item = &Listener> + '_ {
        self.static_listeners
            .iter()
            .filter_map(|l| l.listener.as_ref())
            .chain(self.dynamic_active_listeners())
    }

    /// Iterates over the active dynamic listeners of either schema version.
    pub fn dynamic_active_listeners(&self) -> impl Iterator<Item = &Listener> + '_ {
        self.dynamic_listeners
            .iter()
            .filter_map(|l| l.active_state.as_ref())
            .chain(self.dynamic_active_listeners.iter())
            .filter_map(|state| state.listener.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.listeners().next().is_none()
    }
}
