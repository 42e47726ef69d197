use crate::{
    config_dump::{Listener, ListenersConfigDump, NetworkFilter, SocketAddress},
    Match,
};
use std::fmt;

const HTTP_CONNECTION_MANAGERS: [&str; 2] = [
    "envoy.http_connection_manager",
    "envoy.filters.network.http_connection_manager",
];

const TCP_PROXIES: [&str; 2] = ["envoy.tcp_proxy", "envoy.filters.network.tcp_proxy"];

/// Istio sends traffic that must be dropped to this cluster.
const BLACK_HOLE_CLUSTER: &str = "BlackHoleCluster";

/// The kind of traffic a listener serves, as derived from its network filters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ListenerType {
    Http,
    Tcp,
    HttpTcp,
    Unknown,
}

/// Selects listeners by type, bind address and port.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListenerFilter {
    /// Compared to [`ListenerType::as_str`], ignoring ASCII case.
    pub protocol: Match<String>,
    pub address: Match<String>,
    pub port: Match<u32>,
}

/// Returns true if the dump holds a static or dynamic active listener that satisfies `filter`.
pub fn is_listening_on(dump: &ListenersConfigDump, filter: &ListenerFilter) -> bool {
    dump.listeners().any(|listener| filter.verify(listener))
}

// === impl ListenerType ===

impl ListenerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Tcp => "TCP",
            Self::HttpTcp => "HTTP+TCP",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ListenerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl Listener ===

impl Listener {
    pub fn socket_address(&self) -> Option<&SocketAddress> {
        self.address.as_ref()?.socket_address.as_ref()
    }

    /// A listener is `HTTP` if any filter chain terminates HTTP and `TCP` if any filter chain
    /// proxies TCP to somewhere other than the black hole.
    pub fn listener_type(&self) -> ListenerType {
        let filters = || self.filter_chains.iter().flat_map(|chain| chain.filters.iter());
        let http = filters().any(|f| HTTP_CONNECTION_MANAGERS.contains(&f.name.as_str()));
        let tcp = filters().any(|f| {
            TCP_PROXIES.contains(&f.name.as_str()) && !proxies_to_black_hole(f)
        });
        match (http, tcp) {
            (true, true) => ListenerType::HttpTcp,
            (true, false) => ListenerType::Http,
            (false, true) => ListenerType::Tcp,
            (false, false) => ListenerType::Unknown,
        }
    }
}

fn proxies_to_black_hole(filter: &NetworkFilter) -> bool {
    ["typed_config", "typedConfig", "config"]
        .iter()
        .filter_map(|key| filter.config.get(*key))
        .any(|config| config.get("cluster").and_then(|c| c.as_str()) == Some(BLACK_HOLE_CLUSTER))
}

// === impl ListenerFilter ===

impl ListenerFilter {
    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Match::Exact(protocol.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Match::Exact(address.into());
        self
    }

    pub fn port(mut self, port: u32) -> Self {
        self.port = Match::Exact(port);
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.protocol.is_any() && self.address.is_any() && self.port.is_any()
    }

    /// Tests a single listener. Listeners without a socket address have an empty address and a
    /// zero port.
    pub fn verify(&self, listener: &Listener) -> bool {
        if self.is_wildcard() {
            return true;
        }

        let (address, port) = listener
            .socket_address()
            .map(|sa| (sa.address.as_str(), sa.port_value))
            .unwrap_or(("", 0));
        self.address.matches_ignore_ascii_case(address)
            && self.port.matches(&port)
            && self
                .protocol
                .matches_ignore_ascii_case(listener.listener_type().as_str())
    }
}

impl fmt::Display for ListenerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.protocol, self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listener(json: &str) -> Listener {
        serde_json::from_str(json).expect("listener must parse")
    }

    #[test]
    fn http_listener() {
        let l = listener(
            r#"{
                "name": "0.0.0.0_9080",
                "address": {"socket_address": {"address": "0.0.0.0", "port_value": 9080}},
                "filter_chains": [{"filters": [{"name": "envoy.http_connection_manager"}]}]
            }"#,
        );
        assert_eq!(l.listener_type(), ListenerType::Http);
        assert!(ListenerFilter::default().protocol("http").verify(&l));
        assert!(ListenerFilter::default().address("0.0.0.0").port(9080).verify(&l));
        assert!(!ListenerFilter::default()
            .protocol("HTTP")
            .address("127.0.0.1")
            .port(9080)
            .verify(&l));
    }

    #[test]
    fn black_hole_is_not_tcp() {
        let l = listener(
            r#"{
                "name": "virtualOutbound",
                "address": {"socket_address": {"address": "0.0.0.0", "port_value": 15001}},
                "filter_chains": [{"filters": [{
                    "name": "envoy.filters.network.tcp_proxy",
                    "typed_config": {"stat_prefix": "BlackHoleCluster", "cluster": "BlackHoleCluster"}
                }]}]
            }"#,
        );
        assert_eq!(l.listener_type(), ListenerType::Unknown);
        assert!(!ListenerFilter::default().protocol("TCP").verify(&l));
    }

    #[test]
    fn mixed_listener() {
        let l = listener(
            r#"{
                "name": "0.0.0.0_8080",
                "address": {"socketAddress": {"address": "0.0.0.0", "portValue": 8080}},
                "filterChains": [
                    {"filters": [{"name": "envoy.filters.network.http_connection_manager"}]},
                    {"filters": [{"name": "envoy.tcp_proxy", "config": {"cluster": "PassthroughCluster"}}]}
                ]
            }"#,
        );
        assert_eq!(l.listener_type(), ListenerType::HttpTcp);
        assert!(ListenerFilter::default().protocol("HTTP+TCP").port(8080).verify(&l));
        assert!(!ListenerFilter::default().protocol("HTTP").verify(&l));
    }

    #[test]
    fn listener_without_socket_address() {
        let l = listener(r#"{"name": "uds", "address": {"pipe": {"path": "/tmp/sock"}}}"#);
        assert!(l.socket_address().is_none());
        assert!(ListenerFilter::default().verify(&l));
        assert!(!ListenerFilter::default().port(15001).verify(&l));
    }
}
