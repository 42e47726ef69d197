use std::fmt;

/// Identifies a sidecar proxy to the control plane.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProxyId {
    pub pod: String,
    pub namespace: String,
}

// === impl ProxyId ===

impl ProxyId {
    pub fn new(pod: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            pod: pod.into(),
            namespace: namespace.into(),
        }
    }

    /// The control plane debug path that serves its view of this proxy's configuration.
    pub fn debug_config_dump_path(&self) -> String {
        format!("/debug/config_dump?proxyID={self}")
    }
}

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.pod, self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_path() {
        let id = ProxyId::new("details-v1-6fc55d65c9-k8fbq", "default");
        assert_eq!(id.to_string(), "details-v1-6fc55d65c9-k8fbq.default");
        assert_eq!(
            id.debug_config_dump_path(),
            "/debug/config_dump?proxyID=details-v1-6fc55d65c9-k8fbq.default"
        );
    }
}
