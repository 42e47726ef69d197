use std::path::PathBuf;

/// Locates the cluster, the proxies and the control plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// The kubeconfig context to use. The current context is used when unset.
    pub context_name: Option<String>,

    /// The kubeconfig to read. When neither this nor a context is set, the client configuration
    /// is inferred from the environment.
    pub config_path: Option<PathBuf>,

    /// The namespace of the pods being inspected.
    pub namespace: String,

    /// The namespace in which the control plane runs.
    pub istio_namespace: String,

    /// The label selector that matches control plane pods.
    pub control_plane_selector: String,
}

// === impl Options ===

impl Options {
    pub const DEFAULT_NAMESPACE: &'static str = "default";
    pub const DEFAULT_ISTIO_NAMESPACE: &'static str = "istio-system";
    pub const DEFAULT_CONTROL_PLANE_SELECTOR: &'static str = "istio=pilot";

    pub fn new(context_name: Option<String>, config_path: Option<PathBuf>) -> Self {
        Self {
            context_name,
            config_path,
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_istio_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.istio_namespace = namespace.into();
        self
    }

    pub fn with_control_plane_selector(mut self, selector: impl Into<String>) -> Self {
        self.control_plane_selector = selector.into();
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            context_name: None,
            config_path: None,
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            istio_namespace: Self::DEFAULT_ISTIO_NAMESPACE.to_string(),
            control_plane_selector: Self::DEFAULT_CONTROL_PLANE_SELECTOR.to_string(),
        }
    }
}
