use istio_proxy_config_core::{ParseError, ProxyId, Section, SectionAbsent};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A Kubernetes client could not be configured.
    #[error("failed to configure a Kubernetes client: {0}")]
    Access(#[source] BoxError),

    /// A request could not be completed or was not successful.
    #[error("request to {target} failed: {source}")]
    Transport {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    SectionAbsent(#[from] SectionAbsent),

    /// The control plane's view of a proxy differs from the proxy's own configuration.
    #[error("{proxy} is out of sync with the control plane: {sections:?} differ")]
    SyncMismatch { proxy: ProxyId, sections: Vec<Section> },

    #[error("failed to write config diff: {0}")]
    Output(#[from] std::io::Error),
}

/// A response was received with a non-2xx status.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unexpected status: {0}")]
pub struct UnexpectedStatus(pub hyper::StatusCode);

// === impl Error ===

impl Error {
    pub fn access(error: impl Into<BoxError>) -> Self {
        Self::Access(error.into())
    }

    pub fn transport(target: impl Into<String>, error: impl Into<BoxError>) -> Self {
        Self::Transport {
            target: target.into(),
            source: error.into(),
        }
    }
}
