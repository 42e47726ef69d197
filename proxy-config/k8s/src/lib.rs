//! Retrieves the configuration of Istio sidecar proxies running in a Kubernetes cluster.
//!
//! A [`ConfigSource`] issues admin requests against a pod's sidecar and debug requests against
//! every control plane replica. [`ProxyConfigClient`] implements it over Kubernetes port-forwards.
//! The functions in this crate fetch a proxy's config dump through a source, extract a single
//! section of it, or compare it against the control plane's view of the same proxy:
//!
//! ```text
//! let client = ProxyConfigClient::connect(Options::default()).await?;
//! let clusters = try_clusters_config_dump_for_pod(&client, "details-v1-6fc55d65c9-k8fbq").await?;
//! assert!(is_clustered_to(&clusters, &ClusterFilter::default().port(9080)));
//! ```
//!
//! Each retrieval has a `try_` form that returns an [`Error`] and a short form that panics, so
//! that it can be called directly from a test.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod options;
mod retrieve;
mod sync;


pub use self::{
    client::{ConfigSource, ProxyConfigClient},
    error::{BoxError, Error, UnexpectedStatus},
    options::Options,
    retrieve::{
        bootstrap_config_dump_for_pod, clusters_config_dump_for_pod, config_dump_for_pod,
        listeners_config_dump_for_pod, routes_config_dump_for_pod,
        try_bootstrap_config_dump_for_pod, try_clusters_config_dump_for_pod,
        try_config_dump_for_pod, try_listeners_config_dump_for_pod,
        try_routes_config_dump_for_pod,
    },
    sync::{
        are_control_planes_synced_to_pod, check_control_planes_synced_to_pod,
        try_are_control_planes_synced_to_pod,
    },
};

/// The port on which a sidecar proxy serves its admin API.
pub const PROXY_ADMIN_PORT: u16 = 15000;

/// The port on which a control plane replica serves its debug API.
pub const CONTROL_PLANE_DEBUG_PORT: u16 = 15014;
