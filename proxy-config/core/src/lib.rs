//! Typed access to the configuration held by an Istio sidecar proxy.
//!
//! An Envoy config dump is a list of typed sections. This crate parses the sections that describe
//! the proxy's bootstrap, clusters, listeners and routes, and provides predicates that test a
//! parsed section against a filter:
//!
//! ```text
//! [ bytes ] -> [ ConfigDump ] -> [ ClustersConfigDump ] -> is_clustered_to(ClusterFilter)
//!                             -> [ ListenersConfigDump ] -> is_listening_on(ListenerFilter)
//!                             -> [ RoutesConfigDump ] -> is_routing_to(host, port)
//! ```
//!
//! Every filter field is a [`Match`], so that a field left as [`Match::Any`] never conflicts with
//! a legitimate value of the field itself. Predicates always search both the static entries (from
//! the proxy's bootstrap) and the dynamic entries (pushed by the control plane).
//!
//! The [`Comparator`] diffs the dynamic configuration of a proxy against the control plane's view
//! of the same proxy.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod cluster;
pub mod compare;
pub mod config_dump;
mod field_match;
pub mod listener;
mod proxy_id;
pub mod route;


pub use self::{
    cluster::{is_clustered_to, ClusterFilter, ClusterName, ClusterNameError, TrafficDirection},
    compare::Comparator,
    config_dump::{ConfigDump, ParseError, Section, SectionAbsent},
    field_match::Match,
    listener::{is_listening_on, ListenerFilter, ListenerType},
    proxy_id::ProxyId,
    route::{is_routing_to, virtual_host_name},
};

/// The admin path that serves a proxy's config dump.
pub const CONFIG_DUMP_PATH: &str = "/config_dump";
