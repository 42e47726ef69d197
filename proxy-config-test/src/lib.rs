//! Helpers for tests that run against a live cluster.
//!
//! The tests expect the Istio BookInfo sample to be deployed to the `default` namespace, with a
//! single `details` pod.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

use anyhow::{bail, Result};
use istio_proxy_config_k8s::{Options, ProxyConfigClient};
use k8s_openapi::api::core::v1 as k8s;
use kube::ResourceExt;
use tracing::Instrument;

pub const BOOKINFO_DETAILS_SELECTOR: &str = "app=details";

/// Runs a test with a client for the current kubeconfig context.
pub async fn with_client<F, Fut>(test: F)
where
    F: FnOnce(ProxyConfigClient) -> Fut,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let _tracing = init_tracing();

    tracing::debug!("initializing client");
    let client = ProxyConfigClient::connect(Options::default())
        .await
        .expect("failed to initialize k8s client");

    tracing::trace!("spawning");
    let test = test(client);
    let res = tokio::spawn(test.instrument(tracing::info_span!("test"))).await;
    if let Err(err) = res {
        // If the test failed, stop tracing so the log is not polluted with more information
        // after the failure was printed.
        drop(_tracing);
        std::panic::resume_unwind(err.into_panic());
    }
}

/// Finds the only pod in `ns` that matches `selector`.
pub async fn find_pod(client: &kube::Client, ns: &str, selector: &str) -> Result<String> {
    let params = kube::api::ListParams::default().labels(selector);
    let mut pods = kube::Api::<k8s::Pod>::namespaced(client.clone(), ns)
        .list(&params)
        .await?
        .items;
    let Some(pod) = pods.pop() else {
        bail!("no pods in {ns} match {selector}");
    };
    if !pods.is_empty() {
        bail!("{} pods in {ns} match {selector}", pods.len() + 1);
    }
    Ok(pod.name_any())
}

/// Finds the BookInfo `details` pod.
pub async fn bookinfo_details_pod(client: &ProxyConfigClient) -> String {
    find_pod(
        client.client(),
        &client.options().namespace,
        BOOKINFO_DETAILS_SELECTOR,
    )
    .await
    .expect("failed to find the BookInfo details pod")
}

fn init_tracing() -> tracing::subscriber::DefaultGuard {
    tracing::subscriber::set_default(
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "istio_proxy_config=trace,info".parse().unwrap()),
            )
            .finish(),
    )
}
