use crate::{ConfigSource, Error};
use istio_proxy_config_core::{
    config_dump::{BootstrapConfigDump, ClustersConfigDump, ListenersConfigDump, RoutesConfigDump},
    ConfigDump, CONFIG_DUMP_PATH,
};

/// Fetches and parses the full config dump of `pod`'s sidecar proxy.
pub async fn try_config_dump_for_pod<S>(source: &S, pod: &str) -> Result<ConfigDump, Error>
where
    S: ConfigSource + ?Sized,
{
    tracing::info!(%pod, namespace = %source.namespace(), "Gathering proxy config from Envoy sidecar");
    let bytes = source.proxy_admin_get(pod, CONFIG_DUMP_PATH).await?;
    tracing::trace!(%pod, bytes = bytes.len(), "Parsing config dump");
    let dump = ConfigDump::from_slice(&bytes)?;
    Ok(dump)
}

/// Like [`try_config_dump_for_pod`], but panics on failure.
pub async fn config_dump_for_pod<S>(source: &S, pod: &str) -> ConfigDump
where
    S: ConfigSource + ?Sized,
{
    try_config_dump_for_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to get config dump for {pod}: {error}"))
}

pub async fn try_bootstrap_config_dump_for_pod<S>(
    source: &S,
    pod: &str,
) -> Result<BootstrapConfigDump, Error>
where
    S: ConfigSource + ?Sized,
{
    let bootstrap = try_config_dump_for_pod(source, pod).await?.into_bootstrap()?;
    Ok(bootstrap)
}

pub async fn bootstrap_config_dump_for_pod<S>(source: &S, pod: &str) -> BootstrapConfigDump
where
    S: ConfigSource + ?Sized,
{
    try_bootstrap_config_dump_for_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to get bootstrap config for {pod}: {error}"))
}

pub async fn try_clusters_config_dump_for_pod<S>(
    source: &S,
    pod: &str,
) -> Result<ClustersConfigDump, Error>
where
    S: ConfigSource + ?Sized,
{
    let clusters = try_config_dump_for_pod(source, pod).await?.into_clusters()?;
    Ok(clusters)
}

pub async fn clusters_config_dump_for_pod<S>(source: &S, pod: &str) -> ClustersConfigDump
where
    S: ConfigSource + ?Sized,
{
    try_clusters_config_dump_for_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to get clusters config for {pod}: {error}"))
}

pub async fn try_listeners_config_dump_for_pod<S>(
    source: &S,
    pod: &str,
) -> Result<ListenersConfigDump, Error>
where
    S: ConfigSource + ?Sized,
{
    let listeners = try_config_dump_for_pod(source, pod).await?.into_listeners()?;
    Ok(listeners)
}

pub async fn listeners_config_dump_for_pod<S>(source: &S, pod: &str) -> ListenersConfigDump
where
    S: ConfigSource + ?Sized,
{
    try_listeners_config_dump_for_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to get listeners config for {pod}: {error}"))
}

pub async fn try_routes_config_dump_for_pod<S>(
    source: &S,
    pod: &str,
) -> Result<RoutesConfigDump, Error>
where
    S: ConfigSource + ?Sized,
{
    let routes = try_config_dump_for_pod(source, pod).await?.into_routes()?;
    Ok(routes)
}

pub async fn routes_config_dump_for_pod<S>(source: &S, pod: &str) -> RoutesConfigDump
where
    S: ConfigSource + ?Sized,
{
    try_routes_config_dump_for_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to get routes config for {pod}: {error}"))
}
