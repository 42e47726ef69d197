use crate::{ConfigSource, Error};
use istio_proxy_config_core::{Comparator, ProxyId, CONFIG_DUMP_PATH};
use std::io;

/// Compares `pod`'s dynamic configuration with the control plane's view of it, writing a diff of
/// each section to `writer`.
///
/// Returns `Ok(true)` when every section matches and [`Error::SyncMismatch`] when any differs.
pub async fn check_control_planes_synced_to_pod<S, W>(
    source: &S,
    pod: &str,
    writer: &mut W,
) -> Result<bool, Error>
where
    S: ConfigSource + ?Sized,
    W: io::Write,
{
    let proxy = ProxyId::new(pod, source.namespace());
    tracing::info!(%proxy, "Comparing proxy config with the control plane");

    let envoy = source.proxy_admin_get(pod, CONFIG_DUMP_PATH).await?;
    let control_plane = source
        .control_plane_get(&proxy.debug_config_dump_path())
        .await?;
    tracing::debug!(replicas = control_plane.len(), "Received control plane config dumps");

    let sections = Comparator::new(&control_plane, &envoy)?.diff(writer)?;
    if !sections.is_empty() {
        return Err(Error::SyncMismatch { proxy, sections });
    }
    Ok(true)
}

/// Like [`check_control_planes_synced_to_pod`], writing the diff to stdout.
pub async fn try_are_control_planes_synced_to_pod<S>(source: &S, pod: &str) -> Result<bool, Error>
where
    S: ConfigSource + ?Sized,
{
    check_control_planes_synced_to_pod(source, pod, &mut io::stdout()).await
}

/// Like [`try_are_control_planes_synced_to_pod`], but panics unless the views are in sync.
pub async fn are_control_planes_synced_to_pod<S>(source: &S, pod: &str) -> bool
where
    S: ConfigSource + ?Sized,
{
    try_are_control_planes_synced_to_pod(source, pod)
        .await
        .unwrap_or_else(|error| panic!("failed to compare config for {pod}: {error}"))
}
