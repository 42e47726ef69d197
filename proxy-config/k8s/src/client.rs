use crate::{Error, Options, UnexpectedStatus, CONTROL_PLANE_DEBUG_PORT, PROXY_ADMIN_PORT};
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::StatusCode;
use hyper_util::rt::TokioIo;
use k8s_openapi::api::core::v1 as k8s;
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig},
    ResourceExt,
};
use std::{collections::BTreeMap, future::Future};

/// Serves raw responses from sidecar proxies and from the control plane.
#[async_trait::async_trait]
pub trait ConfigSource: Send + Sync {
    /// The namespace of the pods being inspected.
    fn namespace(&self) -> &str;

    /// Issues a `GET` against the admin API of `pod`'s sidecar proxy.
    async fn proxy_admin_get(&self, pod: &str, path: &str) -> Result<Bytes, Error>;

    /// Issues a `GET` against the debug API of every reachable control plane replica, returning
    /// the successful responses keyed by replica name.
    async fn control_plane_get(&self, path: &str) -> Result<BTreeMap<String, Bytes>, Error>;
}

/// A [`ConfigSource`] that reaches pods through Kubernetes port-forwards.
#[derive(Clone)]
pub struct ProxyConfigClient {
    client: kube::Client,
    options: Options,
}

// === impl ProxyConfigClient ===

impl ProxyConfigClient {
    pub fn new(client: kube::Client, options: Options) -> Self {
        Self { client, options }
    }

    /// Builds a Kubernetes client for the configured kubeconfig and context.
    pub async fn connect(options: Options) -> Result<Self, Error> {
        let config = if options.context_name.is_none() && options.config_path.is_none() {
            kube::Config::infer().await.map_err(Error::access)?
        } else {
            let kubeconfig = match options.config_path.as_ref() {
                Some(path) => Kubeconfig::read_from(path),
                None => Kubeconfig::read(),
            }
            .map_err(Error::access)?;
            let kubeconfig_options = KubeConfigOptions {
                context: options.context_name.clone(),
                ..Default::default()
            };
            kube::Config::from_custom_kubeconfig(kubeconfig, &kubeconfig_options)
                .await
                .map_err(Error::access)?
        };
        let client = kube::Client::try_from(config).map_err(Error::access)?;
        Ok(Self::new(client, options))
    }

    pub fn client(&self) -> &kube::Client {
        &self.client
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    async fn control_plane_pods(&self) -> Result<Vec<String>, Error> {
        let ns = &self.options.istio_namespace;
        let selector = &self.options.control_plane_selector;
        let params = ListParams::default().labels(selector);
        let pods = kube::Api::<k8s::Pod>::namespaced(self.client.clone(), ns)
            .list(&params)
            .await
            .map_err(|error| Error::transport(format!("{ns}/{selector}"), error))?;
        Ok(pods
            .items
            .iter()
            .filter(|pod| is_running(pod))
            .map(|pod| pod.name_any())
            .collect())
    }

    /// Forwards `port` of `pod` and issues a single HTTP/1 `GET` over it.
    async fn get(
        &self,
        namespace: &str,
        pod: &str,
        port: u16,
        path: &str,
    ) -> Result<(StatusCode, Bytes), Error> {
        let target = format!("{namespace}/{pod}:{port}{path}");
        tracing::debug!(%target, "Port-forwarding");

        let mut pf = kube::Api::<k8s::Pod>::namespaced(self.client.clone(), namespace)
            .portforward(pod, &[port])
            .await
            .map_err(|error| Error::transport(&target, error))?;
        let io = pf
            .take_stream(port)
            .ok_or_else(|| Error::transport(&target, "port-forward has no stream"))?;

        let (mut tx, conn) = hyper::client::conn::http1::handshake(TokioIo::new(io))
            .await
            .map_err(|error| Error::transport(&target, error))?;
        tokio::spawn(async move {
            if let Err(error) = conn.await {
                tracing::debug!(%error, "Connection failed");
            }
        });

        let req = hyper::Request::get(path)
            .header(hyper::header::HOST, "localhost")
            .body(Empty::<Bytes>::new())
            .map_err(|error| Error::transport(&target, error))?;
        let rsp = tx
            .send_request(req)
            .await
            .map_err(|error| Error::transport(&target, error))?;
        let status = rsp.status();
        let body = rsp
            .into_body()
            .collect()
            .await
            .map_err(|error| Error::transport(&target, error))?
            .to_bytes();
        tracing::trace!(%target, %status, bytes = body.len(), "Received response");
        Ok((status, body))
    }
}

#[async_trait::async_trait]
impl ConfigSource for ProxyConfigClient {
    fn namespace(&self) -> &str {
        &self.options.namespace
    }

    async fn proxy_admin_get(&self, pod: &str, path: &str) -> Result<Bytes, Error> {
        let ns = &self.options.namespace;
        let (status, body) = self.get(ns, pod, PROXY_ADMIN_PORT, path).await?;
        if !status.is_success() {
            return Err(Error::transport(
                format!("{ns}/{pod}:{PROXY_ADMIN_PORT}{path}"),
                UnexpectedStatus(status),
            ));
        }
        Ok(body)
    }

    async fn control_plane_get(&self, path: &str) -> Result<BTreeMap<String, Bytes>, Error> {
        let ns = &self.options.istio_namespace;
        let pods = self.control_plane_pods().await?;
        let responses = gather_replicas(pods, move |pod: String| async move {
            self.get(ns, &pod, CONTROL_PLANE_DEBUG_PORT, path).await
        })
        .await;

        if responses.is_empty() {
            return Err(Error::transport(
                format!("{ns}/{}", self.options.control_plane_selector),
                "no control plane replica responded",
            ));
        }
        Ok(responses)
    }
}

/// Queries each replica in turn, keeping the successful responses. Replicas that cannot be
/// reached or that answer with a non-2xx status are skipped.
async fn gather_replicas<F, Fut>(pods: Vec<String>, mut get: F) -> BTreeMap<String, Bytes>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(StatusCode, Bytes), Error>>,
{
    let mut responses = BTreeMap::new();
    for pod in pods {
        match get(pod.clone()).await {
            Ok((status, body)) if status.is_success() => {
                responses.insert(pod, body);
            }
            Ok((status, _)) => {
                tracing::debug!(%pod, %status, "Skipping control plane replica");
            }
            Err(error) => {
                tracing::debug!(%pod, %error, "Skipping unreachable control plane replica");
            }
        }
    }
    responses
}

fn is_running(pod: &k8s::Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|status| status.phase.as_deref())
        == Some("Running")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn skips_failing_replicas() {
        let pods = vec![
            "istiod-7d4b9c8f6-aaaaa".to_string(),
            "istiod-7d4b9c8f6-bbbbb".to_string(),
            "istiod-7d4b9c8f6-ccccc".to_string(),
        ];
        let responses = gather_replicas(pods, |pod: String| async move {
            match pod.as_str() {
                "istiod-7d4b9c8f6-aaaaa" => Err(Error::transport(pod, "connection refused")),
                "istiod-7d4b9c8f6-bbbbb" => Ok((StatusCode::OK, Bytes::from_static(b"{}"))),
                _ => Ok((StatusCode::SERVICE_UNAVAILABLE, Bytes::new())),
            }
        })
        .await;

        assert_eq!(
            responses.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["istiod-7d4b9c8f6-bbbbb"]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn no_replicas_respond() {
        let pods = vec!["istiod-7d4b9c8f6-aaaaa".to_string()];
        let responses = gather_replicas(pods, |pod: String| async move {
            Err(Error::transport(pod, "connection refused"))
        })
        .await;
        assert!(responses.is_empty());
    }

    #[test]
    fn running_pods() {
        let mut pod = k8s::Pod::default();
        assert!(!is_running(&pod));
        pod.status = Some(k8s::PodStatus {
            phase: Some("Running".to_string()),
            ..Default::default()
        });
        assert!(is_running(&pod));
    }
}
