use istio_proxy_config_k8s::{
    bootstrap_config_dump_for_pod, clusters_config_dump_for_pod, listeners_config_dump_for_pod,
    routes_config_dump_for_pod, try_bootstrap_config_dump_for_pod,
    try_clusters_config_dump_for_pod, try_listeners_config_dump_for_pod,
    try_routes_config_dump_for_pod, Error,
};
use istio_proxy_config_test::{bookinfo_details_pod, with_client};

#[tokio::test(flavor = "current_thread")]
#[ignore = "requires a Kubernetes cluster running the Istio BookInfo sample"]
async fn bootstrap() {
    with_client(|client| async move {
        let err = try_bootstrap_config_dump_for_pod(&client, "nonexistent")
            .await
            .expect_err("nonexistent pod must not have a config dump");
        assert!(matches!(err, Error::Transport { .. }), "{err}");

        let pod = bookinfo_details_pod(&client).await;
        let bootstrap = bootstrap_config_dump_for_pod(&client, &pod).await;
        let node = bootstrap
            .bootstrap
            .and_then(|b| b.node)
            .expect("bootstrap must have a node");
        assert!(node.id.contains(&pod), "{}", node.id);
    })
    .await;
}

#[tokio::test(flavor = "current_thread")]
#[ignore = "requires a Kubernetes cluster running the Istio BookInfo sample"]
async fn clusters() {
    with_client(|client| async move {
        assert!(try_clusters_config_dump_for_pod(&client, "nonexistent")
            .await
            .is_err());

        let pod = bookinfo_details_pod(&client).await;
        let clusters = clusters_config_dump_for_pod(&client, &pod).await;
        assert!(!clusters.is_empty());
    })
    .await;
}

#[tokio::test(flavor = "current_thread")]
#[ignore = "requires a Kubernetes cluster running the Istio BookInfo sample"]
async fn listeners() {
    with_client(|client| async move {
        assert!(try_listeners_config_dump_for_pod(&client, "nonexistent")
            .await
            .is_err());

        let pod = bookinfo_details_pod(&client).await;
        let listeners = listeners_config_dump_for_pod(&client, &pod).await;
        assert!(!listeners.is_empty());
    })
    .await;
}

#[tokio::test(flavor = "current_thread")]
#[ignore = "requires a Kubernetes cluster running the Istio BookInfo sample"]
async fn routes() {
    with_client(|client| async move {
        assert!(try_routes_config_dump_for_pod(&client, "nonexistent")
            .await
            .is_err());

        let pod = bookinfo_details_pod(&client).await;
        let routes = routes_config_dump_for_pod(&client, &pod).await;
        assert!(!routes.is_empty());
    })
    .await;
}
