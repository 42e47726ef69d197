use istio_proxy_config_k8s::{
    are_control_planes_synced_to_pod, try_are_control_planes_synced_to_pod,
};
use istio_proxy_config_test::{bookinfo_details_pod, with_client};

#[tokio::test(flavor = "current_thread")]
#[ignore = "requires a Kubernetes cluster running the Istio BookInfo sample"]
async fn control_planes_synced() {
    with_client(|client| async move {
        assert!(try_are_control_planes_synced_to_pod(&client, "nonexistent")
            .await
            .is_err());

        let pod = bookinfo_details_pod(&client).await;
        assert!(are_control_planes_synced_to_pod(&client, &pod).await);
    })
    .await;
}
