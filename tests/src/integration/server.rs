//! Gateway served on a real socket.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    use skill_gateway::{GatewayConfig, SkillGatewayService};
    use skill_runtime::EchoSkill;
    use skill_verification::test_helpers::StaticFetcher;
    use skill_verification::{RequestVerificationService, VerificationConfig};

    fn unverified_gateway() -> SkillGatewayService {
        let mut config = GatewayConfig::default();
        config.verification.enabled = false;

        let verifier = Arc::new(RequestVerificationService::new(
            VerificationConfig::disabled(),
            StaticFetcher::new(Vec::new()),
        ));
        SkillGatewayService::new(config, verifier, Arc::new(EchoSkill)).unwrap()
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(unverified_gateway().serve(listener, async move {
            let _ = stop_rx.await;
        }));

        let client = reqwest::Client::new();
        let health = client
            .get(format!("http://{addr}/health"))
            .send()
            .await
            .unwrap();
        assert_eq!(health.status().as_u16(), 200);

        let launch = serde_json::json!({
            "version": "1.0",
            "request": { "type": "LaunchRequest", "requestId": "r-1" }
        });
        let response = client
            .post(format!("http://{addr}/"))
            .header("content-type", "application/json")
            .body(launch.to_string())
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let body: serde_json::Value =
            serde_json::from_str(&response.text().await.unwrap()).unwrap();
        assert_eq!(body["response"]["shouldEndSession"], false);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
