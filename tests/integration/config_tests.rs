//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use crm_gateway::{Config, CrmCore, GatewayError, InMemoryStore};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_shipped_example_config_loads() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/gateway.yaml.example");
        let config = Config::from_file(path).await.unwrap();

        assert_eq!(config.server().port, 8000);
        assert!(!config.webhooks().allow_private_targets);
        assert_eq!(config.logging().level, "info");
        assert!(CrmCore::new(config, Arc::new(InMemoryStore::new())).is_ok());
    }

    #[tokio::test]
    async fn test_yaml_round_trip() {
        let mut original = Config::default();
        original.gateway.server.port = 9100;
        original.gateway.webhooks.allow_private_targets = true;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(original.to_yaml().unwrap().as_bytes())
            .unwrap();

        let loaded = Config::from_file(file.path()).await.unwrap();
        assert_eq!(loaded.server().port, 9100);
        assert!(loaded.webhooks().allow_private_targets);
        assert_eq!(loaded.auth().jwt_secret, original.auth().jwt_secret);
    }

    #[tokio::test]
    async fn test_zero_webhook_concurrency_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"webhooks:\n  max_concurrent_deliveries: 0\n")
            .unwrap();

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Config(_)));
    }
}
