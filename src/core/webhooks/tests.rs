//! Webhook tests
//!
//! Fan-out, signing and registration management against a mock endpoint.

#[cfg(test)]
mod tests {
    use super::super::dispatcher::WebhookDispatcher;
    use super::super::manager::WebhookOperations;
    use super::super::signature::{EVENT_HEADER, SIGNATURE_HEADER, verify_signature};
    use super::super::types::{CreateWebhookRequest, UpdateWebhookRequest, WebhookEnvelope};
    use crate::auth::context::ActorContext;
    use crate::auth::rbac::{Action, AuthorizationResolver, PermissionOverrides, Resource};
    use crate::config::WebhooksConfig;
    use crate::core::audit::AuditRecorder;
    use crate::core::models::{AuditEntityType, MemberRole, TeamMember};
    use crate::storage::{AuditFilter, DocumentStore, InMemoryStore, WriteBatch};
    use crate::utils::error::GatewayError;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        store: Arc<InMemoryStore>,
        dispatcher: WebhookDispatcher,
        webhooks: WebhookOperations,
        org: Uuid,
        admin: ActorContext,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let resolver = Arc::new(AuthorizationResolver::new());
        let recorder = AuditRecorder::new(store.clone(), resolver.clone());
        let config = WebhooksConfig {
            timeout_seconds: 2,
            ..WebhooksConfig::default()
        };
        let dispatcher = WebhookDispatcher::new(store.clone(), &config).unwrap();
        let webhooks = WebhookOperations::new(store.clone(), resolver, recorder, true);

        let org = Uuid::new_v4();
        let admin = TeamMember::new(org, "Ada", MemberRole::Admin, None);
        let mut batch = WriteBatch::new();
        batch.insert(admin.clone());
        store.commit(batch).await.unwrap();

        Fixture {
            store,
            dispatcher,
            webhooks,
            org,
            admin: ActorContext::from_member(&admin),
        }
    }

    fn registration(url: String, events: &[&str]) -> CreateWebhookRequest {
        CreateWebhookRequest {
            url,
            events: events.iter().map(|e| e.to_string()).collect(),
            is_active: None,
        }
    }

    #[tokio::test]
    async fn test_delivery_is_signed_with_registration_secret() {
        let f = fixture().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks"))
            .and(header("content-type", "application/json"))
            .and(header(EVENT_HEADER, "teamMember.created"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let created = f
            .webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration(format!("{}/hooks", server.uri()), &["teamMember.created"]),
            )
            .await
            .unwrap();
        assert!(created.secret.starts_with("whsec_"));

        let report = f
            .dispatcher
            .dispatch(f.org, "teamMember.created", json!({"memberId": "m-1"}))
            .await;
        assert_eq!(report.matched, 1);
        assert_eq!(report.delivered, 1);

        let received = server.received_requests().await.unwrap();
        let signature = received[0]
            .headers
            .get(SIGNATURE_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(verify_signature(&created.secret, &received[0].body, &signature));
        assert!(!verify_signature("whsec_other", &received[0].body, &signature));

        let envelope: WebhookEnvelope = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(envelope.event, "teamMember.created");
        assert_eq!(envelope.data, json!({"memberId": "m-1"}));

        let stored = f.store.get_webhook(created.webhook.id()).await.unwrap().unwrap();
        assert!(stored.last_triggered.is_some());
        assert!(stored.last_delivered_at.is_some());
    }

    #[tokio::test]
    async fn test_wildcard_and_inactive_selection() {
        let f = fixture().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        f.webhooks
            .create(Some(&f.admin), f.org, registration(format!("{}/all", server.uri()), &["*"]))
            .await
            .unwrap();
        f.webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration(format!("{}/other", server.uri()), &["lead.handoff.accepted"]),
            )
            .await
            .unwrap();
        let paused = f
            .webhooks
            .create(Some(&f.admin), f.org, registration(format!("{}/paused", server.uri()), &["*"]))
            .await
            .unwrap();
        f.webhooks
            .update(
                Some(&f.admin),
                f.org,
                paused.webhook.id(),
                UpdateWebhookRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let report = f
            .dispatcher
            .dispatch(f.org, "teamMember.updated", json!({}))
            .await;
        assert_eq!(report.matched, 1);
        assert_eq!(report.delivered, 1);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].url.path(), "/all");
    }

    #[tokio::test]
    async fn test_failed_delivery_is_isolated_and_recorded() {
        let f = fixture().await;
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/healthy"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let broken = f
            .webhooks
            .create(Some(&f.admin), f.org, registration(format!("{}/broken", server.uri()), &["*"]))
            .await
            .unwrap();
        let healthy = f
            .webhooks
            .create(Some(&f.admin), f.org, registration(format!("{}/healthy", server.uri()), &["*"]))
            .await
            .unwrap();
        let unreachable = f
            .webhooks
            .create(Some(&f.admin), f.org, registration("http://127.0.0.1:9/down".to_string(), &["*"]))
            .await
            .unwrap();

        let report = f
            .dispatcher
            .trigger(f.org, "lead.handoff.requested", json!({"leadId": "l-1"}))
            .report()
            .await
            .unwrap();
        assert_eq!(report.matched, 3);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);

        for id in [broken.webhook.id(), unreachable.webhook.id()] {
            let stored = f.store.get_webhook(id).await.unwrap().unwrap();
            assert!(stored.last_triggered.is_some());
            assert!(stored.last_delivered_at.is_none());
        }
        let stored = f.store.get_webhook(healthy.webhook.id()).await.unwrap().unwrap();
        assert!(stored.last_delivered_at.is_some());
    }

    #[tokio::test]
    async fn test_no_subscribers_sends_nothing() {
        let f = fixture().await;
        let report = f
            .dispatcher
            .dispatch(f.org, "teamMember.removed", json!({}))
            .await;
        assert_eq!(report.matched, 0);
        assert_eq!(report.delivered + report.failed, 0);
    }

    #[tokio::test]
    async fn test_management_is_admin_only() {
        let f = fixture().await;
        let manager = TeamMember::new(f.org, "Max", MemberRole::Manager, None);
        let mut escalated = manager.clone();
        escalated.permissions = Some(
            PermissionOverrides::new()
                .with(Resource::Webhook, Action::Create, true)
                .with(Resource::Webhook, Action::Delete, true),
        );

        for member in [manager, escalated] {
            let err = f
                .webhooks
                .create(
                    Some(&ActorContext::from_member(&member)),
                    f.org,
                    registration("https://hooks.example.com/crm".to_string(), &["*"]),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::PermissionDenied { .. }));
        }

        // Managers can still read registrations
        let manager = TeamMember::new(f.org, "Mia", MemberRole::Manager, None);
        assert!(
            f.webhooks
                .list(Some(&ActorContext::from_member(&manager)), f.org)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_registration_validation() {
        let f = fixture().await;

        let err = f
            .webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration("ftp://hooks.example.com".to_string(), &["*"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));

        let err = f
            .webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration("https://hooks.example.com".to_string(), &["lead.created"]),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_private_targets_are_refused_by_default() {
        let f = fixture().await;
        let resolver = Arc::new(AuthorizationResolver::new());
        let recorder = AuditRecorder::new(f.store.clone(), resolver.clone());
        let strict = WebhookOperations::new(f.store.clone(), resolver, recorder, false);

        for url in [
            "http://127.0.0.1:8080/hook",
            "http://10.0.0.4/hook",
            "http://localhost/hook",
        ] {
            let err = strict
                .create(Some(&f.admin), f.org, registration(url.to_string(), &["*"]))
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::Validation(_)), "{}", url);
        }
    }

    #[tokio::test]
    async fn test_update_noop_and_delete_are_audited() {
        let f = fixture().await;
        let created = f
            .webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration("https://hooks.example.com/crm".to_string(), &["*"]),
            )
            .await
            .unwrap();
        let id = created.webhook.id();

        let outcome = f
            .webhooks
            .update(
                Some(&f.admin),
                f.org,
                id,
                UpdateWebhookRequest {
                    events: Some(vec!["*".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!outcome.is_applied());

        f.webhooks.delete(Some(&f.admin), f.org, id).await.unwrap();
        assert!(f.store.get_webhook(id).await.unwrap().is_none());

        let entries = f
            .store
            .audit_entries(f.org, &AuditFilter::for_entity(AuditEntityType::Webhook, id))
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].description,
            "Deleted webhook \"https://hooks.example.com/crm\""
        );

        let err = f.webhooks.delete(Some(&f.admin), f.org, id).await.unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_listing_never_exposes_secret() {
        let f = fixture().await;
        let created = f
            .webhooks
            .create(
                Some(&f.admin),
                f.org,
                registration("https://hooks.example.com/crm".to_string(), &["*"]),
            )
            .await
            .unwrap();

        let listed = f.webhooks.list(Some(&f.admin), f.org).await.unwrap();
        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains(&created.secret));
        assert!(json.contains("https://hooks.example.com/crm"));
    }
}
