//! Webhook fan-out integration tests

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_signed_by;
    use crate::common::{TestOrganization, ctx};
    use crm_gateway::core::team::UpdateMember;
    use crm_gateway::core::webhooks::{EVENT_HEADER, UpdateWebhookRequest, events};
    use crm_gateway::{DocumentStore, GatewayError, MemberRole};
    use serde_json::Value;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_wildcard_webhook_receives_member_update() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks"))
            .and(header(EVENT_HEADER, events::TEAM_MEMBER_UPDATED))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let org = TestOrganization::new().await;
        let (webhook, secret) = org
            .add_webhook(format!("{}/hooks", server.uri()), &["*"])
            .await;
        let agent = org.add_member("Hana", MemberRole::Agent).await;

        let outcome = org
            .core
            .team()
            .update_member(
                Some(&org.admin_ctx()),
                org.id,
                agent.id(),
                UpdateMember {
                    name: Some("Hana K.".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let report = outcome.into_dispatch().unwrap().report().await.unwrap();
        assert_eq!(report.matched, 1);
        assert_eq!(report.delivered, 1);

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_signed_by(&received[0], &secret);

        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["event"], events::TEAM_MEMBER_UPDATED);
        assert_eq!(body["data"]["memberId"], agent.id().to_string());
        assert_eq!(body["data"]["name"], "Hana K.");

        let stored = org.store.get_webhook(webhook.id()).await.unwrap().unwrap();
        assert!(stored.last_triggered.is_some());
        assert!(stored.last_delivered_at.is_some());
    }

    #[tokio::test]
    async fn test_unchanged_update_emits_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let org = TestOrganization::new().await;
        org.add_webhook(format!("{}/hooks", server.uri()), &["*"]).await;
        let agent = org.add_member("Hana", MemberRole::Agent).await;

        let outcome = org
            .core
            .team()
            .update_member(
                Some(&org.admin_ctx()),
                org.id,
                agent.id(),
                UpdateMember {
                    name: Some("Hana".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!outcome.is_applied());
        assert!(outcome.into_dispatch().is_none());
    }

    #[tokio::test]
    async fn test_failing_endpoint_does_not_fail_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let org = TestOrganization::new().await;
        let (webhook, _) = org
            .add_webhook(
                format!("{}/hooks", server.uri()),
                &[events::TEAM_MEMBER_REMOVED],
            )
            .await;
        let agent = org.add_member("Hana", MemberRole::Agent).await;

        let outcome = org
            .core
            .team()
            .remove_member(Some(&org.admin_ctx()), org.id, agent.id())
            .await
            .unwrap();
        let report = outcome.into_dispatch().unwrap().report().await.unwrap();
        assert_eq!(report.failed, 1);

        let stored = org.store.get_webhook(webhook.id()).await.unwrap().unwrap();
        assert!(stored.last_triggered.is_some());
        assert!(stored.last_delivered_at.is_none());
    }

    #[tokio::test]
    async fn test_deactivated_webhook_is_skipped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let org = TestOrganization::new().await;
        let (webhook, _) = org
            .add_webhook(format!("{}/hooks", server.uri()), &["*"])
            .await;
        org.core
            .webhooks()
            .update(
                Some(&org.admin_ctx()),
                org.id,
                webhook.id(),
                UpdateWebhookRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let report = org
            .core
            .dispatcher()
            .dispatch(org.id, events::TEAM_MEMBER_CREATED, serde_json::json!({}))
            .await;
        assert_eq!(report.matched, 0);
    }

    #[tokio::test]
    async fn test_only_admins_manage_webhooks() {
        let org = TestOrganization::new().await;
        let manager = org.add_member("Maya", MemberRole::Manager).await;
        let (webhook, _) = org
            .add_webhook("https://hooks.example.com/crm".to_string(), &["*"])
            .await;

        let listed = org
            .core
            .webhooks()
            .list(Some(&ctx(&manager)), org.id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);

        let err = org
            .core
            .webhooks()
            .delete(Some(&ctx(&manager)), org.id, webhook.id())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PermissionDenied { .. }));
    }
}
