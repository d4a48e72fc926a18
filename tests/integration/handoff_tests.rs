//! Handoff lifecycle integration tests

#[cfg(test)]
mod tests {
    use crate::common::assertions::{AuditAssertions, assert_signed_by};
    use crate::common::{TestOrganization, ctx};
    use crm_gateway::core::handoff::HandoffRequest;
    use crm_gateway::core::models::HandoffProjectionStatus;
    use crm_gateway::core::webhooks::events;
    use crm_gateway::{GatewayError, HandoffStatus, MemberRole};
    use serde_json::Value;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ai_request_then_human_accept() {
        let org = TestOrganization::new().await;
        let bot = org.add_member("Scout", MemberRole::Ai).await;
        let human = org.add_member("Hana", MemberRole::Agent).await;
        let lead = org.add_lead("Globex").await;

        let handoff = org
            .core
            .handoffs()
            .request_handoff(
                Some(&ctx(&bot)),
                org.id,
                lead.id(),
                HandoffRequest::new("needs pricing"),
            )
            .await
            .unwrap()
            .value;

        let pending = org
            .core
            .handoffs()
            .pending_handoffs(Some(&ctx(&human)), org.id)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id(), handoff.id());

        let accepted = org
            .core
            .handoffs()
            .accept_handoff(
                Some(&ctx(&human)),
                org.id,
                handoff.id(),
                Some("calling them today".to_string()),
            )
            .await
            .unwrap()
            .value;
        assert_eq!(accepted.status, HandoffStatus::Accepted);
        assert_eq!(accepted.accepted_by, Some(human.id()));
        assert_eq!(accepted.resolved_by, Some(human.id()));

        let lead = org.lead(lead.id()).await;
        assert_eq!(lead.assigned_to, Some(human.id()));
        let state = lead.handoff_state.expect("Projection should be present");
        assert_eq!(state.status, HandoffProjectionStatus::Completed);
        assert_eq!(state.handoff_id, handoff.id());
        assert_eq!(state.from_member_id, bot.id());
        assert_eq!(state.to_member_id, Some(human.id()));
        assert_eq!(state.notes.as_deref(), Some("calling them today"));
        let completed_at = state.completed_at.expect("Completion time should be set");
        assert!(completed_at >= state.requested_at);
        assert!(accepted.resolved_at.unwrap() >= state.requested_at);

        assert!(
            org.core
                .handoffs()
                .pending_handoffs(Some(&ctx(&human)), org.id)
                .await
                .unwrap()
                .is_empty()
        );
        org.audit()
            .await
            .assert_latest_description("Accepted handoff of lead \"Globex\"");
    }

    #[tokio::test]
    async fn test_rejected_handoff_can_be_requested_again() {
        let org = TestOrganization::new().await;
        let bot = org.add_member("Scout", MemberRole::Ai).await;
        let lead = org.add_lead("Globex").await;
        let admin = org.admin_ctx();

        let first = org
            .core
            .handoffs()
            .request_handoff(Some(&ctx(&bot)), org.id, lead.id(), HandoffRequest::new("stuck"))
            .await
            .unwrap()
            .value;

        let err = org
            .core
            .handoffs()
            .request_handoff(Some(&ctx(&bot)), org.id, lead.id(), HandoffRequest::new("again"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::AlreadyInState(_)));

        org.core
            .handoffs()
            .reject_handoff(Some(&admin), org.id, first.id(), None)
            .await
            .unwrap();
        let state = org.lead(lead.id()).await.handoff_state.unwrap();
        assert_eq!(state.status, HandoffProjectionStatus::Rejected);
        assert_eq!(state.resolved_by, Some(org.admin.id()));
        assert_eq!(org.lead(lead.id()).await.assigned_to, None);

        let second = org
            .core
            .handoffs()
            .request_handoff(Some(&ctx(&bot)), org.id, lead.id(), HandoffRequest::new("again"))
            .await
            .unwrap()
            .value;
        assert_ne!(second.id(), first.id());
        assert_eq!(
            org.lead(lead.id()).await.handoff_state.unwrap().handoff_id,
            second.id()
        );
    }

    #[tokio::test]
    async fn test_handoff_events_are_signed_and_delivered() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/crm"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let org = TestOrganization::new().await;
        let (_, secret) = org
            .add_webhook(
                format!("{}/crm", server.uri()),
                &[events::LEAD_HANDOFF_REQUESTED, events::LEAD_HANDOFF_ACCEPTED],
            )
            .await;
        let bot = org.add_member("Scout", MemberRole::Ai).await;
        let lead = org.add_lead("Globex").await;

        let requested = org
            .core
            .handoffs()
            .request_handoff(Some(&ctx(&bot)), org.id, lead.id(), HandoffRequest::new("pricing"))
            .await
            .unwrap();
        let report = requested.dispatch.unwrap().report().await.unwrap();
        assert_eq!(report.delivered, 1);

        let accepted = org
            .core
            .handoffs()
            .accept_handoff(Some(&org.admin_ctx()), org.id, requested.value.id(), None)
            .await
            .unwrap();
        let report = accepted.dispatch.unwrap().report().await.unwrap();
        assert_eq!(report.delivered, 1);

        let received = server.received_requests().await.unwrap();
        let kinds: Vec<String> = received
            .iter()
            .map(|request| {
                assert_signed_by(request, &secret);
                let body: Value = serde_json::from_slice(&request.body).unwrap();
                body["event"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                events::LEAD_HANDOFF_REQUESTED.to_string(),
                events::LEAD_HANDOFF_ACCEPTED.to_string()
            ]
        );
    }
}
