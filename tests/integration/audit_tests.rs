//! Audit trail integration tests

#[cfg(test)]
mod tests {
    use crate::common::assertions::AuditAssertions;
    use crate::common::{TestOrganization, ctx};
    use crm_gateway::core::models::{AuditAction, AuditEntityType};
    use crm_gateway::core::team::NewMember;
    use crm_gateway::storage::{AuditFilter, DocKey, DocumentKind, WriteBatch};
    use crm_gateway::{DocumentStore, GatewayError, MemberRole};

    #[tokio::test]
    async fn test_every_change_is_audited_in_order() {
        let org = TestOrganization::new().await;
        let admin = org.admin_ctx();

        let created = org
            .core
            .team()
            .create_member(Some(&admin), org.id, NewMember::new("Hana", MemberRole::Agent))
            .await
            .unwrap();
        assert_eq!(created.audit.entity_id, created.value.id());
        org.core
            .team()
            .remove_member(Some(&admin), org.id, created.value.id())
            .await
            .unwrap();

        let history = org.audit().await;
        let actions: Vec<AuditAction> = history.iter().map(|entry| entry.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Remove, AuditAction::Create, AuditAction::Create]
        );
        assert!(history.iter().skip(1).all(|e| e.created_at <= history[0].created_at));
        assert_eq!(history[0].actor_id, Some(org.admin.id()));
        assert_eq!(history[0].organization_id, org.id);
    }

    #[tokio::test]
    async fn test_entries_are_immutable() {
        let org = TestOrganization::new().await;
        let before = org.audit().await;
        let entry = before[0].clone();

        let mut tampered = entry.clone();
        tampered.description = "Nothing happened".to_string();
        let mut batch = WriteBatch::new();
        batch.update(tampered, 1);
        let err = org.store.commit(batch).await.unwrap_err();
        assert!(matches!(err, GatewayError::Storage(_)));

        let mut batch = WriteBatch::new();
        batch.delete(DocKey::new(DocumentKind::Audit, entry.id), 1);
        assert!(org.store.commit(batch).await.is_err());

        // Re-inserting under the same id is rejected too
        let mut batch = WriteBatch::new();
        batch.insert(entry.clone());
        assert!(matches!(
            org.store.commit(batch).await.unwrap_err(),
            GatewayError::Conflict(_)
        ));

        assert_eq!(org.audit().await, before);
    }

    #[tokio::test]
    async fn test_history_requires_audit_permission() {
        let org = TestOrganization::new().await;
        let agent = org.add_member("Hana", MemberRole::Agent).await;
        let manager = org.add_member("Maya", MemberRole::Manager).await;

        let err = org
            .core
            .audit()
            .history(Some(&ctx(&agent)), org.id, &AuditFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PermissionDenied { .. }));

        let history = org
            .core
            .audit()
            .history(
                Some(&ctx(&manager)),
                org.id,
                &AuditFilter::for_entity(AuditEntityType::Organization, org.id),
            )
            .await
            .unwrap();
        assert_eq!(history.len(), 1);
        history.assert_latest_description("Created organization \"Acme\"");
    }

    #[tokio::test]
    async fn test_history_is_scoped_to_organization() {
        let acme = TestOrganization::new().await;
        let globex = acme.sibling("Globex").await;

        let history = globex
            .core
            .audit()
            .history(Some(&globex.admin_ctx()), globex.id, &AuditFilter::default())
            .await
            .unwrap();
        assert!(history.iter().all(|entry| entry.organization_id == globex.id));

        let err = globex
            .core
            .audit()
            .history(Some(&globex.admin_ctx()), acme.id, &AuditFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::OrganizationMismatch));
    }
}
