//! Team management integration tests

#[cfg(test)]
mod tests {
    use crate::common::assertions::assert_guard_rejection;
    use crate::common::{TestOrganization, ctx};
    use crm_gateway::core::team::{NewMember, UpdateMember};
    use crm_gateway::{GatewayError, MemberRole, MemberStatus};

    const ROLES: [MemberRole; 4] = [
        MemberRole::Ai,
        MemberRole::Agent,
        MemberRole::Manager,
        MemberRole::Admin,
    ];

    #[tokio::test]
    async fn test_sole_admin_cannot_demote_self() {
        let org = TestOrganization::new().await;
        org.add_member("Maya", MemberRole::Manager).await;

        let err = org
            .core
            .team()
            .update_member(
                Some(&org.admin_ctx()),
                org.id,
                org.admin.id(),
                UpdateMember {
                    role: Some(MemberRole::Agent),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::LastAdminProtected));
        assert_eq!(org.member(org.admin.id()).await.role, MemberRole::Admin);
        assert_eq!(org.active_admins().await, 1);
        // Only the bootstrap entry exists
        assert_eq!(org.audit().await.len(), 1);
    }

    #[tokio::test]
    async fn test_role_grants_are_bounded_by_rank() {
        let org = TestOrganization::new().await;

        for actor_role in [MemberRole::Agent, MemberRole::Manager, MemberRole::Admin] {
            let actor = org.add_member("Actor", actor_role).await;
            for granted in ROLES {
                let result = org
                    .core
                    .team()
                    .create_member(Some(&ctx(&actor)), org.id, NewMember::new("New", granted))
                    .await;

                if actor_role == MemberRole::Agent {
                    // Agents hold no team.create permission at all
                    assert_guard_rejection(&result.unwrap_err());
                } else if granted.rank() <= actor_role.rank() {
                    let member = result.unwrap().value;
                    assert_eq!(member.role, granted);
                    assert_eq!(member.invited_by, Some(actor.id()));
                } else {
                    assert!(matches!(
                        result.unwrap_err(),
                        GatewayError::ElevationDenied(_)
                    ));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_manager_cannot_touch_admin() {
        let org = TestOrganization::new().await;
        let manager = org.add_member("Maya", MemberRole::Manager).await;

        let err = org
            .core
            .team()
            .update_status(Some(&ctx(&manager)), org.id, org.admin.id(), MemberStatus::Busy)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ElevationDenied(_)));

        let err = org
            .core
            .team()
            .remove_member(Some(&ctx(&manager)), org.id, org.admin.id())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::ElevationDenied(_)));
        assert_eq!(org.active_admins().await, 1);
    }

    #[tokio::test]
    async fn test_two_admins_demoting_themselves_keep_one() {
        let org = TestOrganization::new().await;
        let second = org.add_member("Grace", MemberRole::Admin).await;
        let demote = || UpdateMember {
            role: Some(MemberRole::Manager),
            ..Default::default()
        };

        let first = org
            .core
            .team()
            .update_member(Some(&org.admin_ctx()), org.id, org.admin.id(), demote())
            .await
            .unwrap();
        assert!(first.is_applied());

        let err = org
            .core
            .team()
            .update_member(Some(&ctx(&second)), org.id, second.id(), demote())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::LastAdminProtected));

        assert_eq!(org.active_admins().await, 1);
        assert_eq!(org.member(second.id()).await.role, MemberRole::Admin);
    }

    #[tokio::test]
    async fn test_remove_then_reactivate_member() {
        let org = TestOrganization::new().await;
        let agent = org.add_member("Hana", MemberRole::Agent).await;
        let admin = org.admin_ctx();

        let removed = org
            .core
            .team()
            .remove_member(Some(&admin), org.id, agent.id())
            .await
            .unwrap();
        assert!(removed.is_applied());
        assert_eq!(org.member(agent.id()).await.status, MemberStatus::Inactive);

        // Removing twice is a no-op
        let again = org
            .core
            .team()
            .remove_member(Some(&admin), org.id, agent.id())
            .await
            .unwrap();
        assert!(!again.is_applied());

        let reactivated = org
            .core
            .team()
            .reactivate_member(Some(&admin), org.id, agent.id())
            .await
            .unwrap();
        assert_eq!(reactivated.value().status, MemberStatus::Active);
    }

    #[tokio::test]
    async fn test_members_are_scoped_to_their_organization() {
        let acme = TestOrganization::new().await;
        let globex = acme.sibling("Globex").await;

        let err = globex
            .core
            .team()
            .list_members(Some(&globex.admin_ctx()), acme.id)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::OrganizationMismatch));

        let err = acme
            .core
            .team()
            .remove_member(Some(&acme.admin_ctx()), acme.id, globex.admin.id())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound(_)));
    }
}
