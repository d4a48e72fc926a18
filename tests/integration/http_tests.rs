//! HTTP surface integration tests

#[cfg(test)]
mod tests {
    use crate::common::test_config;
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use crm_gateway::core::organization::NewOrganization;
    use crm_gateway::core::team::NewMember;
    use crm_gateway::server::middleware::AuthMiddleware;
    use crm_gateway::server::{AppState, configure_app};
    use crm_gateway::storage::WriteBatch;
    use crm_gateway::{DocumentStore, InMemoryStore, Lead, MemberRole, TeamMember};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use uuid::Uuid;

    struct Session {
        org_id: Uuid,
        admin: TeamMember,
        token: String,
    }

    impl Session {
        /// Bootstrap "Acme" and sign a token for its admin
        async fn open(state: &AppState) -> Self {
            let bootstrap = state
                .core
                .organizations()
                .create_organization(NewOrganization {
                    name: "Acme".to_string(),
                    admin_name: "Ada".to_string(),
                    admin_email: None,
                })
                .await
                .unwrap()
                .value;
            let token = state.jwt.create_access_token(&bootstrap.admin).unwrap();

            Self {
                org_id: bootstrap.organization.id(),
                admin: bootstrap.admin,
                token,
            }
        }

        /// Add a member as the admin and sign a token for them
        async fn enroll(&self, state: &AppState, name: &str, role: MemberRole) -> (TeamMember, String) {
            let admin = crate::common::ctx(&self.admin);
            let member = state
                .core
                .team()
                .create_member(Some(&admin), self.org_id, NewMember::new(name, role))
                .await
                .unwrap()
                .value;
            let token = state.jwt.create_access_token(&member).unwrap();
            (member, token)
        }

        fn uri(&self, path: &str) -> String {
            format!("/v1/organizations/{}{}", self.org_id, path)
        }
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_handoff_flow_over_http() {
        let store = Arc::new(InMemoryStore::new());
        let state = AppState::new(test_config(), store.clone()).unwrap();
        let session = Session::open(&state).await;
        let (_, bot_token) = session.enroll(&state, "Scout", MemberRole::Ai).await;
        let (agent, agent_token) = session.enroll(&state, "Hana", MemberRole::Agent).await;

        let lead = Lead::new(session.org_id, "Globex");
        let mut batch = WriteBatch::new();
        batch.insert(lead.clone());
        store.commit(batch).await.unwrap();

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(AuthMiddleware)
                .configure(configure_app(1024 * 1024)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&session.uri(&format!("/leads/{}/handoffs", lead.id())))
            .insert_header(bearer(&bot_token))
            .set_json(json!({"reason": "needs pricing", "suggestedActions": ["call back"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "pending");
        let handoff_id = body["data"]["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri(&session.uri("/handoffs/pending"))
            .insert_header(bearer(&agent_token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        // The AI member may not resolve handoffs
        let req = test::TestRequest::post()
            .uri(&session.uri(&format!("/handoffs/{}/accept", handoff_id)))
            .insert_header(bearer(&bot_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri(&session.uri(&format!("/handoffs/{}/accept", handoff_id)))
            .insert_header(bearer(&agent_token))
            .set_json(json!({"notes": "on it"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["status"], "accepted");
        assert_eq!(body["data"]["acceptedBy"], agent.id().to_string());
        assert_eq!(body["data"]["notes"], "on it");

        let stored = store.get_lead(lead.id()).await.unwrap().unwrap();
        assert_eq!(stored.assigned_to, Some(agent.id()));

        let req = test::TestRequest::get()
            .uri(&session.uri(&format!("/audit?entityType=lead&entityId={}", lead.id())))
            .insert_header(bearer(&session.token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["description"], "Accepted handoff of lead \"Globex\"");
    }

    #[actix_web::test]
    async fn test_guard_rejections_map_to_status_codes() {
        let state = AppState::new(test_config(), Arc::new(InMemoryStore::new())).unwrap();
        let session = Session::open(&state).await;
        let admin_uri = session.uri(&format!("/team/members/{}", session.admin.id()));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(AuthMiddleware)
                .configure(configure_app(1024 * 1024)),
        )
        .await;

        let req = test::TestRequest::patch()
            .uri(&admin_uri)
            .insert_header(bearer(&session.token))
            .set_json(json!({"role": "agent"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "LAST_ADMIN_PROTECTED");

        let req = test::TestRequest::delete()
            .uri(&admin_uri)
            .insert_header(bearer(&session.token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "SELF_ACTION_DENIED");

        let req = test::TestRequest::get()
            .uri(&format!("/v1/organizations/{}/team/members", Uuid::new_v4()))
            .insert_header(bearer(&session.token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // A no-op status change reports `changed: false`
        let req = test::TestRequest::put()
            .uri(&format!("{}/status", admin_uri))
            .insert_header(bearer(&session.token))
            .set_json(json!({"status": "active"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["meta"]["changed"], false);
    }

    #[actix_web::test]
    async fn test_webhook_secret_is_returned_once() {
        let state = AppState::new(test_config(), Arc::new(InMemoryStore::new())).unwrap();
        let session = Session::open(&state).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .wrap(AuthMiddleware)
                .configure(configure_app(1024 * 1024)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&session.uri("/webhooks"))
            .insert_header(bearer(&session.token))
            .set_json(json!({"url": "https://hooks.example.com/crm", "events": ["*"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["data"]["secret"].as_str().unwrap().starts_with("whsec_"));
        assert!(body["data"]["webhook"].get("secret").is_none());

        let req = test::TestRequest::get()
            .uri(&session.uri("/webhooks"))
            .insert_header(bearer(&session.token))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let listed = body["data"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].get("secret").is_none());
        assert_eq!(listed[0]["url"], "https://hooks.example.com/crm");
    }
}
