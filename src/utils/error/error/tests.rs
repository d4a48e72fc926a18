//! Tests for error handling

#[cfg(test)]
mod tests {
    use super::super::types::GatewayError;
    use actix_web::ResponseError;

    // ==================== Helper Function Tests ====================

    #[test]
    fn test_permission_denied_helper() {
        let error = GatewayError::permission_denied("team", "delete");
        assert!(matches!(
            &error,
            GatewayError::PermissionDenied { resource, action } if resource == "team" && action == "delete"
        ));
        assert_eq!(error.to_string(), "Permission denied: cannot delete team");
    }

    #[test]
    fn test_not_found_helper() {
        let error = GatewayError::not_found("handoff");
        assert!(matches!(error, GatewayError::NotFound(msg) if msg == "handoff"));
    }

    #[test]
    fn test_validation_helper() {
        let error = GatewayError::validation("name cannot be empty");
        assert!(matches!(error, GatewayError::Validation(msg) if msg == "name cannot be empty"));
    }

    // ==================== Status Code Mapping Tests ====================

    #[test]
    fn test_authentication_maps_to_401() {
        let response = GatewayError::AuthenticationRequired.error_response();
        assert_eq!(response.status().as_u16(), 401);
    }

    #[test]
    fn test_authorization_family_maps_to_403() {
        for error in [
            GatewayError::OrganizationMismatch,
            GatewayError::permission_denied("lead", "update"),
            GatewayError::elevation_denied("cannot grant admin"),
            GatewayError::SelfActionDenied,
        ] {
            assert_eq!(error.error_response().status().as_u16(), 403, "{}", error);
        }
    }

    #[test]
    fn test_invariant_violations_map_to_409() {
        assert_eq!(
            GatewayError::LastAdminProtected
                .error_response()
                .status()
                .as_u16(),
            409
        );
        assert_eq!(
            GatewayError::already_in_state("handoff pending")
                .error_response()
                .status()
                .as_u16(),
            409
        );
        assert_eq!(
            GatewayError::conflict("version mismatch")
                .error_response()
                .status()
                .as_u16(),
            409
        );
    }

    #[test]
    fn test_internal_errors_are_redacted() {
        let error = GatewayError::storage("lock poisoned at table members");
        assert_eq!(error.status_code().as_u16(), 500);
        assert_eq!(error.code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_guard_rejection_classification() {
        assert!(GatewayError::LastAdminProtected.is_guard_rejection());
        assert!(GatewayError::SelfActionDenied.is_guard_rejection());
        assert!(!GatewayError::conflict("x").is_guard_rejection());
        assert!(!GatewayError::internal("x").is_guard_rejection());
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            GatewayError::AuthenticationRequired.code(),
            "AUTHENTICATION_REQUIRED"
        );
        assert_eq!(GatewayError::LastAdminProtected.code(), "LAST_ADMIN_PROTECTED");
        assert_eq!(GatewayError::validation("x").code(), "VALIDATION_ERROR");
    }
}
