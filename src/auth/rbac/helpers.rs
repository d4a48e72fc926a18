//! Helper methods for delegating permissions

use crate::utils::error::{GatewayError, Result};

use super::system::AuthorizationResolver;
use super::types::{EffectivePermissionSet, PermissionOverrides};

impl AuthorizationResolver {
    /// Ensure every allow in `overrides` is held by the granting actor.
    ///
    /// Deny overrides can always be handed out.
    pub fn ensure_grantable(
        &self,
        granter: &EffectivePermissionSet,
        overrides: &PermissionOverrides,
    ) -> Result<()> {
        for (resource, action, allowed) in overrides.iter() {
            if allowed && !granter.allows(resource, action) {
                return Err(GatewayError::elevation_denied(format!(
                    "cannot grant {}.{} without holding it",
                    resource, action
                )));
            }
        }
        Ok(())
    }
}
