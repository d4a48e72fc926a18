//! Default permission tables per role

use crate::core::models::MemberRole;

use super::types::{Action, Resource};

/// Default grants for a role. `Manage` expands to every action on the resource.
pub(super) fn role_defaults(role: MemberRole) -> Vec<(Resource, Action)> {
    use Action::*;
    use Resource::*;

    match role {
        // Admin - full access
        MemberRole::Admin => [
            grant(Lead, &[Manage]),
            grant(Team, &[Manage]),
            grant(Webhook, &[Manage]),
            grant(Audit, &[Read]),
            grant(Organization, &[Manage]),
        ]
        .concat(),
        // Manager - team management and the full lead pipeline
        MemberRole::Manager => [
            grant(Lead, &[Manage]),
            grant(Team, &[Read, Create, Update, Delete]),
            grant(Webhook, &[Read]),
            grant(Audit, &[Read]),
            grant(Organization, &[Read]),
        ]
        .concat(),
        // Agent - works leads and takes handoffs
        MemberRole::Agent => [
            grant(Lead, &[Read, Create, Update]),
            grant(Team, &[Read]),
            grant(Organization, &[Read]),
        ]
        .concat(),
        // AI - reads leads and requests handoffs; cannot resolve them
        MemberRole::Ai => [
            grant(Lead, &[Read, Create]),
            grant(Team, &[Read]),
        ]
        .concat(),
    }
}

fn grant(resource: Resource, actions: &[Action]) -> Vec<(Resource, Action)> {
    if actions.contains(&Action::Manage) {
        return Action::ALL.iter().map(|action| (resource, *action)).collect();
    }
    actions.iter().map(|action| (resource, *action)).collect()
}
