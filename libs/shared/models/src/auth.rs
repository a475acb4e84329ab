use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::contact::Email;
use crate::id::UniqueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Patient,
    Provider,
    Admin,
}

const PATIENT_PERMISSIONS: &[&str] = &[
    "appointment:view_own",
    "appointment:create",
    "appointment:cancel_own",
    "patient:view_own",
    "patient:update_own",
];

const PROVIDER_PERMISSIONS: &[&str] = &[
    "appointment:view_own",
    "appointment:view_assigned",
    "appointment:start",
    "appointment:complete",
    "appointment:cancel_assigned",
    "patient:view_assigned",
    "provider:view_own",
    "provider:update_own",
];

const ADMIN_PERMISSIONS: &[&str] = &[
    "appointment:view_all",
    "appointment:create",
    "appointment:update_all",
    "appointment:delete",
    "patient:view_all",
    "patient:create",
    "patient:update_all",
    "patient:delete",
    "provider:view_all",
    "provider:create",
    "provider:update_all",
    "provider:delete",
    "clinic:view_all",
    "clinic:create",
    "clinic:update_all",
    "clinic:delete",
];

impl UserRole {
    /// Declarative permission table for the role. The appointment use cases
    /// apply their own explicit policy predicates; this table backs the
    /// coarser checks (patient and provider administration).
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            UserRole::Patient => PATIENT_PERMISSIONS,
            UserRole::Provider => PROVIDER_PERMISSIONS,
            UserRole::Admin => ADMIN_PERMISSIONS,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions().contains(&permission)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Provider => "provider",
            UserRole::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(UserRole::Patient),
            "provider" => Ok(UserRole::Provider),
            "admin" => Ok(UserRole::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// The actor behind a request, as vouched for by the authentication layer.
///
/// `entity_id` is the patient or provider record the actor may act as; it is
/// distinct from `id`, the login identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    id: UniqueId,
    email: Email,
    name: String,
    role: UserRole,
    entity_id: UniqueId,
}

impl AuthenticatedUser {
    pub fn new(
        id: UniqueId,
        email: Email,
        name: impl Into<String>,
        role: UserRole,
        entity_id: UniqueId,
    ) -> Self {
        Self {
            id,
            email,
            name: name.into(),
            role,
            entity_id,
        }
    }

    pub fn id(&self) -> &UniqueId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn entity_id(&self) -> &UniqueId {
        &self.entity_id
    }

    pub fn is_patient(&self) -> bool {
        self.role == UserRole::Patient
    }

    pub fn is_provider(&self) -> bool {
        self.role == UserRole::Provider
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.role.has_permission(permission)
    }

    pub fn can_access_patient(&self, patient_id: &UniqueId) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Patient => &self.entity_id == patient_id,
            UserRole::Provider => self.has_permission("patient:view_assigned"),
        }
    }

    pub fn can_access_appointment(&self, patient_id: &UniqueId, provider_id: &UniqueId) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Patient => &self.entity_id == patient_id,
            UserRole::Provider => &self.entity_id == provider_id,
        }
    }
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub entity_id: String,
    pub exp: Option<u64>,
    pub iat: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole, entity: &str) -> AuthenticatedUser {
        AuthenticatedUser::new(
            UniqueId::new("user-1"),
            Email::parse("someone@clinic.com").unwrap(),
            "Someone",
            role,
            UniqueId::new(entity),
        )
    }

    #[test]
    fn permission_table_matches_roles() {
        assert!(UserRole::Patient.has_permission("appointment:create"));
        assert!(!UserRole::Patient.has_permission("appointment:start"));
        assert!(UserRole::Provider.has_permission("appointment:complete"));
        assert!(!UserRole::Provider.has_permission("appointment:create"));
        assert!(UserRole::Admin.has_permission("appointment:view_all"));
        assert!(!UserRole::Admin.has_permission("appointment:start"));
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [UserRole::Patient, UserRole::Provider, UserRole::Admin] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("nurse".parse::<UserRole>().is_err());
    }

    #[test]
    fn appointment_access_follows_role() {
        let patient_id = UniqueId::new("patient-1");
        let provider_id = UniqueId::new("provider-1");

        assert!(user(UserRole::Patient, "patient-1").can_access_appointment(&patient_id, &provider_id));
        assert!(!user(UserRole::Patient, "patient-2").can_access_appointment(&patient_id, &provider_id));
        assert!(user(UserRole::Provider, "provider-1").can_access_appointment(&patient_id, &provider_id));
        assert!(!user(UserRole::Provider, "provider-2").can_access_appointment(&patient_id, &provider_id));
        assert!(user(UserRole::Admin, "admin-1").can_access_appointment(&patient_id, &provider_id));
    }

    #[test]
    fn providers_may_view_patients() {
        let patient_id = UniqueId::new("patient-1");
        assert!(user(UserRole::Provider, "provider-9").can_access_patient(&patient_id));
        assert!(!user(UserRole::Patient, "patient-2").can_access_patient(&patient_id));
    }
}
