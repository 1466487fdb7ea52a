//! User identity records and role-derived permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::{Provider, ProviderSelection};

/// Reserved demo identity email (bypasses the registered-users list).
pub const DEMO_EMAIL: &str = "demo@mentora.app";

/// Fixed id of the demo identity.
pub const DEMO_USER_ID: &str = "usr_demo";

/// Account role on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Creator,
    Institution,
}

/// Where an account originally came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountOrigin {
    Email,
    Google,
    Github,
}

impl From<Provider> for AccountOrigin {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Google => AccountOrigin::Google,
            Provider::Github => AccountOrigin::Github,
        }
    }
}

/// Capability flags attached to every account.
///
/// Permissions are a pure function of the role: they are computed by
/// [`Permissions::for_role`] and never stored or edited independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub can_create_courses: bool,
    pub can_manage_institution: bool,
    pub can_access_ai_tutor: bool,
    pub has_premium_access: bool,
}

impl Permissions {
    /// Derive the permission set for a role.
    ///
    /// Only creators and institutions can create content; institutions
    /// additionally manage their organization. Every role gets AI tutor
    /// access, and premium features always start disabled.
    pub fn for_role(role: Role) -> Self {
        Self {
            can_create_courses: matches!(role, Role::Creator | Role::Institution),
            can_manage_institution: matches!(role, Role::Institution),
            can_access_ai_tutor: true,
            has_premium_access: false,
        }
    }
}

/// Counters shown on a learner's public profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub courses_enrolled: u32,
    pub courses_completed: u32,
    pub badges_earned: u32,
}

/// Public profile attached to every account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerProfile {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub stats: ProfileStats,
}

/// Subscription plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    Free,
    Pro,
    Campus,
}

/// Subscription billing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

/// Subscription state for an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub plan: PlanTier,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Default for Subscription {
    fn default() -> Self {
        Self {
            plan: PlanTier::Free,
            status: SubscriptionStatus::Active,
            expires_at: None,
        }
    }
}

/// A platform account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque, globally unique id.
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar_url: String,
    pub role: Role,
    pub origin: AccountOrigin,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub profile: LearnerProfile,
    pub subscription: Subscription,
    pub permissions: Permissions,
}

impl User {
    fn build(
        id: String,
        email: &str,
        name: &str,
        role: Role,
        origin: AccountOrigin,
        verified: bool,
    ) -> Self {
        let avatar_url = format!("https://avatars.mentora.app/u/{id}.png");
        Self {
            id,
            email: email.to_string(),
            name: name.to_string(),
            avatar_url,
            role,
            origin,
            verified,
            created_at: Utc::now(),
            profile: LearnerProfile::default(),
            subscription: Subscription::default(),
            permissions: Permissions::for_role(role),
        }
    }

    /// New email/password account. The email stays unverified until a
    /// verification flow exists.
    pub fn register(name: &str, email: &str, role: Role) -> Self {
        Self::build(
            uuid::Uuid::new_v4().to_string(),
            email,
            name,
            role,
            AccountOrigin::Email,
            false,
        )
    }

    /// Account synthesized from a federated sign-in selection. The
    /// provider vouches for the email, so it arrives verified; the role
    /// defaults to student unless the chosen identity carries one.
    pub fn from_provider(provider: Provider, selection: &ProviderSelection) -> Self {
        Self::build(
            uuid::Uuid::new_v4().to_string(),
            &selection.email,
            &selection.name,
            selection.role.unwrap_or(Role::Student),
            AccountOrigin::from(provider),
            true,
        )
    }

    /// The reserved demo identity.
    pub fn demo() -> Self {
        Self::build(
            DEMO_USER_ID.to_string(),
            DEMO_EMAIL,
            "Demo Learner",
            Role::Student,
            AccountOrigin::Email,
            true,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_permissions() {
        let permissions = Permissions::for_role(Role::Student);
        assert!(!permissions.can_create_courses);
        assert!(!permissions.can_manage_institution);
        assert!(permissions.can_access_ai_tutor);
        assert!(!permissions.has_premium_access);
    }

    #[test]
    fn test_creator_permissions() {
        let permissions = Permissions::for_role(Role::Creator);
        assert!(permissions.can_create_courses);
        assert!(!permissions.can_manage_institution);
        assert!(permissions.can_access_ai_tutor);
        assert!(!permissions.has_premium_access);
    }

    #[test]
    fn test_institution_permissions() {
        let permissions = Permissions::for_role(Role::Institution);
        assert!(permissions.can_create_courses);
        assert!(permissions.can_manage_institution);
        assert!(permissions.can_access_ai_tutor);
        assert!(!permissions.has_premium_access);
    }

    #[test]
    fn test_register_builds_unverified_email_account() {
        let user = User::register("Ana", "ana@x.com", Role::Creator);

        assert_eq!(user.email, "ana@x.com");
        assert_eq!(user.role, Role::Creator);
        assert_eq!(user.origin, AccountOrigin::Email);
        assert!(!user.verified);
        assert_eq!(user.permissions, Permissions::for_role(Role::Creator));
        assert_eq!(user.subscription.plan, PlanTier::Free);
        assert_eq!(user.profile.stats, ProfileStats::default());
        assert!(user.avatar_url.contains(&user.id));
    }

    #[test]
    fn test_register_ids_are_unique() {
        let a = User::register("Ana", "ana@x.com", Role::Student);
        let b = User::register("Ana", "ana@x.com", Role::Student);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_from_provider_defaults_to_student() {
        let selection = ProviderSelection {
            provider: Provider::Google,
            email: "liam@gmail.com".to_string(),
            name: "Liam Okafor".to_string(),
            role: None,
        };
        let user = User::from_provider(Provider::Google, &selection);

        assert_eq!(user.role, Role::Student);
        assert_eq!(user.origin, AccountOrigin::Google);
        assert!(user.verified);
    }

    #[test]
    fn test_from_provider_honors_selected_role() {
        let selection = ProviderSelection {
            provider: Provider::Github,
            email: "kate@hey.com".to_string(),
            name: "Kate Lindgren".to_string(),
            role: Some(Role::Creator),
        };
        let user = User::from_provider(Provider::Github, &selection);

        assert_eq!(user.role, Role::Creator);
        assert_eq!(user.origin, AccountOrigin::Github);
        assert!(user.permissions.can_create_courses);
    }

    #[test]
    fn test_demo_identity() {
        let user = User::demo();
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.email, DEMO_EMAIL);
        assert_eq!(user.role, Role::Student);
        assert!(user.verified);
    }
}
