//! Access guard: decide what a route evaluation yields for a session.

use serde::Serialize;

use crate::{Role, Session};

/// Access requirement declared by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessRequirement {
    Public,
    Authenticated,
    /// Authenticated and holding the `admin` role.
    Admin,
}

impl AccessRequirement {
    /// Build a requirement from the two route flags; `require_admin` implies
    /// `require_auth`.
    pub fn from_flags(require_auth: bool, require_admin: bool) -> Self {
        match (require_auth, require_admin) {
            (_, true) => Self::Admin,
            (true, false) => Self::Authenticated,
            (false, false) => Self::Public,
        }
    }

    pub fn requires_auth(self) -> bool {
        !matches!(self, Self::Public)
    }

    pub fn requires_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Details shown to a caller who is signed in but lacks the required role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDenial {
    pub actual_role: Role,
    pub required_role: Role,
}

impl AccessDenial {
    pub fn actual_role_line(&self) -> String {
        format!("Your role: {}", self.actual_role)
    }

    pub fn required_role_line(&self) -> String {
        format!("Required role: {}", self.required_role)
    }
}

impl core::fmt::Display for AccessDenial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "role '{}' does not satisfy required role '{}'",
            self.actual_role, self.required_role
        )
    }
}

/// Outcome of a single guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Session not resolved yet: show a neutral loading indicator.
    Pending,
    /// Route needs a signed-in identity and there is none.
    RedirectToLogin,
    /// Signed in, but the role is insufficient; show the denial then leave.
    Deny(AccessDenial),
    Render,
}

impl GuardDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::RedirectToLogin => "redirect_to_login",
            Self::Deny(_) => "deny",
            Self::Render => "render",
        }
    }
}

/// Decide a route requirement against the current session.
///
/// - No IO
/// - No panics
/// - No state: the same inputs always yield the same decision
pub fn evaluate(session: &Session, requirement: AccessRequirement) -> GuardDecision {
    if session.is_initializing() {
        return GuardDecision::Pending;
    }

    if requirement.requires_auth() && !session.is_authenticated() {
        return GuardDecision::RedirectToLogin;
    }

    if requirement.requires_admin() && !session.is_admin() {
        return GuardDecision::Deny(AccessDenial {
            actual_role: session.role().cloned().unwrap_or(Role::USER),
            required_role: Role::ADMIN,
        });
    }

    GuardDecision::Render
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuthorizationRecord, Identity, ProfileRecord};
    use proptest::prelude::*;
    use stockgate_core::IdentityId;

    const ALL: [AccessRequirement; 3] = [
        AccessRequirement::Public,
        AccessRequirement::Authenticated,
        AccessRequirement::Admin,
    ];

    fn signed_in_as(role: &str) -> Session {
        let identity = Identity::new(IdentityId::new("u1").unwrap(), "Sari");
        let record = AuthorizationRecord::from_profile(ProfileRecord::new().with_role(role));
        Session::signed_in(identity, record)
    }

    #[test]
    fn initializing_is_pending_for_every_requirement() {
        for requirement in ALL {
            assert_eq!(evaluate(&Session::initializing(), requirement), GuardDecision::Pending);
        }
    }

    #[test]
    fn signed_out_is_redirected_from_protected_routes() {
        let session = Session::signed_out();
        assert_eq!(evaluate(&session, AccessRequirement::Public), GuardDecision::Render);
        assert_eq!(
            evaluate(&session, AccessRequirement::Authenticated),
            GuardDecision::RedirectToLogin
        );
        assert_eq!(evaluate(&session, AccessRequirement::Admin), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn plain_user_is_denied_admin_with_both_roles_shown() {
        let decision = evaluate(&signed_in_as("user"), AccessRequirement::Admin);
        let GuardDecision::Deny(denial) = decision else {
            panic!("expected Deny, got {decision:?}");
        };
        assert_eq!(denial.actual_role_line(), "Your role: user");
        assert_eq!(denial.required_role_line(), "Required role: admin");
    }

    #[test]
    fn admin_renders_every_route() {
        let session = signed_in_as("admin");
        for requirement in ALL {
            assert_eq!(evaluate(&session, requirement), GuardDecision::Render);
        }
    }

    #[test]
    fn admin_flag_implies_auth_flag() {
        assert_eq!(AccessRequirement::from_flags(false, true), AccessRequirement::Admin);
        assert_eq!(AccessRequirement::from_flags(true, false), AccessRequirement::Authenticated);
        assert_eq!(AccessRequirement::from_flags(false, false), AccessRequirement::Public);
        assert!(AccessRequirement::Admin.requires_auth());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: any non-admin role is denied the admin tier, never rendered,
        /// and the denial reports the role it saw.
        #[test]
        fn non_admin_roles_never_render_admin(role in "[a-z]{1,10}") {
            prop_assume!(role != "admin");
            let decision = evaluate(&signed_in_as(&role), AccessRequirement::Admin);
            match decision {
                GuardDecision::Deny(denial) => {
                    prop_assert_eq!(denial.actual_role.as_str(), role.as_str());
                    prop_assert!(denial.required_role.is_admin());
                }
                other => prop_assert!(false, "unexpected decision {:?}", other),
            }
        }
    }
}
