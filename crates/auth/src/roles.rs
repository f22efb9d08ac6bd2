use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for route gating.
///
/// Roles are opaque strings as stored in the profile store; only `admin`
/// carries meaning for the guard. Anything else is treated as a plain user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Role given to every identity without an explicit grant.
    pub const USER: Role = Role(Cow::Borrowed("user"));

    /// Privileged tier.
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Normalize a role as read from a stored profile.
    ///
    /// Missing or blank roles fall back to [`Role::USER`]; any other value is
    /// kept verbatim.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some(name) if !name.trim().is_empty() => Self::new(name.to_string()),
            _ => Self::USER,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.as_str() == Self::ADMIN.as_str()
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::USER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn missing_or_blank_role_falls_back_to_user() {
        assert_eq!(Role::from_stored(None), Role::USER);
        assert_eq!(Role::from_stored(Some("")), Role::USER);
        assert_eq!(Role::from_stored(Some("  ")), Role::USER);
    }

    #[test]
    fn admin_is_matched_exactly() {
        assert!(Role::from_stored(Some("admin")).is_admin());
        assert!(!Role::from_stored(Some("Admin")).is_admin());
        assert!(!Role::USER.is_admin());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: a non-blank stored role is preserved exactly.
        #[test]
        fn non_blank_roles_are_kept_verbatim(name in "[a-z_]{1,12}") {
            let role = Role::from_stored(Some(&name));
            prop_assert_eq!(role.as_str(), name.as_str());
        }
    }
}
