//! CAM domain models
//!
//! These mirror the columns the appliance returns for device filters and
//! local user accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the appliance treats traffic matching a device or subnet filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Allow,
    Deny,
    Ignore,
    UseRole,
    Check,
}

impl FilterType {
    /// Wire name used by the appliance
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterType::Allow => "allow",
            FilterType::Deny => "deny",
            FilterType::Ignore => "ignore",
            FilterType::UseRole => "userole",
            FilterType::Check => "check",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(FilterType::Allow),
            "deny" => Ok(FilterType::Deny),
            "ignore" => Ok(FilterType::Ignore),
            "userole" => Ok(FilterType::UseRole),
            "check" => Ok(FilterType::Check),
            _ => Err(s.to_string()),
        }
    }
}

/// Access rule attached to a new filter entry
///
/// Roles only travel with the rule types that use them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAccess {
    Allow,
    Deny,
    Ignore,
    UseRole { role: String },
    Check { role: Option<String> },
}

impl FilterAccess {
    /// The wire rule type
    pub fn filter_type(&self) -> FilterType {
        match self {
            FilterAccess::Allow => FilterType::Allow,
            FilterAccess::Deny => FilterType::Deny,
            FilterAccess::Ignore => FilterType::Ignore,
            FilterAccess::UseRole { .. } => FilterType::UseRole,
            FilterAccess::Check { .. } => FilterType::Check,
        }
    }

    /// Role that travels with this rule, if any
    pub fn role(&self) -> Option<&str> {
        match self {
            FilterAccess::UseRole { role } => Some(role),
            FilterAccess::Check { role } => role.as_deref(),
            _ => None,
        }
    }
}

/// Entry in the Device Filters list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamDevice {
    pub mac_address: String,
    pub filter_type: FilterType,
    pub ip_address: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub server_ip: Option<String>,
}

/// Local user account on the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CamLocalUser {
    pub username: String,
    pub role: String,
}

impl CamLocalUser {
    /// A user with the given role
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role: role.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_wire_names() {
        for ty in [
            FilterType::Allow,
            FilterType::Deny,
            FilterType::Ignore,
            FilterType::UseRole,
            FilterType::Check,
        ] {
            assert_eq!(ty.as_str().parse::<FilterType>(), Ok(ty));
        }
        assert_eq!("USEROLE".parse::<FilterType>(), Ok(FilterType::UseRole));
        assert!("quarantine".parse::<FilterType>().is_err());
    }

    #[test]
    fn test_filter_access_role() {
        assert_eq!(FilterAccess::Allow.role(), None);
        assert_eq!(
            FilterAccess::UseRole { role: "Guest".to_string() }.role(),
            Some("Guest")
        );
        assert_eq!(FilterAccess::Check { role: None }.role(), None);
        assert_eq!(FilterAccess::Check { role: None }.filter_type(), FilterType::Check);
    }
}
