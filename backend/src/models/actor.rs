//! Explicit caller identity passed into every core operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{TenantId, UserId};

/// Role of the authenticated user within a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages the grid, the hosts, and validates run-sheets.
    Director,
    /// On-air host ("animateur"), authors run-sheets.
    Host,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "director" | "directeur" => Ok(Role::Director),
            "host" | "animateur" => Ok(Role::Host),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Director => f.write_str("director"),
            Role::Host => f.write_str("host"),
        }
    }
}

/// Who is calling, and on behalf of which station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub user_id: UserId,
    pub role: Role,
    pub tenant: TenantId,
}

impl ActorContext {
    pub fn new(user_id: impl Into<UserId>, role: Role, tenant: impl Into<TenantId>) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            tenant: tenant.into(),
        }
    }

    /// The director of a station acts on their own tenant.
    pub fn director(tenant: impl Into<TenantId>) -> Self {
        let tenant = tenant.into();
        Self {
            user_id: tenant.director(),
            role: Role::Director,
            tenant,
        }
    }

    pub fn host(user_id: impl Into<UserId>, tenant: impl Into<TenantId>) -> Self {
        Self::new(user_id, Role::Host, tenant)
    }

    pub fn is_director(&self) -> bool {
        self.role == Role::Director
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_director_context_uses_tenant_as_user() {
        let ctx = ActorContext::director("station-1");
        assert_eq!(ctx.user_id.as_str(), "station-1");
        assert!(ctx.is_director());
        assert_eq!(ctx.tenant.director(), ctx.user_id);
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Director".parse::<Role>().unwrap(), Role::Director);
        assert_eq!("animateur".parse::<Role>().unwrap(), Role::Host);
        assert!("listener".parse::<Role>().is_err());
    }
}
