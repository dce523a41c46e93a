//! Identifier newtypes.

use crate::{define_id_type, define_key_type};

define_id_type!(i64, ProgramId);
define_id_type!(i64, ConducteurId);
define_id_type!(i64, ElementId);
define_id_type!(i64, NotificationId);

define_key_type!(UserId);
define_key_type!(TenantId);

impl TenantId {
    /// A tenant is identified by its director's user id.
    pub fn director(&self) -> UserId {
        UserId(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_display_and_serde() {
        let id = ProgramId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.value(), 42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: ProgramId = serde_json::from_str("7").unwrap();
        assert_eq!(back, ProgramId(7));
    }

    #[test]
    fn test_key_id_serde_is_plain_string() {
        let user: UserId = serde_json::from_str("\"u-1\"").unwrap();
        assert_eq!(user, UserId::from("u-1"));
        assert_eq!(serde_json::to_string(&TenantId::new("t")).unwrap(), "\"t\"");
    }
}
