/// Viewer role for a thread session. Exactly one applies per load, resolved
/// once from the current-user endpoint and then threaded as a plain value
/// into every resolver and session call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    President,
    Student,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}
