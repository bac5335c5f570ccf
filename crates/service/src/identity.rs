//! Who may post, and who owns what.
//!
//! Identity here is advisory: it is a display name typed at post time and
//! remembered in a cookie, not a verified credential. Anyone who can post
//! can impersonate any other allowed name. The trait seam exists so real
//! authentication can replace the allow-list without touching handlers.

/// Gate for mutations, keyed entirely on display-name strings.
pub trait IdentityPolicy: Send + Sync {
    /// Membership in the fixed allow-list of posters.
    fn is_authorized_poster(&self, name: &str) -> bool;

    /// Exact, case-sensitive match between the stored author and the
    /// session's current name. An absent session owns nothing.
    fn is_owner(&self, author_name: &str, session_name: Option<&str>) -> bool {
        session_name.is_some_and(|current| current == author_name)
    }
}

/// Static allow-list of display names, fixed at construction.
pub struct NameAllowList {
    names: Vec<String>,
}

impl NameAllowList {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl IdentityPolicy for NameAllowList {
    fn is_authorized_poster(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
