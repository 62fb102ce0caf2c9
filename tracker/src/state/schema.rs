//! Resource layout shared by the persistent data sources
//!
//! The HTTP source addresses records through these REST paths, and the file
//! source stamps its snapshot document with [`SNAPSHOT_VERSION`].

/// Current on-disk snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Collection resource for escalation records
pub const ESCALATIONS: &str = "escalations";

/// Collection resource for caller profiles
pub const PROFILES: &str = "profiles";

/// Collection resource for caller roles
pub const ROLES: &str = "roles";

/// Relative REST paths
pub mod paths {
    use super::{ESCALATIONS, PROFILES, ROLES};

    /// Path of the escalation collection
    pub fn escalations() -> String {
        format!("/{}", ESCALATIONS)
    }

    /// Path of a single escalation
    pub fn escalation(id: u64) -> String {
        format!("/{}/{}", ESCALATIONS, id)
    }

    /// Path of a caller's profile
    pub fn profile(subject: &str) -> String {
        format!("/{}/{}", PROFILES, urlencoding::encode(subject))
    }

    /// Path of a caller's role
    pub fn role(subject: &str) -> String {
        format!("/{}/{}", ROLES, urlencoding::encode(subject))
    }
}
