//! Reference path forms and temporary reference name generation.
//!
//! GitHub addresses a branch in two ways: reads, updates, and deletes use the
//! head path (`heads/<name>`), while creation takes the fully qualified path
//! (`refs/heads/<name>`).

use uuid::Uuid;

const HEADS_PREFIX: &str = "heads/";
const REFS_PREFIX: &str = "refs/";

/// Head path of a branch, used for read, update, and delete routes.
///
/// ```
/// use refscope::github::naming::head_path;
///
/// assert_eq!(head_path("main"), "heads/main");
/// ```
#[must_use]
pub fn head_path(reference: &str) -> String {
    format!("{HEADS_PREFIX}{reference}")
}

/// Fully qualified path of a branch, used only when creating it.
///
/// ```
/// use refscope::github::naming::fully_qualified_path;
///
/// assert_eq!(fully_qualified_path("main"), "refs/heads/main");
/// ```
#[must_use]
pub fn fully_qualified_path(reference: &str) -> String {
    format!("{REFS_PREFIX}{}", head_path(reference))
}

/// Source of the random suffix appended to temporary reference names.
pub trait TokenSource: Send + Sync {
    /// Returns a fresh token. Successive tokens must not collide.
    fn next_token(&self) -> String;
}

/// Token source backed by random (v4) UUIDs in their 32 character hex form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn next_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Generates `<base_ref>-<token>` using the supplied token source.
#[must_use]
pub fn generate_unique_name(source: &dyn TokenSource, base_ref: &str) -> String {
    format!("{base_ref}-{}", source.next_token())
}
