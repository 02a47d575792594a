use uuid::Uuid;

/// A player id no other test in the run will use.
///
/// ```
/// use backend_test_support::players::unique_player;
///
/// let a = unique_player("alice");
/// assert!(a.starts_with("alice-"));
/// assert_ne!(a, unique_player("alice"));
/// ```
pub fn unique_player(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
