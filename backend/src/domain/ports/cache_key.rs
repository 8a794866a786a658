//! Cache key for resolved user mappings.

use std::borrow::Cow;

/// Namespace prefix shared by every user mapping cache entry.
pub const USER_MAPPING_CACHE_PREFIX: &str = "user-mapping";

/// Key under which a resolved [`crate::domain::UserId`] is cached.
///
/// The key is derived from the pair *as supplied*, so `(a, b)` and `(b, a)`
/// occupy separate entries that both point at the same token once each
/// ordering has been resolved. Backslashes and colons inside an identifier
/// are escaped, so `("a:b", "c")` and `("a", "b:c")` never share a key.
///
/// # Examples
/// ```
/// use user_mapping::domain::ports::UserMappingCacheKey;
///
/// let key = UserMappingCacheKey::pack("id1", "id2");
/// assert_eq!(key.as_str(), "user-mapping:id1:id2");
/// assert_ne!(key, UserMappingCacheKey::pack("id2", "id1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserMappingCacheKey(String);

impl UserMappingCacheKey {
    /// Build the key for the ordered pair `(id1, id2)`.
    pub fn pack(id1: &str, id2: &str) -> Self {
        Self(format!(
            "{USER_MAPPING_CACHE_PREFIX}:{}:{}",
            escape_component(id1),
            escape_component(id2)
        ))
    }

    /// Borrow the underlying key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn escape_component(id: &str) -> Cow<'_, str> {
    if !id.contains(['\\', ':']) {
        return Cow::Borrowed(id);
    }
    let mut escaped = String::with_capacity(id.len() + 4);
    for ch in id.chars() {
        if matches!(ch, '\\' | ':') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Cow::Owned(escaped)
}

impl std::fmt::Display for UserMappingCacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for UserMappingCacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
