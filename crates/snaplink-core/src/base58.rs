use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use snaplink_tinyflake::TinyId;
use std::fmt::Display;

/// A short code encoded as base58 string.
///
/// The alphabet leaves out `0`, `O`, `I` and `l`, and every character is
/// URL-safe, so the code can be used as a path segment unescaped.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShortCodeBase58(SmolStr);

impl ShortCodeBase58 {
    /// Creates a new `ShortCodeBase58` by encoding the given bytes as base58.
    ///
    /// # Examples
    ///
    /// ```
    /// use snaplink_core::base58::ShortCodeBase58;
    ///
    /// let code = ShortCodeBase58::new([0x10, 0x20, 0x30, 0x40, 0x50, 0x60]);
    /// assert!(!code.as_str().is_empty());
    /// ```
    pub fn new<T: AsRef<[u8]>>(bytes: T) -> Self {
        let encoded = bs58::encode(bytes).into_string();
        Self(SmolStr::new(encoded))
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCodeBase58").field(&self.0).finish()
    }
}

impl Display for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TinyId> for ShortCodeBase58 {
    fn from(val: TinyId) -> Self {
        ShortCodeBase58::new(val.into_bytes())
    }
}
