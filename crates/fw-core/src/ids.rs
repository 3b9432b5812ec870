//! Field ids, id generation, and insert operation tokens.
//!
//! Ids are minted by a caller-supplied generator threaded through every call
//! that creates nodes (insert, duplicate, import). There is no process-wide
//! counter, so independent builders never collide.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one field node.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct FieldId(String);

impl FieldId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FieldId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Source of fresh field ids.
///
/// Implementations must be monotonic: an id is never handed out twice.
pub trait IdGenerator {
    /// Mint the next id.
    fn next_id(&mut self) -> FieldId;

    /// Record an id that already exists (e.g. from a loaded tree) so it is
    /// never minted again. The default does nothing.
    fn reserve(&mut self, _id: &FieldId) {}
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> FieldId {
        FieldId(self())
    }
}

/// Counter-backed generator producing `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// The counter value the next minted id will carry.
    #[must_use]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    fn suffix_of(&self, id: &FieldId) -> Option<u64> {
        id.as_str()
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("field")
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> FieldId {
        let id = FieldId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }

    fn reserve(&mut self, id: &FieldId) {
        if let Some(n) = self.suffix_of(id) {
            self.next = self.next.max(n.saturating_add(1));
        }
    }
}

/// Caller-supplied stable identifier of one insert gesture.
///
/// A host may deliver the same drop twice; the editor applies a given token
/// at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct OperationToken(String);

impl OperationToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
