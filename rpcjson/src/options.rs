// SPDX-License-Identifier: Apache-2.0

/// What to do with an object key the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownKeys {
    /// Consume and discard the value, nested containers included.
    #[default]
    Ignore,
    /// Fail with [`ParseError::UnknownKey`](crate::ParseError::UnknownKey).
    Reject,
}

/// What to do when a declared key appears more than once in one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Each occurrence overwrites the previous one.
    #[default]
    LastWins,
    /// Later occurrences are consumed and discarded.
    FirstWins,
    /// Fail with [`ParseError::DuplicateKey`](crate::ParseError::DuplicateKey).
    Reject,
}

/// Knobs for a single deserialization pass.
///
/// ```
/// use rpcjson::{DuplicateKeys, ParseOptions, UnknownKeys};
///
/// let strict = ParseOptions::new()
///     .unknown_keys(UnknownKeys::Reject)
///     .duplicate_keys(DuplicateKeys::Reject)
///     .max_depth(32);
/// assert_eq!(strict.max_depth, Some(32));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub unknown_keys: UnknownKeys,
    pub duplicate_keys: DuplicateKeys,
    /// Deepest container nesting accepted, not counting the root frame.
    /// `None` means unbounded.
    pub max_depth: Option<usize>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unknown_keys(mut self, policy: UnknownKeys) -> Self {
        self.unknown_keys = policy;
        self
    }

    pub fn duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }
}
