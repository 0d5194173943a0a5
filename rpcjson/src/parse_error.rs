// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use crate::scalar::{EventKind, ValueKind};
use crate::tokenizer::SyntaxError;

/// Errors that abort the deserialization of a JSON value.
///
/// Every variant unwinds the whole top-level value: a target that was being
/// populated when one of these was returned must be discarded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The token stream itself was malformed.
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    /// The current frame has no slot for this event kind.
    #[error("unexpected {event} here")]
    UnexpectedEvent { event: EventKind },
    /// A scalar arrived whose subtype the target field does not accept.
    #[error("type mismatch: found {found}")]
    TypeMismatch { found: ValueKind },
    /// An object closed before one of its required keys was seen.
    #[error("missing required field `{key}`")]
    MissingRequiredField { key: &'static str },
    /// A key the schema does not declare, under the rejecting policy.
    #[error("unknown key `{key}`")]
    UnknownKey { key: String },
    /// A key seen twice, under the rejecting policy.
    #[error("duplicate key `{key}`")]
    DuplicateKey { key: &'static str },
    /// Right kind, but not one of the values the field allows.
    #[error("unexpected value, expected {expected}")]
    UnknownValue { expected: &'static str },
    /// An integer that does not fit the declared field type.
    #[error("number out of range for the target field")]
    OutOfRange,
    /// Nesting went deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },
    /// The engine entered an unexpected internal state.
    #[error("unexpected state: {0:?}")]
    Unexpected(UnexpectedState),
}

/// Internal invariant breaches of the frame stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnexpectedState {
    /// An event arrived after the root frame was popped.
    EmptyStack,
    /// A projector or setter was handed storage of the wrong type.
    TargetMismatch,
    /// A key event outside an object frame.
    KeyOutsideObject,
    /// A close event that does not match the open frame.
    MismatchedClose,
    /// `finish` was called with containers still open.
    UnbalancedStack,
}

impl From<UnexpectedState> for ParseError {
    fn from(info: UnexpectedState) -> Self {
        ParseError::Unexpected(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::ErrKind;
    use alloc::string::ToString;

    #[test]
    fn test_error_constructors() {
        let error: ParseError = UnexpectedState::TargetMismatch.into();
        match error {
            ParseError::Unexpected(info) => assert_eq!(info, UnexpectedState::TargetMismatch),
            _ => panic!("Expected UnexpectedState error"),
        }

        let error: ParseError = SyntaxError::new(ErrKind::TrailingComma, b',', 4).into();
        match error {
            ParseError::Syntax(e) => {
                assert_eq!(e.kind(), ErrKind::TrailingComma);
                assert_eq!(e.position(), 4);
            }
            _ => panic!("Expected Syntax error"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ParseError::MissingRequiredField { key: "line" }.to_string(),
            "missing required field `line`"
        );
        assert_eq!(
            ParseError::TypeMismatch {
                found: ValueKind::Float
            }
            .to_string(),
            "type mismatch: found float"
        );
        assert_eq!(
            ParseError::UnexpectedEvent {
                event: EventKind::ArrayStart
            }
            .to_string(),
            "unexpected array start here"
        );
        assert_eq!(
            ParseError::from(SyntaxError::new(ErrKind::ContentEnded, b'e', 5)).to_string(),
            "syntax error: ContentEnded(e) at 5"
        );
    }
}
