// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

use super::{ErrKind, SyntaxError};

/// Which container the tokenizer is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Container nesting plus the position of the last comma, used to reject
/// trailing commas.
#[derive(Debug, Clone, Default)]
pub(super) struct ParseContext {
    stack: Vec<Container>,
    pub after_comma: Option<(u8, usize)>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_zero(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn enter_object(&mut self) {
        self.stack.push(Container::Object);
    }

    pub fn exit_object(&mut self, pos: usize) -> Result<(), SyntaxError> {
        match self.stack.pop() {
            Some(Container::Object) => Ok(()),
            _ => Err(SyntaxError::new(ErrKind::UnopenedObject, b'}', pos)),
        }
    }

    pub fn enter_array(&mut self) {
        self.stack.push(Container::Array);
    }

    pub fn exit_array(&mut self, pos: usize) -> Result<(), SyntaxError> {
        match self.stack.pop() {
            Some(Container::Array) => Ok(()),
            _ => Err(SyntaxError::new(ErrKind::UnopenedArray, b']', pos)),
        }
    }

    pub fn is_object(&self) -> bool {
        self.stack.last() == Some(&Container::Object)
    }

    pub fn is_array(&self) -> bool {
        self.stack.last() == Some(&Container::Array)
    }
}
