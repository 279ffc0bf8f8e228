// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequential readers over the typed operand stacks.

use crate::OperandKind;

/// A forward-only reader over one typed stack.
///
/// Each pass owns fresh cursors starting at zero; values are never re-read.
#[derive(Clone, Debug)]
pub(crate) struct Cursor<'a, T> {
    items: &'a [T],
    pos: usize,
    kind: OperandKind,
}

/// A read past the end of a stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Underflow {
    pub(crate) kind: OperandKind,
    pub(crate) index: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(items: &'a [T], kind: OperandKind) -> Self {
        Self {
            items,
            pos: 0,
            kind,
        }
    }

    /// Read the next value and advance.
    #[inline]
    pub(crate) fn read(&mut self) -> Result<&'a T, Underflow> {
        let item = self.items.get(self.pos).ok_or(Underflow {
            kind: self.kind,
            index: self.pos,
        })?;
        self.pos += 1;
        Ok(item)
    }

    /// Number of values read so far.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Number of values left unread.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.items.len() - self.pos
    }
}

impl<T: Copy> Cursor<'_, T> {
    /// Read the next value by copy.
    #[inline]
    pub(crate) fn read_copied(&mut self) -> Result<T, Underflow> {
        self.read().copied()
    }
}
