// Copyright 2025 the Stackpaint Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors produced while decoding a paint stream.

use core::fmt;

use crate::Opcode;

/// The four typed operand stacks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Signed integers (counts, enumerations, path tags).
    Int,
    /// Reals (coordinates, widths, matrix terms).
    Real,
    /// Text strings.
    Text,
    /// Opaque native references (fonts, paints, images).
    Native,
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "int",
            Self::Real => "real",
            Self::Text => "text",
            Self::Native => "native",
        })
    }
}

/// Failure of a single paint pass.
///
/// All variants are raised while decoding, before anything is drawn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PaintError {
    /// The logical instruction count is larger than the instruction buffer.
    #[error("instruction count {count} exceeds instruction buffer length {len}")]
    InstructionCountOutOfRange {
        /// Declared number of instructions.
        count: usize,
        /// Actual buffer length.
        len: usize,
    },
    /// An instruction tried to read past the end of a typed stack.
    #[error("{kind} stack exhausted at index {index} while decoding {opcode} (instruction {instruction})")]
    StackUnderflow {
        /// Stack that ran dry.
        kind: OperandKind,
        /// Index that was requested.
        index: usize,
        /// Position of the instruction in the instruction stream.
        instruction: usize,
        /// Instruction being decoded.
        opcode: Opcode,
    },
    /// An unknown instruction tag was met under [`UnknownTagPolicy::Reject`].
    ///
    /// [`UnknownTagPolicy::Reject`]: crate::UnknownTagPolicy::Reject
    #[error("unknown opcode tag {tag} at instruction {instruction}")]
    UnknownOpcode {
        /// Offending tag.
        tag: i32,
        /// Position of the instruction.
        instruction: usize,
    },
    /// An unknown path tag was met under [`UnknownTagPolicy::Reject`].
    ///
    /// [`UnknownTagPolicy::Reject`]: crate::UnknownTagPolicy::Reject
    #[error("unknown path operation tag {tag} in shape at instruction {instruction}")]
    UnknownPathOp {
        /// Offending tag.
        tag: i32,
        /// Position of the owning instruction.
        instruction: usize,
    },
    /// An integer operand is outside the range its instruction accepts.
    #[error("invalid {what} value {value} at instruction {instruction}")]
    InvalidOperand {
        /// Which operand was rejected.
        what: &'static str,
        /// The value that was read.
        value: i32,
        /// Position of the instruction.
        instruction: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_stack_and_instruction() {
        let err = PaintError::StackUnderflow {
            kind: OperandKind::Real,
            index: 3,
            instruction: 7,
            opcode: Opcode::ClearRect,
        };
        assert_eq!(
            err.to_string(),
            "real stack exhausted at index 3 while decoding clear-rect (instruction 7)"
        );
    }
}
