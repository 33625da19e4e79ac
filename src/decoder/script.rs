//! Push-aware reader over raw output script bytes
//!
//! Walks a script one item at a time and hands back the data each push carries.
//! Small-integer opcodes produced by minimal-push encoding are normalised back
//! into the single byte they stand for, so `OP_1` and a literal `0x01` push read
//! the same.

use bitcoin::opcodes::all::{
    OP_PUSHBYTES_0, OP_PUSHDATA1, OP_PUSHDATA2, OP_PUSHDATA4, OP_PUSHNUM_1, OP_PUSHNUM_16,
    OP_PUSHNUM_NEG1, OP_RETURN,
};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

use super::error::{ParseError, ParseResult};

/// Cursor over a script's push items
pub struct ScriptCursor<'a> {
    cursor: Cursor<&'a [u8]>,
    len: u64,
    /// Index of the next item, OP_RETURN included
    position: usize,
}

impl<'a> ScriptCursor<'a> {
    pub fn new(script: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(script),
            len: script.len() as u64,
            position: 0,
        }
    }

    /// Consume the leading OP_RETURN
    pub fn expect_op_return(&mut self) -> ParseResult<()> {
        match self.cursor.read_u8() {
            Ok(op) if op == OP_RETURN.to_u8() => {
                self.position += 1;
                Ok(())
            }
            _ => Err(ParseError::NotOpReturn),
        }
    }

    /// Index of the item the next read returns
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.position() >= self.len
    }

    /// Read the next push item, `None` once the script is exhausted
    pub fn next_push(&mut self) -> ParseResult<Option<Vec<u8>>> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let position = self.position;
        let opcode = self
            .cursor
            .read_u8()
            .map_err(|_| ParseError::Truncated { position })?;

        let declared_len = match opcode {
            op if op == OP_PUSHBYTES_0.to_u8() => 0,
            op @ 0x01..=0x4b => op as usize,
            op if op == OP_PUSHDATA1.to_u8() => self
                .cursor
                .read_u8()
                .map_err(|_| ParseError::Truncated { position })?
                as usize,
            op if op == OP_PUSHDATA2.to_u8() => self
                .cursor
                .read_u16::<LittleEndian>()
                .map_err(|_| ParseError::Truncated { position })?
                as usize,
            op if op == OP_PUSHDATA4.to_u8() => self
                .cursor
                .read_u32::<LittleEndian>()
                .map_err(|_| ParseError::Truncated { position })?
                as usize,
            op if op == OP_PUSHNUM_NEG1.to_u8() => {
                self.position += 1;
                return Ok(Some(vec![0x81]));
            }
            op if (OP_PUSHNUM_1.to_u8()..=OP_PUSHNUM_16.to_u8()).contains(&op) => {
                self.position += 1;
                return Ok(Some(vec![op - OP_PUSHNUM_1.to_u8() + 1]));
            }
            opcode => return Err(ParseError::UnexpectedOpcode { position, opcode }),
        };

        let remaining = self.len - self.cursor.position();
        if declared_len as u64 > remaining {
            return Err(ParseError::Truncated { position });
        }

        let mut data = vec![0u8; declared_len];
        self.cursor
            .read_exact(&mut data)
            .map_err(|_| ParseError::Truncated { position })?;
        self.position += 1;
        Ok(Some(data))
    }

    /// Read a push that the layout requires to be present
    pub fn required_push(&mut self, field: &'static str) -> ParseResult<Vec<u8>> {
        self.next_push()?.ok_or(ParseError::MissingField(field))
    }
}
