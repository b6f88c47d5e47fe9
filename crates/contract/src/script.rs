//! Byte-level script construction and parsing.
//!
//! The push-data boundaries are carried over verbatim from the legacy
//! serializer this format descends from: lengths up to 75 are encoded as a
//! bare length byte that doubles as the opcode, and `PUSHDATA2` covers only
//! up to 4095 bytes before `PUSHDATA4` takes over.

use std::fmt;

use crate::opcode::Opcode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Data pushes are capped at 65535 bytes.
    DataTooLong(usize),
    /// The reader ran off the end of the buffer.
    Truncated { wanted: usize, remaining: usize },
    /// A length prefix exceeded the caller's limit.
    LengthOutOfBounds { length: u64, max: u64 },
    /// A var-string was not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::DataTooLong(len) => {
                write!(f, "data push of {len} bytes exceeds the 65535-byte limit")
            }
            ScriptError::Truncated { wanted, remaining } => {
                write!(f, "needed {wanted} more bytes but only {remaining} remain")
            }
            ScriptError::LengthOutOfBounds { length, max } => {
                write!(f, "length prefix {length} exceeds maximum {max}")
            }
            ScriptError::InvalidUtf8 => write!(f, "var-string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for ScriptError {}

pub type Result<T> = std::result::Result<T, ScriptError>;

/// Append-only script/stream writer.
#[derive(Debug, Default)]
pub struct ScriptWriter {
    buf: Vec<u8>,
}

impl ScriptWriter {
    pub fn new() -> ScriptWriter {
        ScriptWriter::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Variable-length integer: one byte below 0xFD, then 0xFD/0xFE/0xFF
    /// markers followed by 2, 4, or 8 little-endian bytes.
    pub fn write_var_int(&mut self, v: u64) {
        if v < 0xFD {
            self.write_u8(v as u8);
        } else if v <= 0xFFFF {
            self.write_u8(0xFD);
            self.write_u16_le(v as u16);
        } else if v <= 0xFFFF_FFFF {
            self.write_u8(0xFE);
            self.write_u32_le(v as u32);
        } else {
            self.write_u8(0xFF);
            self.write_u64_le(v);
        }
    }

    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_var_int(bytes.len() as u64);
        self.write_bytes(bytes);
    }

    pub fn write_var_string(&mut self, s: &str) {
        self.write_var_bytes(s.as_bytes());
    }

    /// Pushes a byte string onto the evaluation stack.
    ///
    /// Lengths up to 75 use the inline form where the opcode byte is the
    /// length itself. The `PUSHDATA2` window ends at 4095, not 65535.
    pub fn push_data(&mut self, data: &[u8]) -> Result<()> {
        let (opcode, prefix) = push_data_prefix(data.len())?;
        self.write_u8(opcode.code());
        self.write_bytes(&prefix);
        self.write_bytes(data);
        Ok(())
    }

    /// Pushes an integer with the smallest available encoding.
    pub fn push_int(&mut self, value: i128) {
        let (opcode, operand) = push_int_encoding(value);
        self.write_u8(opcode.code());
        self.write_bytes(&operand);
    }
}

/// Opcode and length-prefix bytes for a data push of `len` bytes.
pub fn push_data_prefix(len: usize) -> Result<(Opcode, Vec<u8>)> {
    if len == 0 {
        return Ok((Opcode::Push0, Vec::new()));
    }
    if len <= 75 {
        Ok((Opcode::PushBytes(len as u8), Vec::new()))
    } else if len <= 255 {
        Ok((Opcode::PushData1, vec![len as u8]))
    } else if len <= 4095 {
        Ok((Opcode::PushData2, (len as u16).to_le_bytes().to_vec()))
    } else if len <= 65535 {
        Ok((Opcode::PushData4, (len as u32).to_le_bytes().to_vec()))
    } else {
        Err(ScriptError::DataTooLong(len))
    }
}

/// Opcode and operand for an integer push.
///
/// `-1..=16` use the dedicated one-byte opcodes; everything else is the
/// minimal sign-extended little-endian two's complement padded to the next
/// power-of-two width.
pub fn push_int_encoding(value: i128) -> (Opcode, Vec<u8>) {
    if let Some(op) = i32::try_from(value).ok().and_then(Opcode::push_small) {
        return (op, Vec::new());
    }

    let bytes = value.to_le_bytes();
    let min_len = minimal_signed_len(&bytes, value < 0);
    let (opcode, width) = match min_len {
        1 => (Opcode::PushInt8, 1),
        2 => (Opcode::PushInt16, 2),
        3..=4 => (Opcode::PushInt32, 4),
        5..=8 => (Opcode::PushInt64, 8),
        _ => (Opcode::PushInt128, 16),
    };
    let pad = if value < 0 { 0xFF } else { 0x00 };
    let mut operand = vec![pad; width];
    operand[..min_len].copy_from_slice(&bytes[..min_len]);
    (opcode, operand)
}

// Shortest little-endian length that still round-trips under sign
// extension.
fn minimal_signed_len(le: &[u8; 16], negative: bool) -> usize {
    let pad = if negative { 0xFF } else { 0x00 };
    let mut len = 16;
    while len > 1 && le[len - 1] == pad {
        let top = le[len - 2];
        let sign_ok = if negative { top >= 0x80 } else { top < 0x80 };
        if !sign_ok {
            break;
        }
        len -= 1;
    }
    len
}

/// Cursor over a byte buffer, mirroring [`ScriptWriter`].
#[derive(Debug)]
pub struct ScriptReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ScriptReader<'a> {
    pub fn new(buf: &'a [u8]) -> ScriptReader<'a> {
        ScriptReader { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(ScriptError::Truncated { wanted: n, remaining: self.remaining() });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64> {
        let b = self.take(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(b);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn read_var_int(&mut self, max: u64) -> Result<u64> {
        let first = self.read_u8()?;
        let value = match first {
            0xFD => self.read_u16_le()? as u64,
            0xFE => self.read_u32_le()? as u64,
            0xFF => self.read_u64_le()?,
            b => b as u64,
        };
        if value > max {
            return Err(ScriptError::LengthOutOfBounds { length: value, max });
        }
        Ok(value)
    }

    pub fn read_var_bytes(&mut self, max: u64) -> Result<Vec<u8>> {
        let len = self.read_var_int(max)?;
        self.read_bytes(len as usize)
    }

    pub fn read_var_string(&mut self, max: u64) -> Result<String> {
        let bytes = self.read_var_bytes(max)?;
        String::from_utf8(bytes).map_err(|_| ScriptError::InvalidUtf8)
    }
}
