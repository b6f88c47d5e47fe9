//! The LEF binary container that carries a compiled contract script.
//!
//! Layout, in order: magic, a fixed 64-byte compiler identifier, a
//! variable-length source URL, one reserved byte, the method-token table,
//! two reserved bytes, the script, and a 4-byte checksum over everything
//! that precedes it.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::callflags::CallFlags;
use crate::hash::ContractHash;
use crate::script::{ScriptError, ScriptReader, ScriptWriter};

/// `LEF1` read as a little-endian u32.
pub const MAGIC: u32 = 0x3146454C;

const COMPILER_FIELD_LEN: usize = 64;
const MAX_SOURCE_URL_LEN: u64 = 256;
const MAX_TOKENS: u64 = 128;
const MAX_METHOD_NAME_LEN: u64 = 32;
const MAX_SCRIPT_LEN: u64 = 512 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LefError {
    CompilerNameTooLong(usize),
    SourceUrlTooLong(usize),
    EmptyScript,
    BadMagic(u32),
    ChecksumMismatch { expected: u32, actual: u32 },
    Script(ScriptError),
}

impl fmt::Display for LefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LefError::CompilerNameTooLong(len) => {
                write!(f, "compiler identifier is {len} bytes, the field holds {COMPILER_FIELD_LEN}")
            }
            LefError::SourceUrlTooLong(len) => {
                write!(f, "source URL is {len} bytes, limit is {MAX_SOURCE_URL_LEN}")
            }
            LefError::EmptyScript => write!(f, "container has no script"),
            LefError::BadMagic(m) => write!(f, "bad magic {m:#010x}, expected {MAGIC:#010x}"),
            LefError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: stored {expected:#010x}, computed {actual:#010x}")
            }
            LefError::Script(e) => write!(f, "malformed container: {e}"),
        }
    }
}

impl std::error::Error for LefError {}

impl From<ScriptError> for LefError {
    fn from(e: ScriptError) -> LefError {
        LefError::Script(e)
    }
}

/// A pre-declared call into another contract, referenced from the script
/// by `CALLT` with the token's table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodToken {
    pub hash: ContractHash,
    pub method: String,
    pub params_count: u16,
    pub has_return: bool,
    pub call_flags: CallFlags,
}

impl MethodToken {
    fn write(&self, w: &mut ScriptWriter) {
        w.write_bytes(self.hash.as_bytes());
        w.write_var_string(&self.method);
        w.write_u16_le(self.params_count);
        w.write_u8(self.has_return as u8);
        w.write_u8(self.call_flags.bits());
    }

    fn read(r: &mut ScriptReader<'_>) -> Result<MethodToken, LefError> {
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&r.read_bytes(20)?);
        let method = r.read_var_string(MAX_METHOD_NAME_LEN)?;
        let params_count = r.read_u16_le()?;
        let has_return = r.read_u8()? != 0;
        let bits = r.read_u8()?;
        let call_flags = CallFlags::from_bits_truncate(bits);
        Ok(MethodToken { hash: ContractHash(hash), method, params_count, has_return, call_flags })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LefFile {
    pub compiler: String,
    pub source: String,
    pub tokens: Vec<MethodToken>,
    pub script: Vec<u8>,
    pub checksum: u32,
}

impl LefFile {
    /// Assembles a container and computes its checksum.
    pub fn new(
        compiler: &str,
        source: &str,
        tokens: Vec<MethodToken>,
        script: Vec<u8>,
    ) -> Result<LefFile, LefError> {
        if compiler.len() > COMPILER_FIELD_LEN {
            return Err(LefError::CompilerNameTooLong(compiler.len()));
        }
        if source.len() as u64 > MAX_SOURCE_URL_LEN {
            return Err(LefError::SourceUrlTooLong(source.len()));
        }
        if script.is_empty() {
            return Err(LefError::EmptyScript);
        }
        let mut file = LefFile {
            compiler: compiler.to_string(),
            source: source.to_string(),
            tokens,
            script,
            checksum: 0,
        };
        file.checksum = compute_checksum(&file.body_bytes());
        Ok(file)
    }

    /// Everything before the checksum field.
    fn body_bytes(&self) -> Vec<u8> {
        let mut w = ScriptWriter::new();
        w.write_u32_le(MAGIC);
        let mut field = [0u8; COMPILER_FIELD_LEN];
        field[..self.compiler.len()].copy_from_slice(self.compiler.as_bytes());
        w.write_bytes(&field);
        w.write_var_string(&self.source);
        w.write_u8(0);
        w.write_var_int(self.tokens.len() as u64);
        for token in &self.tokens {
            token.write(&mut w);
        }
        w.write_u16_le(0);
        w.write_var_bytes(&self.script);
        w.into_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = self.body_bytes();
        bytes.extend_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    /// Parses a container and verifies its checksum.
    pub fn from_bytes(bytes: &[u8]) -> Result<LefFile, LefError> {
        let mut r = ScriptReader::new(bytes);
        let magic = r.read_u32_le()?;
        if magic != MAGIC {
            return Err(LefError::BadMagic(magic));
        }
        let field = r.read_bytes(COMPILER_FIELD_LEN)?;
        let end = field.iter().position(|&b| b == 0).unwrap_or(COMPILER_FIELD_LEN);
        let compiler =
            String::from_utf8(field[..end].to_vec()).map_err(|_| ScriptError::InvalidUtf8)?;
        let source = r.read_var_string(MAX_SOURCE_URL_LEN)?;
        r.read_u8()?;
        let token_count = r.read_var_int(MAX_TOKENS)?;
        let mut tokens = Vec::with_capacity(token_count as usize);
        for _ in 0..token_count {
            tokens.push(MethodToken::read(&mut r)?);
        }
        r.read_u16_le()?;
        let script = r.read_var_bytes(MAX_SCRIPT_LEN)?;
        if script.is_empty() {
            return Err(LefError::EmptyScript);
        }
        let body_len = r.position();
        let expected = r.read_u32_le()?;
        let actual = compute_checksum(&bytes[..body_len]);
        if expected != actual {
            return Err(LefError::ChecksumMismatch { expected, actual });
        }
        Ok(LefFile {
            compiler,
            source,
            tokens,
            script,
            checksum: expected,
        })
    }
}

/// First four bytes of a double SHA-256, read little-endian.
pub fn compute_checksum(bytes: &[u8]) -> u32 {
    let once = Sha256::digest(bytes);
    let twice = Sha256::digest(once);
    u32::from_le_bytes([twice[0], twice[1], twice[2], twice[3]])
}
