//! 160-bit contract script hashes.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

/// A 160-bit contract hash, displayed as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractHash(pub [u8; 20]);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseHashError(pub String);

impl fmt::Display for ParseHashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid contract hash: {}", self.0)
    }
}

impl std::error::Error for ParseHashError {}

impl ContractHash {
    pub const ZERO: ContractHash = ContractHash([0; 20]);

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Script hash: the first 20 bytes of the SHA-256 of the script.
    pub fn of_script(script: &[u8]) -> ContractHash {
        let digest = Sha256::digest(script);
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest[..20]);
        ContractHash(out)
    }

    /// Parses 40 hex digits, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<ContractHash, ParseHashError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 40 {
            return Err(ParseHashError(s.to_string()));
        }
        let mut out = [0u8; 20];
        for (i, byte) in out.iter_mut().enumerate() {
            let pair = &digits[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16).map_err(|_| ParseHashError(s.to_string()))?;
        }
        Ok(ContractHash(out))
    }
}

impl fmt::Display for ContractHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ContractHash {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<ContractHash, ParseHashError> {
        ContractHash::from_hex(s)
    }
}

impl Serialize for ContractHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContractHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<ContractHash, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContractHash::from_hex(&s).map_err(D::Error::custom)
    }
}
