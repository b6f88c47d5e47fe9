//! The table of native interop services callable via `SYSCALL`.
//!
//! A service is addressed on the wire by the first four bytes of the
//! SHA-256 of its ASCII name. Prices are in base execution-fee units; a
//! service whose cost depends on its inputs carries no fixed price and
//! must not be queried for one.

use sha2::{Digest, Sha256};

/// One entry of the interop service table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteropService {
    pub name: &'static str,
    /// Fixed invocation price, or `None` when the cost is input-dependent.
    pub price: Option<u64>,
}

impl InteropService {
    /// Wire identifier: first four bytes of `SHA-256(name)`.
    pub fn id(&self) -> [u8; 4] {
        let digest = Sha256::digest(self.name.as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }

    pub fn has_fixed_price(&self) -> bool {
        self.price.is_some()
    }
}

/// All services known to this toolchain, ordered by name.
pub const SERVICES: &[InteropService] = &[
    InteropService { name: "System.Contract.Call", price: None },
    InteropService { name: "System.Contract.GetCallFlags", price: Some(1 << 10) },
    InteropService { name: "System.Crypto.CheckMultisig", price: None },
    InteropService { name: "System.Crypto.CheckSig", price: Some(1 << 15) },
    InteropService { name: "System.Iterator.Next", price: Some(1 << 15) },
    InteropService { name: "System.Iterator.Value", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.BurnGas", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.CheckWitness", price: Some(1 << 10) },
    InteropService { name: "System.Runtime.GasLeft", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetAddressVersion", price: Some(1 << 3) },
    InteropService { name: "System.Runtime.GetCallingScriptHash", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetEntryScriptHash", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetExecutingScriptHash", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetInvocationCounter", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetNetwork", price: Some(1 << 3) },
    InteropService { name: "System.Runtime.GetNotifications", price: Some(1 << 12) },
    InteropService { name: "System.Runtime.GetRandom", price: Some(1 << 4) },
    InteropService { name: "System.Runtime.GetTime", price: Some(1 << 3) },
    InteropService { name: "System.Runtime.GetTrigger", price: Some(1 << 3) },
    InteropService { name: "System.Runtime.Log", price: None },
    InteropService { name: "System.Runtime.Notify", price: None },
    InteropService { name: "System.Runtime.Platform", price: Some(1 << 3) },
    InteropService { name: "System.Storage.Delete", price: None },
    InteropService { name: "System.Storage.Find", price: None },
    InteropService { name: "System.Storage.Get", price: None },
    InteropService { name: "System.Storage.GetContext", price: Some(1 << 4) },
    InteropService { name: "System.Storage.GetReadOnlyContext", price: Some(1 << 4) },
    InteropService { name: "System.Storage.Put", price: None },
];

/// Looks a service up by its full name.
pub fn lookup(name: &str) -> Option<&'static InteropService> {
    SERVICES
        .binary_search_by(|s| s.name.cmp(name))
        .ok()
        .map(|idx| &SERVICES[idx])
}
