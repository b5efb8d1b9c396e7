//! [`FieldKey`] derivation and the process-wide [`KeyCache`].

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Secret used when none is configured outside production.
///
/// Values encrypted under this secret are readable by anyone with the source
/// code. They must not outlive a development session.
pub const DEV_FALLBACK_SECRET: &str = "field-vault-DEVELOPMENT-ONLY-do-not-persist";

/// Where a key's secret came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Supplied through configuration.
    Configured,
    /// [`DEV_FALLBACK_SECRET`].
    DevelopmentFallback,
}

/// The secret string a [`FieldKey`] is derived from.
///
/// Zeroed on drop and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeySecret {
    value: String,
    #[zeroize(skip)]
    origin: KeyOrigin,
}

impl KeySecret {
    /// A secret supplied through configuration.
    pub fn configured(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            origin: KeyOrigin::Configured,
        }
    }

    /// The development-only fallback secret.
    pub fn development_fallback() -> Self {
        Self {
            value: DEV_FALLBACK_SECRET.to_owned(),
            origin: KeyOrigin::DevelopmentFallback,
        }
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

impl std::fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeySecret({:?}, [REDACTED])", self.origin)
    }
}

/// A 256-bit field encryption key.
///
/// Zeroed on drop. `Debug` never prints key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey {
    bytes: [u8; KEY_LEN],
    #[zeroize(skip)]
    origin: KeyOrigin,
}

impl FieldKey {
    /// Derive a key by hashing `secret` with SHA-256.
    ///
    /// Deterministic: the same secret always yields the same key, which is what
    /// lets a restarted process decrypt values written by its predecessor.
    pub fn derive(secret: &KeySecret) -> Self {
        let digest = Sha256::digest(secret.value.as_bytes());
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&digest);
        Self {
            bytes,
            origin: secret.origin,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> KeyOrigin {
        self.origin
    }
}

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FieldKey({:?}, [REDACTED])", self.origin)
    }
}

/// Derive-once cache for the process field key.
///
/// Built at startup from the configured [`KeySecret`] and shared read-only
/// through application state. The key is derived on the first [`get`] and the
/// same instance is returned to every caller afterwards, including callers
/// racing on first use.
///
/// [`get`]: KeyCache::get
#[derive(Debug)]
pub struct KeyCache {
    secret: KeySecret,
    key: OnceCell<FieldKey>,
}

impl KeyCache {
    pub fn new(secret: KeySecret) -> Self {
        Self {
            secret,
            key: OnceCell::new(),
        }
    }

    /// Return the derived key, deriving it on first call.
    pub fn get(&self) -> &FieldKey {
        self.key.get_or_init(|| {
            let key = FieldKey::derive(&self.secret);
            debug!(origin = ?key.origin(), "field key derived");
            key
        })
    }

    /// `true` once the key has been derived.
    pub fn is_ready(&self) -> bool {
        self.key.get().is_some()
    }

    pub fn origin(&self) -> KeyOrigin {
        self.secret.origin()
    }
}
