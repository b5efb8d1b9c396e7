//! Structured logging, with optional OpenTelemetry span export.
//!
//! # Telemetry invariants
//!
//! - **No field plaintext, ciphertext, identifier, or key material** may appear
//!   in any span attribute or log field. Validation rejections are logged by
//!   reason code only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`), overridden by
//!   `RUST_LOG` when set.

pub mod init;

pub use init::init_telemetry;
