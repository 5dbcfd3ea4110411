//! # Platform Passkey Types
//!
//! Rust type definitions for the subset of the [WebAuthn] specification consumed and produced when
//! running ceremonies against a native platform authenticator.
//!
//! Binary members use [`Bytes`], which is serialized as an unpadded `base64url` string so that
//! results can be handed to a relying party server without further encoding.
//!
//! [WebAuthn]: https://w3c.github.io/webauthn

mod utils;

pub mod webauthn;

// Re-exports
pub use utils::{
    bytes::{Bytes, NotBase64Encoded},
    crypto, encoding,
};
