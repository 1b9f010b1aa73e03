//! Cryptographic collaborators: password hashing, the reversible secret
//! codec and reset token generation.

mod codec;
mod password;
mod token;

pub use codec::{AesSivCodec, SecretCodec};
pub use password::{Argon2Hasher, PasswordHasher};
pub use token::{ResetTokenGenerator, UuidTokenGenerator};
