//! One-time code generation

use rand::{rngs::OsRng, RngCore};

use hs_shared::code::CODE_LENGTH;

use crate::errors::{DomainError, DomainResult};

/// Number of distinct codes (000000..=999999)
const CODE_SPACE: u32 = 1_000_000;

/// Largest multiple of `CODE_SPACE` representable in a u32; draws at or above
/// it are rejected so every code is equally likely.
const ACCEPT_BELOW: u32 = (u32::MAX / CODE_SPACE) * CODE_SPACE;

/// Generate a uniformly random, zero-padded 6-digit code from the OS CSPRNG.
///
/// Fails only if the OS random source is unavailable.
pub fn generate_code() -> DomainResult<String> {
    let mut bytes = [0u8; 4];
    loop {
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| DomainError::internal(format!("Random source unavailable: {}", e)))?;

        let value = u32::from_le_bytes(bytes);
        if value < ACCEPT_BELOW {
            return Ok(format!("{:0width$}", value % CODE_SPACE, width = CODE_LENGTH));
        }
    }
}
