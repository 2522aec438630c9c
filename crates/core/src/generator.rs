//! Plaintext passcode generation from the operating system CSPRNG.

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{PasscodeError, PasscodeResult};

/// Exclusive upper bound of a generated passcode value.
pub const PASSCODE_UPPER_BOUND: u32 = 1 << 30;

const PASSCODE_MASK: u32 = PASSCODE_UPPER_BOUND - 1;

/// Draws one-time passcodes uniformly from `[0, 2^30)`.
///
/// Construction probes the random source so a host without one fails at
/// startup instead of on the first issuance.
#[derive(Debug, Clone)]
pub struct PasscodeGenerator {
    _probed: (),
}

impl PasscodeGenerator {
    pub fn new() -> PasscodeResult<Self> {
        let mut probe = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|e| PasscodeError::random_source(e.to_string()))?;
        Ok(Self { _probed: () })
    }

    /// Draw a passcode value. The bound is a power of two, so masking keeps
    /// the distribution uniform.
    pub fn next_value(&self) -> PasscodeResult<u32> {
        let mut bytes = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| PasscodeError::random_source(e.to_string()))?;
        Ok(u32::from_le_bytes(bytes) & PASSCODE_MASK)
    }

    /// Draw a passcode formatted as plain decimal digits.
    pub fn generate(&self) -> PasscodeResult<String> {
        Ok(self.next_value()?.to_string())
    }
}

/// Whether `code` has the shape of a generated passcode: decimal digits, no
/// leading zero unless the value is zero, and below [`PASSCODE_UPPER_BOUND`].
pub fn is_well_formed(code: &str) -> bool {
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if code.len() > 1 && code.starts_with('0') {
        return false;
    }
    code.parse::<u32>()
        .map(|value| value < PASSCODE_UPPER_BOUND)
        .unwrap_or(false)
}
