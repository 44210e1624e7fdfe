//! One-time codes for the password-reset flow.

use rand::Rng;

pub const RESET_CODE_MIN: u32 = 100_000;
pub const RESET_CODE_MAX: u32 = 999_999;

/// Generate a uniformly distributed 6-digit reset code.
pub fn generate_reset_code() -> u32 {
    rand::thread_rng().gen_range(RESET_CODE_MIN..=RESET_CODE_MAX)
}
