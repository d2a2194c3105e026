//! Access code generation.

use rand::Rng;

/// Generate a one-time access code: 6 uppercase hexadecimal characters.
///
/// Uses the thread-local CSPRNG.
pub fn generate_access_code() -> String {
    let mut rng = rand::rng();
    let code: u32 = rng.random_range(0..0x100_0000);
    format!("{:06X}", code)
}
