//! Random identifiers for scratch directory names.

use rand::RngCore;

/// Length of the hex suffix used for generated `tmp-` directories.
pub const DEFAULT_HEX_LEN: usize = 10;

/// Returns `len` lowercase hex characters drawn from the thread-local CSPRNG.
pub fn random_hex(len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rand::rng().fill_bytes(&mut bytes);

    let mut hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(len);
    hex
}
