//! Random shortcode generation

use rand::{distr::Alphanumeric, Rng};

/// Length of generated shortcodes
pub const CODE_LENGTH: usize = 6;

/// Generation attempts before giving up with `ExhaustedCodespace`
pub const MAX_ATTEMPTS: usize = 100;

/// Draws a random code from the 62-symbol alphabet (`a-z`, `A-Z`, `0-9`)
pub fn random_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}
