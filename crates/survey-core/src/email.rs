//! Syntactic email address check

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const MAX_LOCAL_PART: usize = 64;
const MAX_ADDRESS: usize = 254;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
    )
    .expect("email pattern is a valid regex")
});

/// An email address that passed the syntax check.
///
/// Keeps the exact text the client sent; no case folding or trimming.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(value: &str) -> Option<Self> {
        let local_len = value.rsplit_once('@').map(|(local, _)| local.len())?;

        if value.len() > MAX_ADDRESS || local_len > MAX_LOCAL_PART {
            return None;
        }

        EMAIL_PATTERN
            .is_match(value)
            .then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Plaintext email must not leak through debug logging.
impl fmt::Debug for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EmailAddress(<redacted>)")
    }
}
