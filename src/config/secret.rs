/// Shared secret injected into registration. All comparisons go through
/// [`SharedSecret::verify`] so the matching strategy can change without
/// touching callers.
#[derive(Debug, Clone)]
pub struct SharedSecret(String);

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Checks a presented key against the configured secret.
    ///
    /// Compares the full length with a byte fold instead of bailing on the
    /// first mismatch, so equal-length probes do not leak a prefix.
    pub fn verify(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let candidate = presented.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected
            .iter()
            .zip(candidate)
            .fold(0u8, |acc, (left, right)| acc | (left ^ right))
            == 0
    }
}
