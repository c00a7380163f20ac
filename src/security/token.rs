//! CSRF token helpers.

use rand::RngCore;

use crate::storage::session::Session;

const PREFIX: &str = "_token.";
const TOKEN_BYTES: usize = 32;

/// A named anti-forgery token stored in the session.
///
/// Typical flow: `generate` while rendering a form, embed the value in a
/// hidden field, then `matches` against the submitted copy and `clear`
/// once consumed.
#[derive(Debug)]
pub struct CsrfToken<'a> {
    session: &'a mut Session,
    key: String,
}

impl<'a> CsrfToken<'a> {
    pub fn new(session: &'a mut Session, name: &str) -> Self {
        Self {
            session,
            key: format!("{PREFIX}{name}"),
        }
    }

    /// The current token value, if one was generated earlier.
    pub fn value(&self) -> Option<String> {
        self.session.get(&self.key)
    }

    /// Draw a fresh random token and store it, replacing any previous
    /// value under the same name.
    pub fn generate(&mut self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let value = hex_encode(&bytes);
        self.session.set(&self.key, value.clone());
        value
    }

    /// Compare a submitted value against the stored token. A missing
    /// token never matches.
    pub fn matches(&self, submitted: &str) -> bool {
        self.value().map(|v| v == submitted).unwrap_or(false)
    }

    pub fn clear(&mut self) {
        self.session.remove(&self.key);
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        use std::fmt::Write;
        let _ = write!(out, "{b:02x}");
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::storage::session::SessionStore;

    fn session() -> Session {
        SessionStore::new(SessionConfig::default()).open(None, "test")
    }

    #[test]
    fn generate_compare_clear() {
        let mut session = session();
        let mut token = CsrfToken::new(&mut session, "login");

        assert!(token.value().is_none());
        assert!(!token.matches("anything"));

        let value = token.generate();
        assert_eq!(value.len(), TOKEN_BYTES * 2);
        assert!(token.matches(&value));
        assert!(!token.matches("forged"));

        token.clear();
        assert!(!token.matches(&value));
    }

    #[test]
    fn named_tokens_are_independent() {
        let mut session = session();
        let login = CsrfToken::new(&mut session, "login").generate();

        let mut comment = CsrfToken::new(&mut session, "comment");
        let comment_value = comment.generate();

        assert_ne!(login, comment_value);
        assert!(!comment.matches(&login));
    }

    #[test]
    fn regeneration_replaces_the_value() {
        let mut session = session();
        let mut token = CsrfToken::new(&mut session, "form");
        let first = token.generate();
        let second = token.generate();
        assert_ne!(first, second);
        assert!(!token.matches(&first));
        assert!(token.matches(&second));
    }
}
