//! Authentication handling for GitHub API.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Error, Result};

/// Authentication method for GitHub API.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Use token from the named environment variable.
    EnvVar(String),

    /// Use a pre-issued token.
    Token(SecretString),
}

impl Auth {
    /// Resolve the authentication to a token.
    ///
    /// # Errors
    /// Returns `NoToken` naming the token source if it is unset or blank.
    pub fn resolve(&self) -> Result<SecretString> {
        let token = match self {
            Self::EnvVar(var) => std::env::var(var)
                .map(SecretString::from)
                .map_err(|_| Error::NoToken(var.clone()))?,
            Self::Token(t) => t.clone(),
        };

        if token.expose_secret().trim().is_empty() {
            return Err(Error::NoToken(self.source()));
        }
        Ok(token)
    }

    fn source(&self) -> String {
        match self {
            Self::EnvVar(var) => var.clone(),
            Self::Token(_) => "a non-empty token".into(),
        }
    }
}
