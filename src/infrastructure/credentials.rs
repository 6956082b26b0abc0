//! Credential acquisition.
//!
//! The backend API wants the session bearer token of a logged-in
//! chatgpt.com session. The resolver looks for it in an explicit flag,
//! the environment, then a token file in the data directory.

use std::path::PathBuf;

use crate::domain::{AppConfig, ExportError, Result};

/// Environment variable consulted for the access token.
pub const TOKEN_ENV: &str = "CHATGPT_ACCESS_TOKEN";

/// Source of the bearer token used for backend API requests.
#[allow(async_fn_in_trait)]
pub trait CredentialProvider {
    /// Obtain a credential for the run.
    ///
    /// # Errors
    /// Returns [`ExportError::Auth`] if no usable token can be located.
    async fn credential(&self) -> Result<String>;
}

/// Token resolver: explicit flag value, then `CHATGPT_ACCESS_TOKEN`,
/// then the token file under the data directory.
///
/// The environment is read once at construction so resolution order is
/// fixed for the lifetime of the provider.
#[derive(Debug, Clone)]
pub struct SessionTokenProvider {
    explicit: Option<String>,
    env: Option<String>,
    token_file: PathBuf,
}

impl SessionTokenProvider {
    /// Create a provider from an optional explicit token and the config.
    #[must_use]
    pub fn new(explicit: Option<String>, config: &AppConfig) -> Self {
        Self {
            explicit,
            env: std::env::var(TOKEN_ENV).ok(),
            token_file: config.token_file_path(),
        }
    }
}

impl CredentialProvider for SessionTokenProvider {
    async fn credential(&self) -> Result<String> {
        if let Some(token) = self.explicit.as_deref() {
            let token = token.trim();
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }

        if let Some(token) = self.env.as_deref() {
            let token = token.trim();
            if !token.is_empty() {
                tracing::debug!("using token from {TOKEN_ENV}");
                return Ok(token.to_string());
            }
        }

        match tokio::fs::read_to_string(&self.token_file).await {
            Ok(contents) if !contents.trim().is_empty() => {
                tracing::debug!(path = %self.token_file.display(), "using token file");
                Ok(contents.trim().to_string())
            }
            _ => Err(ExportError::Auth {
                message: format!(
                    "no access token found; pass --token, set {TOKEN_ENV}, or write the token to {}",
                    self.token_file.display()
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn provider(
        explicit: Option<&str>,
        env: Option<&str>,
        token_file: PathBuf,
    ) -> SessionTokenProvider {
        SessionTokenProvider {
            explicit: explicit.map(String::from),
            env: env.map(String::from),
            token_file,
        }
    }

    #[tokio::test]
    async fn test_explicit_token_wins() {
        let p = provider(
            Some("  tok-123  "),
            Some("env-token"),
            PathBuf::from("/nonexistent/token"),
        );
        assert_eq!(p.credential().await.unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn test_env_token_beats_token_file() {
        let dir = tempdir().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "file-token\n").unwrap();

        let p = provider(None, Some(" env-token "), token_path);
        assert_eq!(p.credential().await.unwrap(), "env-token");
    }

    #[tokio::test]
    async fn test_token_file_fallback() {
        let dir = tempdir().unwrap();
        let token_path = dir.path().join("token");
        std::fs::write(&token_path, "file-token\n").unwrap();

        let p = provider(None, None, token_path);
        assert_eq!(p.credential().await.unwrap(), "file-token");
    }

    #[tokio::test]
    async fn test_missing_everywhere_is_auth_error() {
        let dir = tempdir().unwrap();
        let p = provider(None, None, dir.path().join("no-token"));

        let err = p.credential().await.unwrap_err();
        assert!(matches!(err, ExportError::Auth { .. }));
    }
}
