//! Session credential.

use crate::SessionError;

/// A logged-in session credential of the form `<user id>_<secret>`.
///
/// The user id prefix is what the bookmark listing is keyed on.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    value: String,
    user_id: u64,
}

impl Session {
    /// Parses a session credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is empty or does not start with a
    /// numeric user id.
    pub fn parse(value: impl Into<String>) -> Result<Self, SessionError> {
        let value = value.into();
        let value = value.trim().to_string();
        if value.is_empty() {
            return Err(SessionError::Empty);
        }
        if !value.chars().all(|c| c.is_ascii_graphic() && c != ';') {
            return Err(SessionError::InvalidCharacter);
        }

        let prefix = value.split('_').next().unwrap_or_default();
        let user_id = prefix
            .parse::<u64>()
            .map_err(|_| SessionError::MissingUserId {
                prefix: prefix.to_string(),
            })?;

        Ok(Self { value, user_id })
    }

    /// Returns the id of the user the session belongs to.
    #[must_use]
    pub const fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Returns the raw credential.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("value", &"<redacted>")
            .finish()
    }
}

impl std::str::FromStr for Session {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
