//! Caller identity carried with each command.

/// Header naming the acting user.
pub const USER_ID_HEADER: &str = "x-cellar-user-id";

/// Who is issuing a command. An anonymous session acts as the cellar's
/// configured default user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session acting as `user_id`. Blank ids stay anonymous.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            user_id: (!user_id.trim().is_empty()).then_some(user_id),
        }
    }

    /// Build a session from request headers (name, value) pairs.
    pub fn from_headers<'h, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = (&'h str, &'h str)>,
    {
        headers
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(USER_ID_HEADER))
            .map(|(_, value)| Self::for_user(value.trim()))
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
