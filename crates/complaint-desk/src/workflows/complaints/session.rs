use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

pub const SESSION_USER_HEADER: &str = "x-session-user";
/// Exactly `member` or `staff`; absent means member.
pub const SESSION_ROLE_HEADER: &str = "x-session-role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Staff,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Staff => "staff",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        [Self::Member, Self::Staff]
            .into_iter()
            .find(|role| role.label() == raw)
    }
}

/// Who is asking, established for each request and handed to the views explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    username: String,
    role: Role,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: Role) -> Result<Self, SessionError> {
        let username = username.into().trim().to_string();
        if username.is_empty() {
            return Err(SessionError::Missing);
        }
        Ok(Self { username, role })
    }

    /// Reads `x-session-user` and `x-session-role`; the role defaults to member.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionError> {
        let username = headers
            .get(SESSION_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(SessionError::Missing)?;

        let role = match headers.get(SESSION_ROLE_HEADER) {
            None => Role::Member,
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| SessionError::InvalidRole("<non-ascii>".to_string()))?;
                Role::parse(raw).ok_or_else(|| SessionError::InvalidRole(raw.to_string()))?
            }
        };

        Self::new(username, role)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn require_staff(&self) -> Result<(), SessionError> {
        match self.role {
            Role::Staff => Ok(()),
            Role::Member => Err(SessionError::Forbidden {
                username: self.username.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no active session; sign in first")]
    Missing,
    #[error("unknown session role '{0}'")]
    InvalidRole(String),
    #[error("{username} is not allowed to manage complaints")]
    Forbidden { username: String },
}
