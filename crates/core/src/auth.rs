use serde::{Deserialize, Serialize};

use crate::UserId;

/// Network origin of the request that triggered an operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOrigin {
    ip_address: Option<String>,
    user_agent: Option<String>,
}

impl RequestOrigin {
    /// Creates an origin from the caller address and client identifier.
    #[must_use]
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            ip_address,
            user_agent,
        }
    }

    /// Returns the caller network address, if known.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Returns the caller client identifier, if known.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Identity of the user performing an operation, as resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    user_id: UserId,
    display_name: String,
    origin: RequestOrigin,
}

impl ActorContext {
    /// Creates an actor context from authentication and request data.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>, origin: RequestOrigin) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            origin,
        }
    }

    /// Returns the acting user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the display name captured at request time.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns where the request came from.
    #[must_use]
    pub fn origin(&self) -> &RequestOrigin {
        &self.origin
    }
}
