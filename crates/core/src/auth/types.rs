use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// Request information for authentication
#[derive(Debug, Clone)]
pub struct AuthRequest {
    /// Header names are lowercase.
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

/// Authenticated identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    /// Token subject (the username that logged in)
    pub subject: String,
    pub method: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            method: method.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_serialization() {
        let identity = Identity::new("admin", "bearer_token");

        let json = serde_json::to_string(&identity).unwrap();
        let deserialized: Identity = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, identity);
        assert_eq!(deserialized.subject, "admin");
    }
}
