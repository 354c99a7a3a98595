//! Security audit logging
//!
//! Registration and login outcomes are emitted as structured `tracing` events
//! on the `audit` target, so they can be routed to a separate sink with an
//! `EnvFilter` directive such as `audit=info`.
//!
//! Passwords and tokens never appear in audit events.

use axum::http::HeaderMap;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

/// Client details taken from request headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            ip_address: extract_ip_address(headers),
            user_agent: extract_user_agent(headers),
        }
    }
}

/// Audit event types for security logging
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// New account created
    RegistrationSuccess {
        user_id: Uuid,
        username: String,
        #[serde(flatten)]
        client: ClientInfo,
    },

    /// Registration rejected
    RegistrationFailure {
        /// Claimed username, if the request carried one
        username: Option<String>,
        /// Request fields that carried errors
        fields: Vec<String>,
        reason: String,
        #[serde(flatten)]
        client: ClientInfo,
    },

    /// Credentials accepted
    LoginSuccess {
        user_id: Uuid,
        username: String,
        #[serde(flatten)]
        client: ClientInfo,
    },

    /// Credentials rejected
    LoginFailure {
        username: Option<String>,
        reason: String,
        #[serde(flatten)]
        client: ClientInfo,
    },
}

/// Log an audit event
pub fn audit_log(event: &AuditEvent) {
    let timestamp = Utc::now();
    let event_json = serde_json::to_string(event).unwrap_or_else(|_| format!("{event:?}"));

    match event {
        AuditEvent::RegistrationSuccess {
            user_id,
            username,
            client,
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                user_id = %user_id,
                username = %username,
                ip_address = ?client.ip_address,
                "User registered"
            );
        }
        AuditEvent::RegistrationFailure {
            username,
            fields,
            reason,
            client,
        } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                username = ?username,
                fields = ?fields,
                reason = %reason,
                ip_address = ?client.ip_address,
                "Registration failed"
            );
        }
        AuditEvent::LoginSuccess {
            user_id,
            username,
            client,
        } => {
            info!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                user_id = %user_id,
                username = %username,
                ip_address = ?client.ip_address,
                "Login successful"
            );
        }
        AuditEvent::LoginFailure {
            username,
            reason,
            client,
        } => {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                event = %event_json,
                username = ?username,
                reason = %reason,
                ip_address = ?client.ip_address,
                "Login failed"
            );
        }
    }
}

/// Username a request claims, for audit records only
pub fn claimed_username(body: &Value) -> Option<String> {
    body.get("username")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extract client IP address from request headers
///
/// Checks X-Forwarded-For, then X-Real-IP. Connection info is not consulted.
pub fn extract_ip_address(headers: &HeaderMap) -> Option<String> {
    // First entry of the proxy chain is the client
    if let Some(xff) = headers.get("x-forwarded-for") {
        if let Ok(xff_str) = xff.to_str() {
            if let Some(first_ip) = xff_str.split(',').next() {
                return Some(first_ip.trim().to_string());
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    None
}

/// Extract user agent from request headers
pub fn extract_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ClientInfo {
        ClientInfo {
            ip_address: Some("192.168.1.1".to_string()),
            user_agent: Some("Test Agent".to_string()),
        }
    }

    #[test]
    fn test_audit_event_serialization() {
        let event = AuditEvent::LoginSuccess {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            client: client(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "login_success");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["ip_address"], "192.168.1.1");
    }

    #[test]
    fn test_audit_log_does_not_panic() {
        audit_log(&AuditEvent::RegistrationSuccess {
            user_id: Uuid::new_v4(),
            username: "alice".to_string(),
            client: client(),
        });
        audit_log(&AuditEvent::RegistrationFailure {
            username: None,
            fields: vec!["password".to_string()],
            reason: "Validation failed".to_string(),
            client: ClientInfo::default(),
        });
        audit_log(&AuditEvent::LoginFailure {
            username: Some("alice".to_string()),
            reason: "Invalid credentials".to_string(),
            client: client(),
        });
    }

    #[test]
    fn test_claimed_username() {
        assert_eq!(claimed_username(&json!({ "username": " alice " })), Some("alice".to_string()));
        assert_eq!(claimed_username(&json!({ "username": "   " })), None);
        assert_eq!(claimed_username(&json!({ "username": 5 })), None);
        assert_eq!(claimed_username(&json!([])), None);
    }

    #[test]
    fn test_extract_ip_from_x_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            "203.0.113.1, 198.51.100.1".parse().unwrap(),
        );

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_extract_ip_from_x_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "203.0.113.1".parse().unwrap());

        assert_eq!(extract_ip_address(&headers), Some("203.0.113.1".to_string()));
    }

    #[test]
    fn test_client_info_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::USER_AGENT,
            "Mozilla/5.0 (Test)".parse().unwrap(),
        );

        let info = ClientInfo::from_headers(&headers);
        assert_eq!(info.ip_address, None);
        assert_eq!(info.user_agent, Some("Mozilla/5.0 (Test)".to_string()));
    }
}
