//! Dashboard configuration (`[dashboard]` section).

use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

use misty_core::Secret;

/// Listener, broadcast and access settings for the dashboard.
///
/// Missing keys fall back to [`Default`]. Basic auth is on only when both
/// `username` and `password` are non-blank.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    /// TCP port, bound on all interfaces.
    pub port: u16,
    /// Period of the WebSocket status push.
    pub update_interval_ms: u64,
    /// WebSocket clients beyond this are refused with 503.
    pub max_connections: usize,
    pub username: String,
    pub password: Option<Secret>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 5000,
            update_interval_ms: 1000,
            max_connections: 10,
            username: String::new(),
            password: None,
        }
    }
}

impl DashboardConfig {
    pub fn auth_enabled(&self) -> bool {
        !self.username.trim().is_empty()
            && self.password.as_ref().is_some_and(|p| !p.is_blank())
    }

    /// `user:password` as carried in a basic auth header, when auth is on.
    pub(crate) fn credentials(&self) -> Option<String> {
        match &self.password {
            Some(password) if self.auth_enabled() => {
                Some(format!("{}:{}", self.username, password.expose()))
            }
            _ => None,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
