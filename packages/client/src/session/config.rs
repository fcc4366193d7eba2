use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use parlor_server::domain::DEFAULT_MAX_PARTICIPANTS;

use crate::error::SessionError;

pub const DEFAULT_PORT: u16 = 7777;
pub const DEFAULT_MAX_HISTORY: usize = 100;
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Recognised session options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Bind address for `server` and `host`
    pub listen_address: String,
    /// Server address for `client`
    pub remote_address: String,
    pub port: u16,
    /// Roster capacity of the embedded server
    pub max_participants: usize,
    /// Rendered lines kept by the presentation side
    pub max_history_rendered: usize,
    pub handshake_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0".to_string(),
            remote_address: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            max_history_rendered: DEFAULT_MAX_HISTORY,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.port == 0 {
            return Err(SessionError::InvalidConfig(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        if self.max_participants == 0 {
            return Err(SessionError::InvalidConfig(
                "max_participants must be at least 1".to_string(),
            ));
        }
        if self.listen_address.trim().is_empty() || self.remote_address.trim().is_empty() {
            return Err(SessionError::InvalidConfig(
                "addresses must not be empty".to_string(),
            ));
        }
        if self.handshake_timeout.is_zero() {
            return Err(SessionError::InvalidConfig(
                "handshake timeout must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_address, self.port)
    }

    pub fn server_url(&self) -> String {
        format!("ws://{}:{}/ws", self.remote_address, self.port)
    }
}

/// URL of the local participant of a host bound to `bound`
pub fn loopback_url(bound: SocketAddr) -> String {
    let ip = match bound.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
        IpAddr::V6(ip) if ip.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
        ip => ip,
    };
    format!("ws://{}/ws", SocketAddr::new(ip, bound.port()))
}
