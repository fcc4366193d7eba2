use std::fmt;

/// The process-wide network posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionRole {
    #[default]
    Offline,
    ClientOnly,
    ServerOnly,
    /// Server plus a local participant connected to it
    Host,
}

impl SessionRole {
    /// A listening server is running
    pub fn is_listening(self) -> bool {
        matches!(self, Self::ServerOnly | Self::Host)
    }

    /// An outbound connection is (being) established
    pub fn has_client(self) -> bool {
        matches!(self, Self::ClientOnly | Self::Host)
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Offline => "offline",
            Self::ClientOnly => "client",
            Self::ServerOnly => "server",
            Self::Host => "host",
        };
        f.write_str(name)
    }
}
