//! The interface the session core reports to.

use std::net::SocketAddr;

use parlor_server::domain::Color;

/// Role transitions worth showing to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Connected,
    Disconnected,
    ServerStarted(SocketAddr),
    ServerStopped,
}

/// Receives everything the user should see.
///
/// Calls come from several tasks, so implementations must not block for
/// long.
pub trait PresentationSink: Send + Sync {
    fn notify_connection_status(&self, connected: bool);

    fn notify_message(&self, sender: &str, text: &str, color: Color);

    fn notify_system_message(&self, text: &str);

    fn notify_error(&self, text: &str);

    fn notify_lifecycle(&self, event: LifecycleEvent) {
        match event {
            LifecycleEvent::Connected => {
                self.notify_connection_status(true);
                self.notify_system_message("Connected to server");
            }
            LifecycleEvent::Disconnected => {
                self.notify_connection_status(false);
                self.notify_system_message("Disconnected from server");
            }
            LifecycleEvent::ServerStarted(addr) => {
                self.notify_system_message(&format!("Server started on {}", addr));
            }
            LifecycleEvent::ServerStopped => self.notify_system_message("Server stopped"),
        }
    }
}
