//! Terminal rendering of session activity.

use std::{
    collections::VecDeque,
    io::Write,
    sync::{Mutex, PoisonError},
};

use parlor_server::domain::Color;

use super::{MessageFormatter, PresentationSink};

pub const DEFAULT_PROMPT: &str = "> ";

/// Prints every notification on stdout and keeps the most recent
/// `max_history` rendered lines.
pub struct TerminalSink {
    history: Mutex<VecDeque<String>>,
    max_history: usize,
}

impl TerminalSink {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: Mutex::new(VecDeque::with_capacity(max_history.min(1024))),
            max_history,
        }
    }

    /// Rendered lines, oldest first
    pub fn history(&self) -> Vec<String> {
        self.lock_history().iter().cloned().collect()
    }

    pub fn print(&self, text: &str) {
        print!("\r\x1b[2K{}\n{}", text, DEFAULT_PROMPT);
        std::io::stdout().flush().ok();
    }

    fn render(&self, line: String) {
        self.print(&line);

        let mut history = self.lock_history();
        history.push_back(line);
        while history.len() > self.max_history {
            history.pop_front();
        }
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, VecDeque<String>> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PresentationSink for TerminalSink {
    fn notify_connection_status(&self, connected: bool) {
        self.render(MessageFormatter::format_connection_status(connected));
    }

    fn notify_message(&self, sender: &str, text: &str, color: Color) {
        self.render(MessageFormatter::format_chat_message(sender, text, color));
    }

    fn notify_system_message(&self, text: &str) {
        self.render(MessageFormatter::format_system_message(text));
    }

    fn notify_error(&self, text: &str) {
        self.render(MessageFormatter::format_error_message(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_keeps_most_recent_lines() {
        // テスト項目: 表示履歴は上限を超えると古いものから削除される
        // given (前提条件):
        let sink = TerminalSink::new(2);

        // when (操作):
        sink.notify_system_message("first");
        sink.notify_message("alice", "second", Color::WHITE);
        sink.notify_error("third");

        // then (期待する結果):
        let history = sink.history();
        assert_eq!(history.len(), 2);
        assert!(history[0].ends_with("second"));
        assert!(history[1].ends_with("third"));
    }

    #[test]
    fn test_lifecycle_maps_to_status_and_system_line() {
        // テスト項目: ライフサイクル通知は接続状態とシステムメッセージに変換される
        // given (前提条件):
        let sink = TerminalSink::new(10);

        // when (操作):
        sink.notify_lifecycle(crate::presentation::LifecycleEvent::Connected);

        // then (期待する結果):
        let history = sink.history();
        assert_eq!(history.len(), 2);
        assert!(history[0].starts_with("Status: "));
        assert!(history[1].ends_with("Connected to server"));
    }
}
