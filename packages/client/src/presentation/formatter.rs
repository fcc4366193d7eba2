//! Message formatting utilities for terminal display.

use parlor_server::domain::Color;

use crate::mirror::ParticipantView;

const GREEN: Color = Color::rgb(0, 255, 0);
const SEPARATOR: &str = "============================================================";

/// Message formatter for terminal display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Wrap `text` in a 24-bit ANSI foreground colour
    pub fn paint(text: &str, color: Color) -> String {
        format!(
            "\x1b[38;2;{};{};{}m{}\x1b[0m",
            color.red(),
            color.green(),
            color.blue(),
            text
        )
    }

    /// Format a chat message as `[sender]: text`, the sender in their colour
    pub fn format_chat_message(sender: &str, text: &str, color: Color) -> String {
        format!("{}: {}", Self::paint(&format!("[{}]", sender), color), text)
    }

    pub fn format_system_message(text: &str) -> String {
        Self::format_chat_message("System", text, Color::YELLOW)
    }

    pub fn format_error_message(text: &str) -> String {
        Self::format_chat_message("Error", text, Color::RED)
    }

    pub fn format_connection_status(connected: bool) -> String {
        let status = if connected {
            Self::paint("connected", GREEN)
        } else {
            Self::paint("disconnected", Color::RED)
        };
        format!("Status: {}", status)
    }

    /// Format the participant list, marking the local participant
    ///
    /// # Arguments
    ///
    /// * `participants` - Roster snapshot in join order
    /// * `me` - Connection id of this client, if connected
    pub fn format_roster(participants: &[ParticipantView], me: Option<u64>) -> String {
        let mut output = String::new();
        output.push_str(SEPARATOR);
        output.push_str("\nParticipants:\n");

        if participants.is_empty() {
            output.push_str("(No participants)\n");
        } else {
            for participant in participants {
                let me_suffix = if Some(participant.connection_id) == me {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!(
                    "{}{} {}\n",
                    Self::paint(&participant.name, participant.color),
                    me_suffix,
                    participant.color
                ));
            }
        }

        output.push_str(SEPARATOR);
        output
    }

    pub fn format_help() -> String {
        [
            "Commands:",
            "  <text>          send a chat message",
            "  /name <name>    change your display name",
            "  /color #RRGGBB  change your colour",
            "  /connect        connect or disconnect (client mode)",
            "  /who            list participants",
            "  /help           show this help",
            "  /quit           leave",
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_uses_truecolor_escape() {
        // テスト項目: 24bit カラーのエスケープシーケンスで着色される
        // given (前提条件):
        let color = Color::rgb(12, 34, 56);

        // when (操作):
        let result = MessageFormatter::paint("alice", color);

        // then (期待する結果):
        assert_eq!(result, "\x1b[38;2;12;34;56malice\x1b[0m");
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージが [送信者]: 本文 の形式でフォーマットされる
        // given (前提条件):
        let color = Color::rgb(200, 150, 255);

        // when (操作):
        let result = MessageFormatter::format_chat_message("alice", "Hello, world!", color);

        // then (期待する結果):
        assert!(result.contains("[alice]"));
        assert!(result.ends_with(": Hello, world!"));
        assert!(result.starts_with("\x1b[38;2;200;150;255m"));
    }

    #[test]
    fn test_system_and_error_messages_use_fixed_palette() {
        // テスト項目: システムメッセージは黄色、エラーは赤で表示される
        // given (前提条件):
        let text = "something happened";

        // when (操作):
        let system = MessageFormatter::format_system_message(text);
        let error = MessageFormatter::format_error_message(text);

        // then (期待する結果):
        assert!(system.starts_with("\x1b[38;2;255;235;4m[System]"));
        assert!(error.starts_with("\x1b[38;2;255;0;0m[Error]"));
        assert!(system.ends_with(text));
    }

    #[test]
    fn test_format_connection_status() {
        // テスト項目: 接続状態が表示される
        // given (前提条件):
        // when (操作):
        let connected = MessageFormatter::format_connection_status(true);
        let disconnected = MessageFormatter::format_connection_status(false);

        // then (期待する結果):
        assert!(connected.contains("connected"));
        assert!(!connected.contains("disconnected"));
        assert!(disconnected.contains("disconnected"));
    }

    #[test]
    fn test_format_roster_with_empty_participants() {
        // テスト項目: 参加者が空の場合、適切なメッセージが表示される
        // given (前提条件):
        let participants = vec![];

        // when (操作):
        let result = MessageFormatter::format_roster(&participants, None);

        // then (期待する結果):
        assert!(result.contains("Participants:"));
        assert!(result.contains("(No participants)"));
    }

    #[test]
    fn test_format_roster_marks_me() {
        // テスト項目: 複数参加者の場合、全員が表示され自分にはマークが付く
        // given (前提条件):
        let participants = vec![
            ParticipantView {
                connection_id: 1,
                name: "alice".to_string(),
                color: Color::WHITE,
            },
            ParticipantView {
                connection_id: 2,
                name: "bob".to_string(),
                color: Color::RED,
            },
        ];

        // when (操作):
        let result = MessageFormatter::format_roster(&participants, Some(1));

        // then (期待する結果):
        assert!(result.contains("alice\x1b[0m (me)"));
        assert!(result.contains("bob\x1b[0m #FF0000"));
    }
}
