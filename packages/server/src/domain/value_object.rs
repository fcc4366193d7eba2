//! Value objects for the chat session domain.

use std::{fmt, str::FromStr};

use super::error::ValueObjectError;

/// Identifier the transport assigns to a live connection.
///
/// Stable for the connection's lifetime and never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for ConnectionId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Participant display name: whitespace-trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyDisplayName);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a name produced by the identity generator, which is never blank.
    pub(crate) fn generated(value: String) -> Self {
        debug_assert!(!value.trim().is_empty());
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 24-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const YELLOW: Color = Color::rgb(255, 235, 4);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn red(self) -> u8 {
        self.red
    }

    pub const fn green(self) -> u8 {
        self.green
    }

    pub const fn blue(self) -> u8 {
        self.blue
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(value: &str) -> Result<Self, ValueObjectError> {
        let invalid = || ValueObjectError::InvalidColor(value.to_string());
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Render as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Chat message body: whitespace-trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyMessageBody);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageBody {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_trimmed() {
        // テスト項目: 表示名の前後の空白が除去される
        // given (前提条件):
        let raw = "  alice  ".to_string();

        // when (操作):
        let name = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(name.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_display_name_rejects_whitespace_only() {
        // テスト項目: 空白のみの表示名はエラーになる
        // given (前提条件):
        let raw = " \t\n ".to_string();

        // when (操作):
        let result = DisplayName::new(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyDisplayName));
    }

    #[test]
    fn test_message_body_is_trimmed() {
        // テスト項目: メッセージ本文の前後の空白が除去される
        // given (前提条件):
        let raw = "  hello  ".to_string();

        // when (操作):
        let body = MessageBody::new(raw).unwrap();

        // then (期待する結果):
        assert_eq!(body.as_str(), "hello");
    }

    #[test]
    fn test_message_body_rejects_blank() {
        // テスト項目: 空白のみのメッセージ本文はエラーになる
        // given (前提条件):
        let raw = "   ".to_string();

        // when (操作):
        let result = MessageBody::try_from(raw);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyMessageBody));
    }

    #[test]
    fn test_color_hex_parsing() {
        // テスト項目: #RRGGBB 形式の文字列から色を生成できる（# 省略・小文字も可）
        // given (前提条件):
        let inputs = ["#FF8000", "ff8000", " #ff8000 "];

        // when (操作):
        let colors: Vec<Color> = inputs.iter().map(|s| s.parse().unwrap()).collect();

        // then (期待する結果):
        for color in colors {
            assert_eq!(color, Color::rgb(255, 128, 0));
            assert_eq!(color.to_hex(), "#FF8000");
        }
    }

    #[test]
    fn test_color_rejects_malformed_hex() {
        // テスト項目: 不正な形式の色文字列はエラーになる
        // given (前提条件):
        let inputs = ["", "#FFF", "#GG0000", "#FF00001", "#ÿÿÿ", "#+1+1+1", "-10000"];

        // when (操作):
        let results: Vec<_> = inputs.iter().map(|s| Color::from_hex(s)).collect();

        // then (期待する結果):
        for (input, result) in inputs.iter().zip(results) {
            assert_eq!(result, Err(ValueObjectError::InvalidColor(input.to_string())));
        }
    }
}
