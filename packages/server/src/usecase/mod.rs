//! UseCase 層: 参加者の参加・退出・更新とメッセージ中継
//!
//! 各ユースケースは Repository と MessagePusher の trait にのみ依存します。
//! 呼び出しの直列化は UI 層の hub が担当します。

mod change_color;
mod error;
mod get_roster;
mod join_participant;
mod leave_participant;
mod rename_participant;
mod submit_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use change_color::ChangeColorUseCase;
pub use error::{JoinError, RosterQueryError};
pub use get_roster::GetRosterUseCase;
pub use join_participant::JoinParticipantUseCase;
pub use leave_participant::LeaveParticipantUseCase;
pub use rename_participant::RenameParticipantUseCase;
pub use submit_message::SubmitMessageUseCase;
