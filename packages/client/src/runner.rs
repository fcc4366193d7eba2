//! Interactive terminal loop for `host` and `client` modes.

use std::sync::Arc;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    command::InputCommand,
    presentation::{MessageFormatter, PresentationSink, TerminalSink, terminal::DEFAULT_PROMPT},
    session::{SessionManager, SessionRole},
    subscription::Subscription,
};

/// Read lines on a blocking thread and hand them to the async side.
///
/// The thread ends on Ctrl+C, Ctrl+D or when the receiver is dropped.
fn spawn_readline() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(DEFAULT_PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}

/// Run the interactive session until `/quit` or end of input, then stop
/// whatever role is still active.
pub async fn run_interactive(manager: Arc<SessionManager>, sink: Arc<TerminalSink>) {
    let mut lines = spawn_readline();
    let (command_tx, mut commands) = mpsc::unbounded_channel();

    // Parsing lives in its own task so the subscription owns the input side
    let _input = Subscription::spawn(async move {
        while let Some(line) = lines.recv().await {
            if let Some(command) = InputCommand::parse(&line)
                && command_tx.send(command).is_err()
            {
                break;
            }
        }
    });

    sink.notify_system_message("Chat system ready. Type /help for commands.");

    while let Some(command) = commands.recv().await {
        match command {
            InputCommand::Chat(text) => manager.submit(&text).await,
            InputCommand::Rename(name) => manager.rename(&name).await,
            InputCommand::Color(color) => manager.set_color(color).await,
            InputCommand::Connect => {
                // Failures are already reported on the sink
                let _ = manager.toggle_connection().await;
            }
            InputCommand::Who => {
                let me = manager.me().await.map(|p| p.connection_id);
                sink.print(&MessageFormatter::format_roster(&manager.roster().await, me));
            }
            InputCommand::Help => sink.print(&MessageFormatter::format_help()),
            InputCommand::Quit => break,
            InputCommand::Invalid(message) => sink.notify_error(&message),
        }
    }

    if manager.role().await != SessionRole::Offline {
        let _ = manager.stop().await;
    }
}
