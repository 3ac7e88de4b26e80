//! Turns terminal input lines into chat events.

use hydro_chat::{ChatEvent, UiCommand};

/// What a line of terminal input asks for.
#[derive(Debug, Clone)]
pub enum InputLine {
    /// Forward to the chat controller.
    Event(ChatEvent),
    /// Print the command list.
    Help,
    /// Redraw the frame without changing anything.
    Redraw,
    /// Input the front end could not make sense of.
    Invalid(String),
}

pub fn parse_line(line: &str) -> InputLine {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return InputLine::Event(ChatEvent::Typed(line.to_string()));
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or_default();
    match command {
        "/new" => InputLine::Event(ChatEvent::Command(UiCommand::NewConversation)),
        "/mic" | "/voice" => InputLine::Event(ChatEvent::Command(UiCommand::ToggleVoice)),
        "/quit" | "/exit" => InputLine::Event(ChatEvent::Command(UiCommand::Quit)),
        "/history" => InputLine::Redraw,
        "/help" => InputLine::Help,
        "/load" => match parts.next().map(str::parse::<usize>) {
            // Sidebar numbers start at 1
            Some(Ok(n)) if n >= 1 => {
                InputLine::Event(ChatEvent::Command(UiCommand::LoadPosition(n - 1)))
            }
            _ => InputLine::Invalid("usage: /load <n>, where n is a number from the list".to_string()),
        },
        other => InputLine::Invalid(format!("unknown command {}, try /help", other)),
    }
}
