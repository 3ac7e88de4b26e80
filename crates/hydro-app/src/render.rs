//! Plain-text rendering of the chat: sidebar, thread, and status line.

use std::fmt::Write;

use hydro_chat::ConversationStore;
use hydro_core::config::DisplayConfig;
use hydro_core::types::{Message, Sender};
use hydro_speech::SpeechInputAdapter;

const RULE_WIDTH: usize = 60;

/// Build one full frame of the chat UI.
pub fn render_frame(
    store: &ConversationStore,
    speech: Option<&SpeechInputAdapter>,
    display: &DisplayConfig,
) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "== {} ==", display.title);
    let _ = writeln!(out, "Conversations");
    render_sidebar(&mut out, store, display);
    let _ = writeln!(out, "{}", rule);

    for message in store.thread() {
        render_message(&mut out, message, display);
    }
    if store.is_typing() {
        let _ = writeln!(out, "[B] ...");
    }
    if speech.is_some_and(|s| s.is_listening()) {
        let _ = writeln!(out, "(Listening...)");
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", command_hint(speech.is_some()));
    out
}

fn render_sidebar(out: &mut String, store: &ConversationStore, display: &DisplayConfig) {
    let history = store.history();
    if history.is_empty() {
        let _ = writeln!(out, "  No conversation history yet");
        return;
    }
    let selected = store.selected_id();
    for (position, record) in history.records().iter().enumerate() {
        let marker = if selected == Some(record.id) { '>' } else { ' ' };
        let _ = writeln!(
            out,
            "{} {:>2}. {:<33}  {} {}",
            marker,
            position + 1,
            record.title,
            record.timestamp.format(&display.date_format),
            record.timestamp.format(&display.time_format),
        );
    }
}

fn render_message(out: &mut String, message: &Message, display: &DisplayConfig) {
    let time = message.timestamp.format(&display.time_format);
    match message.sender {
        Sender::Bot => {
            let _ = writeln!(out, "[{}] {}  ({})", message.sender.avatar(), message.text, time);
        }
        Sender::User => {
            let _ = writeln!(
                out,
                "{:>width$}  ({}) [{}]",
                message.text,
                time,
                message.sender.avatar(),
                width = RULE_WIDTH / 2
            );
        }
    }
}

fn command_hint(voice_available: bool) -> String {
    let mut hint = String::from("/new  /load <n>  ");
    if voice_available {
        hint.push_str("/mic  ");
    }
    hint.push_str("/help  /quit");
    hint
}

/// Help text listing every command.
pub fn help_text(voice_available: bool, placeholder: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", placeholder);
    let _ = writeln!(text, "  /new         start a new conversation");
    let _ = writeln!(text, "  /history     show the conversation list");
    let _ = writeln!(text, "  /load <n>    reopen conversation number n");
    if voice_available {
        let _ = writeln!(text, "  /mic         start or stop voice input");
    }
    let _ = writeln!(text, "  /quit        exit");
    text
}
