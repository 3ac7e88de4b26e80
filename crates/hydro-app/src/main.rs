//! HydroIntel terminal chat - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing (stderr, so the chat on stdout stays readable)
//! 3. Build the chat controller, probing for speech input
//! 4. Multiplex stdin lines and controller events on one loop, redrawing
//!    the frame after every change

mod cli;
mod input;
mod render;

use std::io::IsTerminal;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use hydro_chat::{ChatController, ChatEvent, Flow};
use hydro_core::config::HydroConfig;

use crate::cli::CliArgs;
use crate::input::{parse_line, InputLine};

enum Next {
    Event(Option<ChatEvent>),
    Line(std::io::Result<Option<String>>),
}

fn draw(controller: &ChatController, config: &HydroConfig, clear: bool) {
    if clear {
        print!("\x1b[2J\x1b[H");
    }
    print!(
        "{}",
        render::render_frame(controller.store(), controller.speech(), &config.display)
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config (read before tracing so its log level can apply). A missing or
    // unreadable file falls back to defaults.
    let config_file = args.resolve_config_path();
    let mut config = HydroConfig::load_or_default(&config_file);
    args.apply(&mut config)?;

    // Tracing.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(args.resolve_log_filter(&config.general.log_level))
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting HydroIntel v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let mut controller = ChatController::new(&config);
    tracing::info!(
        reply_delay_ms = controller.reply_delay().as_millis() as u64,
        voice = controller.speech().is_some(),
        "Chat ready"
    );

    let clear = !args.plain && std::io::stdout().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&controller, &config, clear);

    loop {
        let next = tokio::select! {
            event = controller.next_event() => Next::Event(event),
            line = lines.next_line() => Next::Line(line),
        };

        let event = match next {
            Next::Event(Some(event)) => event,
            Next::Event(None) => break,
            Next::Line(Ok(Some(line))) => match parse_line(&line) {
                InputLine::Event(event) => event,
                InputLine::Help => {
                    print!(
                        "{}",
                        render::help_text(controller.speech().is_some(), &config.display.placeholder)
                    );
                    continue;
                }
                InputLine::Redraw => {
                    draw(&controller, &config, clear);
                    continue;
                }
                InputLine::Invalid(notice) => {
                    println!("{}", notice);
                    continue;
                }
            },
            Next::Line(Ok(None)) => {
                tracing::info!("Input closed");
                break;
            }
            Next::Line(Err(e)) => {
                tracing::error!(error = %e, "Failed to read input");
                return Err(e.into());
            }
        };

        match controller.dispatch(event) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => draw(&controller, &config, clear),
            Err(e) => {
                tracing::warn!(error = %e, "Command failed");
                println!("{}", e);
            }
        }
    }

    tracing::info!("HydroIntel stopped");
    Ok(())
}
