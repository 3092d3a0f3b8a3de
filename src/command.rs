//! Display commands and their wire format.
//!
//! A command is one line of comma-separated fields. The first field names the
//! command, the rest are positional arguments:
//!
//! | Line | Command |
//! |------|---------|
//! | `text,hello,world` | [`Command::ShowText`] with a two-line [`StaticText`] |
//! | `atext,A,B,C` | [`Command::ShowText`] with a [`CyclingText`] over `A`, `B`, `C` |
//! | `status` | [`Command::ShowStatus`] (extra fields are ignored) |
//!
//! Unknown names and `text`/`atext` without arguments decode to `None` and
//! are dropped without any reply to the client; they are only visible in the
//! debug log.
//!
//! Decoded commands travel to the render loop over an unbounded MPSC queue:
//! any number of connection handlers send, the render loop drains it with
//! non-blocking receives.

use tokio::sync::mpsc;
use tracing::debug;

use crate::widgets::{CyclingText, Drawable, StaticText};

/// A decoded display directive.
#[derive(Debug)]
pub enum Command {
    /// Return to the idle screen and show this content below the logo.
    ShowText(Drawable),
    /// Switch to the live dashboard.
    ShowStatus,
}

/// Producer half of the command queue, cloned into every connection handler.
pub type CommandSender = mpsc::UnboundedSender<Command>;

/// Consumer half of the command queue, owned by the render loop.
pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

/// Create the command queue.
pub fn queue() -> (CommandSender, CommandReceiver) {
    mpsc::unbounded_channel()
}

/// Decode one command line. Only the line terminator is stripped; any other
/// whitespace is part of the fields.
pub fn decode(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split(',');
    let name = fields.next().unwrap_or_default();
    let args: Vec<&str> = fields.collect();

    let command = match name {
        "text" if !args.is_empty() => Command::ShowText(StaticText::new(&args.join("\n")).into()),
        "atext" if !args.is_empty() => {
            Command::ShowText(CyclingText::new(args.iter().map(|&arg| arg.to_owned()).collect()).into())
        }
        "status" => Command::ShowStatus,
        _ => {
            debug!(line, "Dropping unrecognized command");
            return None;
        }
    };
    Some(command)
}
