//! Command dispatch: bridges CLI args -> console services -> output.

pub mod account;
pub mod config_cmd;
pub mod groups;
pub mod members;
pub mod records;
pub mod util;

use stride_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Members(args) => members::handle(console, args, global).await,
        Command::Records(args) => records::handle(console, args, global).await,
        Command::Groups(args) => groups::handle(console, args, global).await,
        Command::Account(args) => account::handle(console, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
