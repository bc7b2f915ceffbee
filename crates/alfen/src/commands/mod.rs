//! Command dispatch: bridges CLI args -> `Charger` calls -> output formatting.

pub mod control;
pub mod readings;

use alfen_core::Charger;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a wallbox-bound command to the appropriate handler.
///
/// Every command except `reset` ends with a best-effort logout so the
/// device's session slot is freed for other clients.
pub async fn dispatch(cmd: Command, charger: &Charger, global: &GlobalOpts) -> Result<(), CliError> {
    let result = match cmd {
        Command::Status => readings::status(charger, global).await,
        Command::Info => readings::info(charger, global).await,
        Command::Meter => readings::meter(charger, global).await,
        Command::Current(args) => control::current(charger, args, global).await,
        Command::Enable => control::enable(charger, true).await,
        Command::Disable => control::enable(charger, false).await,
        Command::Phases(args) => control::phases(charger, args, global).await,
        Command::Reset => return control::reset(charger).await,
        // Completions are handled before a connection is made
        Command::Completions(_) => unreachable!(),
    };

    if let Err(e) = charger.client().logout().await {
        tracing::debug!(error = %e, "logout failed (non-fatal)");
    }
    result
}
