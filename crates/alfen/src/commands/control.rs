//! Command handlers that change the wallbox's charging setup.

use alfen_core::Charger;
use serde_json::json;

use crate::cli::{CurrentArgs, CurrentCommand, GlobalOpts, PhasesArgs, PhasesCommand};
use crate::error::CliError;
use crate::output;

pub async fn current(
    charger: &Charger,
    args: CurrentArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        None => {
            let max_current = charger.max_current().await?;
            let out = output::render_single(global.output, &json!({ "max_current": max_current }), |_| {
                format!("{max_current:.0} A")
            })?;
            output::print_output(&out);
            Ok(())
        }
        Some(CurrentCommand::Set { amps }) => {
            charger.set_max_current(amps).await?;
            eprintln!("Current limit set to {amps} A");
            Ok(())
        }
    }
}

pub async fn enable(charger: &Charger, enable: bool) -> Result<(), CliError> {
    charger.enable(enable).await?;
    eprintln!("Charging {}", if enable { "enabled" } else { "disabled" });
    Ok(())
}

pub async fn phases(
    charger: &Charger,
    args: PhasesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        None => {
            let phases = charger.phases().await?;
            let out = output::render_single(global.output, &json!({ "phases": phases }), |_| {
                phases.to_string()
            })?;
            output::print_output(&out);
            Ok(())
        }
        Some(PhasesCommand::Set { phases }) => {
            charger.set_phases(phases).await?;
            eprintln!("Switched to {phases}-phase charging");
            Ok(())
        }
    }
}

/// Best-effort; reports success even when individual steps failed (they
/// are logged at warn level).
pub async fn reset(charger: &Charger) -> Result<(), CliError> {
    charger.shutdown().await;
    eprintln!("Wallbox reset to 3-phase charging at {} A", alfen_core::MAX_CURRENT);
    Ok(())
}
