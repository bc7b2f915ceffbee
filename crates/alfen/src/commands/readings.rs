//! Read-only command handlers.

use alfen_core::{ChargeStatus, Charger, Diagnosis, PhaseValues};
use serde::Serialize;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    status: ChargeStatus,
    enabled: bool,
    max_current: f64,
    phases: i64,
    power_w: f64,
    energy_kwh: f64,
}

#[derive(Debug, Serialize)]
struct MeterReport {
    power_w: f64,
    energy_kwh: f64,
    currents: PhaseValues,
    voltages: PhaseValues,
}

pub async fn status(charger: &Charger, global: &GlobalOpts) -> Result<(), CliError> {
    // All readings come out of the same snapshot
    let (status, enabled, max_current, phases, power_w, energy_kwh) = tokio::try_join!(
        charger.status(),
        charger.is_enabled(),
        charger.max_current(),
        charger.phases(),
        charger.current_power(),
        charger.total_energy(),
    )?;

    let report = StatusReport {
        status,
        enabled,
        max_current,
        phases,
        power_w,
        energy_kwh,
    };

    let out = output::render_single(global.output, &report, |r| {
        output::key_values(&[
            ("status", r.status.to_string()),
            ("enabled", r.enabled.to_string()),
            ("max current", format!("{:.0} A", r.max_current)),
            ("phases", r.phases.to_string()),
            ("power", format!("{:.0} W", r.power_w)),
            ("energy", format!("{:.2} kWh", r.energy_kwh)),
        ])
    })?;
    output::print_output(&out);
    Ok(())
}

pub async fn info(charger: &Charger, global: &GlobalOpts) -> Result<(), CliError> {
    let diagnosis = charger.diagnose().await?;

    let out = output::render_single(global.output, &diagnosis, detail)?;
    output::print_output(&out);
    Ok(())
}

fn detail(d: &Diagnosis) -> String {
    let mut rows = vec![
        ("identity", d.info.identity.clone()),
        ("model", d.info.model.clone()),
        ("firmware", d.info.firmware.clone()),
        ("object id", d.info.object_id.clone()),
        ("type", d.info.device_type.clone()),
    ];
    if !d.info.scn_network.is_empty() {
        rows.push(("scn network", d.info.scn_network.clone()));
    }
    if let Some(n) = d.bootups {
        rows.push(("bootups", n.to_string()));
    }
    if let Some(ref reason) = d.boot_reason {
        rows.push(("boot reason", reason.clone()));
    }
    // Raw counter; the device does not state its unit
    if let Some(uptime) = d.uptime {
        rows.push(("uptime", uptime.to_string()));
    }
    output::key_values(&rows)
}

pub async fn meter(charger: &Charger, global: &GlobalOpts) -> Result<(), CliError> {
    let (power_w, energy_kwh, currents, voltages) = tokio::try_join!(
        charger.current_power(),
        charger.total_energy(),
        charger.currents(),
        charger.voltages(),
    )?;

    let report = MeterReport {
        power_w,
        energy_kwh,
        currents,
        voltages,
    };

    let out = output::render_single(global.output, &report, |r| {
        output::key_values(&[
            ("power", format!("{:.0} W", r.power_w)),
            ("energy", format!("{:.2} kWh", r.energy_kwh)),
            ("currents", phase_line(&r.currents, "A")),
            ("voltages", phase_line(&r.voltages, "V")),
        ])
    })?;
    output::print_output(&out);
    Ok(())
}

fn phase_line(v: &PhaseValues, unit: &str) -> String {
    format!("{:.1} / {:.1} / {:.1} {unit}", v.l1, v.l2, v.l3)
}
