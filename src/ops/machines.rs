//! Machine listing.

use anyhow::Result;

use crate::machines::registry::MachineSummary;
use crate::machines::{HostInfo, MachineRegistry};
use crate::util::GlobalContext;

/// Machines available to this project, with the one that would be selected.
#[derive(Debug, Clone)]
pub struct MachineListing {
    pub machines: Vec<MachineSummary>,
    pub host: HostInfo,
    pub selected: String,
}

/// List built-in machines and machine files.
pub fn list_machines(gctx: &GlobalContext) -> Result<MachineListing> {
    let registry = MachineRegistry::builtin();
    let machines = registry.list(Some(&gctx.machines_dir()))?;
    let selected = super::select_machine(gctx, None)?;
    Ok(MachineListing {
        machines,
        host: HostInfo::detect(),
        selected: selected.id,
    })
}

/// Render a listing as aligned text, marking the selected machine.
pub fn format_listing(listing: &MachineListing) -> String {
    let width = listing
        .machines
        .iter()
        .map(|m| m.id.len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for machine in &listing.machines {
        let marker = if machine.id == listing.selected { '*' } else { ' ' };
        out.push_str(&format!(
            "{} {:<width$}  {} [{}]\n",
            marker,
            machine.id,
            machine.description,
            machine.source,
            width = width
        ));
    }
    out
}
