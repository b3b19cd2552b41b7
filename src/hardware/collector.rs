use crate::config::ToolsConfig;
use crate::error::{AgentError, Result};
use crate::hardware::types::HardwareInventory;
use crate::hardware::{build_inventory, collect_nvme_disks, merge_secondary_storage, parse_descriptor};
use crate::tools;

/// Run lshw, walk its report, then fold in the NVMe listing.
///
/// A missing or unreadable lshw is fatal; the NVMe step never is.
pub fn collect_full_inventory(tools_config: &ToolsConfig) -> Result<HardwareInventory> {
    if !tools::is_tool(&tools_config.lshw) {
        return Err(AgentError::ToolMissing(tools_config.lshw.clone()));
    }

    let raw = tools::run_tool(&tools_config.lshw, &["-quiet", "-json"])?;
    let root = parse_descriptor(&raw)?;

    let mut inventory = build_inventory(&root)?;
    merge_secondary_storage(&mut inventory, collect_nvme_disks(&tools_config.nvme));

    Ok(inventory)
}
