use serde::Deserialize;
use tracing::{info, warn};

use crate::error::DegradedCapabilityError;
use crate::hardware::types::{Disk, HardwareInventory};
use crate::hardware::vendor::canonical_vendor;
use crate::tools;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NvmeList {
    devices: Vec<NvmeDevice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NvmeDevice {
    device_path: String,
    model_number: String,
    serial_number: String,
    firmware: String,
    physical_size: u64,
}

/// Run `nvme list -o json` and turn every reported controller into a disk.
pub fn collect_nvme_disks(program: &str) -> Result<Vec<Disk>, DegradedCapabilityError> {
    if !tools::is_tool(program) {
        return Err(DegradedCapabilityError::ToolMissing(format!("{}-cli", program)));
    }

    info!("Trying to find NVME devices");
    let output = tools::run_tool(program, &["list", "-o", "json"]).map_err(|e| {
        DegradedCapabilityError::Invocation {
            program: program.to_string(),
            reason: e.to_string(),
        }
    })?;

    parse_nvme_list(&output)
}

pub fn parse_nvme_list(raw: &[u8]) -> Result<Vec<Disk>, DegradedCapabilityError> {
    let list: NvmeList = serde_json::from_slice(raw)?;
    info!("Found {} NVME devices", list.devices.len());

    Ok(list
        .devices
        .into_iter()
        .map(|device| {
            info!(
                "Found NVME device {} with serial {} and size {}",
                device.device_path, device.serial_number, device.physical_size
            );
            Disk {
                logical_name: Some(device.device_path),
                vendor: Some(canonical_vendor(&device.model_number)),
                product: Some(device.model_number),
                serial: Some(device.serial_number),
                version: Some(device.firmware),
                size_bytes: Some(device.physical_size),
                description: Some("NVME".to_string()),
                disk_type: Some("NVME".to_string()),
            }
        })
        .collect())
}

/// Append the secondary tool's disks. Errors only cost the NVMe entries;
/// disks from the lshw walk are kept either way. Disks reported by both
/// tools appear twice.
pub fn merge_secondary_storage(
    inventory: &mut HardwareInventory,
    found: Result<Vec<Disk>, DegradedCapabilityError>,
) {
    match found {
        Ok(disks) => inventory.disks.extend(disks),
        Err(e) => warn!("Skipping NVME devices: {}", e),
    }
}
