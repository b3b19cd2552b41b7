//! Per-class conversion of lshw nodes into inventory records.
//!
//! Every optional attribute has a default here, so a sparse node never
//! fails extraction.

use crate::hardware::descriptor::{DescriptorNode, Names};
use crate::hardware::types::{Cpu, Disk, Gpu, MemoryModule, NetworkInterface};
use crate::hardware::vendor::canonical_vendor;

const GIB: f64 = (1u64 << 30) as f64;

/// One disk per child of a storage controller node.
pub fn storage(node: &DescriptorNode) -> Vec<Disk> {
    node.children()
        .iter()
        .map(|device| Disk {
            logical_name: device
                .logicalname
                .as_ref()
                .and_then(|names| names.as_slice().first().cloned()),
            product: device.product.clone(),
            vendor: device.product.as_deref().map(canonical_vendor),
            serial: device.serial.clone(),
            version: device.version.clone(),
            size_bytes: device.size,
            description: device.description.clone(),
            disk_type: device.description.clone(),
        })
        .collect()
}

/// Populated DIMMs of a memory array. A bank without children is not an
/// array (firmware, cache) and yields nothing.
pub fn memory(node: &DescriptorNode) -> Vec<MemoryModule> {
    if !node.has_children() {
        return Vec::new();
    }

    node.children()
        .iter()
        .filter(|dimm| !is_empty_slot(dimm))
        .map(|dimm| MemoryModule {
            slot: dimm.slot.clone(),
            description: dimm.description.clone(),
            id: dimm.id.clone(),
            serial: dimm.serial.clone().unwrap_or_else(|| "N/A".to_string()),
            vendor: dimm.vendor.clone().unwrap_or_else(|| "N/A".to_string()),
            product: dimm.product.clone().unwrap_or_else(|| "N/A".to_string()),
            size_gib: dimm.size.unwrap_or(0) as f64 / GIB,
        })
        .collect()
}

fn is_empty_slot(dimm: &DescriptorNode) -> bool {
    dimm.description
        .as_deref()
        .map_or(false, |description| description.contains("empty"))
}

/// A socket without a product is empty.
pub fn cpu(node: &DescriptorNode) -> Option<Cpu> {
    let product = node.product.clone()?;
    Some(Cpu {
        product,
        vendor: node.vendor.clone().unwrap_or_else(|| "Unknown vendor".to_string()),
        description: node.description.clone().unwrap_or_default(),
        location: node.slot.clone().unwrap_or_default(),
    })
}

pub fn gpu(node: &DescriptorNode) -> Option<Gpu> {
    let product = node.product.clone()?;
    Some(Gpu {
        product,
        vendor: node.vendor.clone().unwrap_or_else(|| "Unknown".to_string()),
        description: node.description.clone().unwrap_or_default(),
    })
}

/// Build an interface record. Cards without a logical name (unplugged
/// mezzanine cards on blades, typically) get the next free `unknown<N>`,
/// counted against what has been recorded so far.
pub fn network(node: &DescriptorNode, recorded: &[NetworkInterface]) -> NetworkInterface {
    let name = node
        .logicalname
        .clone()
        .unwrap_or_else(|| Names::One(unknown_placeholder(recorded)));
    let serial = node.serial.clone().unwrap_or_default();

    NetworkInterface {
        name,
        mac_address: serial.clone(),
        serial,
        product: node.product.clone().unwrap_or_else(|| "Unknown NIC".to_string()),
        vendor: node.vendor.clone().unwrap_or_else(|| "Unknown".to_string()),
        description: node.description.clone().unwrap_or_default(),
    }
}

fn unknown_placeholder(recorded: &[NetworkInterface]) -> String {
    let taken = recorded
        .iter()
        .flat_map(|interface| interface.name.as_slice())
        .filter(|name| name.starts_with("unknown"))
        .count();
    format!("unknown{}", taken)
}
