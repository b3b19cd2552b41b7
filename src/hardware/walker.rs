use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::hardware::descriptor::{DescriptorNode, NodeClass};
use crate::hardware::extract;
use crate::hardware::types::{HardwareInventory, PowerSupply};

/// Walk an lshw tree and collect its components.
///
/// The walk follows the shape lshw produces rather than visiting every
/// node: root children, their children, and two levels below each bridge.
/// Network cards are only ever found below a bridge.
pub fn build_inventory(root: &DescriptorNode) -> Result<HardwareInventory> {
    let vendor = root.vendor.clone().ok_or(AgentError::DescriptorShape("vendor"))?;
    let product = root.product.clone().ok_or(AgentError::DescriptorShape("product"))?;
    let chassis_serial = root.serial.clone().ok_or(AgentError::DescriptorShape("serial"))?;
    let motherboard = root
        .children()
        .first()
        .ok_or(AgentError::DescriptorShape("children[0]"))?;

    let mut inventory = HardwareInventory {
        vendor,
        product,
        chassis_serial,
        motherboard_serial: motherboard.serial.clone().unwrap_or_else(|| "No S/N".to_string()),
        motherboard_product: motherboard
            .product
            .clone()
            .unwrap_or_else(|| "Motherboard".to_string()),
        cpus: Vec::new(),
        memories: Vec::new(),
        disks: Vec::new(),
        interfaces: Vec::new(),
        gpus: Vec::new(),
        power: Vec::new(),
    };

    for child in root.children() {
        if child.class == NodeClass::Power {
            inventory
                .power
                .push(PowerSupply(serde_json::to_value(child)?));
        }

        for node in child.children() {
            match node.class {
                NodeClass::Storage => inventory.disks.extend(extract::storage(node)),
                NodeClass::Memory => inventory.memories.extend(extract::memory(node)),
                NodeClass::Processor => inventory.cpus.extend(extract::cpu(node)),
                NodeClass::Bridge => walk_bridge(node, &mut inventory),
                _ => {}
            }
        }
    }

    info!(
        cpus = inventory.cpus.len(),
        memories = inventory.memories.len(),
        disks = inventory.disks.len(),
        interfaces = inventory.interfaces.len(),
        gpus = inventory.gpus.len(),
        power = inventory.power.len(),
        "walked lshw tree"
    );

    Ok(inventory)
}

fn walk_bridge(bridge: &DescriptorNode, inventory: &mut HardwareInventory) {
    for bus in bridge.children() {
        match bus.class {
            NodeClass::Storage => inventory.disks.extend(extract::storage(bus)),
            NodeClass::Display => inventory.gpus.extend(extract::gpu(bus)),
            _ => {}
        }

        for device in bus.children() {
            match device.class {
                NodeClass::Storage => {
                    debug!(id = %device.id, "found storage below bridge");
                    inventory.disks.extend(extract::storage(device));
                }
                NodeClass::Network => {
                    let interface = extract::network(device, &inventory.interfaces);
                    inventory.interfaces.push(interface);
                }
                NodeClass::Display => inventory.gpus.extend(extract::gpu(device)),
                _ => {}
            }
        }
    }
}
