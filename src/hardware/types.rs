use serde::Serialize;

use crate::hardware::descriptor::Names;

#[derive(Debug, Serialize)]
pub struct HardwareInventory {
    pub vendor: String,
    pub product: String,
    pub chassis_serial: String,
    pub motherboard_serial: String,
    pub motherboard_product: String,
    pub cpus: Vec<Cpu>,
    pub memories: Vec<MemoryModule>,
    pub disks: Vec<Disk>,
    pub interfaces: Vec<NetworkInterface>,
    pub gpus: Vec<Gpu>,
    pub power: Vec<PowerSupply>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cpu {
    pub product: String,
    pub vendor: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryModule {
    pub slot: Option<String>,
    pub description: Option<String>,
    pub id: String,
    pub serial: String,
    pub vendor: String,
    pub product: String,
    pub size_gib: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disk {
    pub logical_name: Option<String>,
    pub product: Option<String>,
    pub vendor: Option<String>,
    pub serial: Option<String>,
    pub version: Option<String>,
    pub size_bytes: Option<u64>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub disk_type: Option<String>, // lshw description, or "NVME"
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkInterface {
    pub name: Names,
    pub mac_address: String,
    pub serial: String,
    pub product: String,
    pub vendor: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gpu {
    pub product: String,
    pub vendor: String,
    pub description: String,
}

/// Raw lshw `power` node, kept as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PowerSupply(pub serde_json::Value);
