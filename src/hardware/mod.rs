// Hardware inventory from lshw and nvme-cli reports
pub mod types;
pub mod descriptor;
pub mod extract;
pub mod walker;
pub mod nvme;
pub mod vendor;
pub mod collector;

// Re-export main collection functions
pub use descriptor::parse_descriptor;
pub use walker::build_inventory;
pub use nvme::{collect_nvme_disks, merge_secondary_storage};
pub use collector::collect_full_inventory;
