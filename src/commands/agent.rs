use serde::Serialize;
use tracing::info;

use crate::cli::Commands;
use crate::config::AgentConfig;
use crate::hardware::collect_full_inventory;
use crate::netbox::{Collection, DcimApi, NetboxClient, Query, Record};
use crate::output::{output_data, print_success};
use crate::platform::PlatformIdentity;
use crate::reconcile::{lookup, Reconciler};

#[derive(Serialize)]
struct DebugReport {
    identity: PlatformIdentity,
    site: Option<Record>,
    device: Option<Record>,
}

pub fn handle_command(cmd: &Commands, config: &AgentConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Inventory { format } => {
            let inventory = collect_full_inventory(&config.tools)?;
            output_data(&inventory, format)?;
        }
        Commands::Register => {
            // The inventory is complete before NetBox is touched.
            let inventory = collect_full_inventory(&config.tools)?;
            let identity = PlatformIdentity::probe(config)?;
            let client = NetboxClient::new(&config.netbox)?;

            info!("registering {} in {}", identity.service_tag, config.netbox.url);
            let device = Reconciler::new(&client, &identity, &config.device).create(&inventory)?;
            print_success(&format!("{} registered as device {}", identity.hostname, device.id));
        }
        Commands::Update => {
            let identity = PlatformIdentity::probe(config)?;
            let client = NetboxClient::new(&config.netbox)?;

            let device = Reconciler::new(&client, &identity, &config.device).update()?;
            print_success(&format!("device {} is up to date", device.id));
        }
        Commands::Debug { format } => {
            let identity = PlatformIdentity::probe(config)?;
            let client = NetboxClient::new(&config.netbox)?;

            let site = lookup::site(&client, config.device.datacenter.as_deref())?;
            let device = client.get(
                Collection::Devices,
                &Query::new().with("serial", &identity.service_tag),
            )?;
            output_data(&DebugReport { identity, site, device }, format)?;
        }
    }
    Ok(())
}
