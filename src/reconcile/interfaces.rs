use serde_json::{json, Value};
use tracing::{debug, info};

use crate::error::Result;
use crate::hardware::types::NetworkInterface;
use crate::netbox::{Collection, DcimApi, Query, Record};

/// Make sure every named interface exists on `device` with the MAC lshw
/// reported. Placeholder `unknown<N>` cards are left out: their names are
/// not stable across runs.
pub fn sync_interfaces<C: DcimApi>(
    client: &C,
    device: &Record,
    interfaces: &[NetworkInterface],
) -> Result<()> {
    for interface in interfaces {
        let name = match interface.name.as_slice().first() {
            Some(name) if !name.starts_with("unknown") => name,
            _ => {
                debug!("skipping unnamed interface {:?}", interface.product);
                continue;
            }
        };

        let query = Query::new().with("device_id", device.id).with("name", name);
        match client.get(Collection::Interfaces, &query)? {
            None => {
                info!("creating interface {} on device {}", name, device.id);
                client.create(
                    Collection::Interfaces,
                    json!({
                        "device": device.id,
                        "name": name,
                        "type": "other",
                        "mac_address": mac_value(&interface.mac_address),
                        "description": interface.description,
                    }),
                )?;
            }
            Some(mut existing) => {
                let recorded = existing.str_field("mac_address").unwrap_or_default();
                if !interface.mac_address.is_empty()
                    && !recorded.eq_ignore_ascii_case(&interface.mac_address)
                {
                    info!("updating MAC address of interface {}", name);
                    existing.set("mac_address", mac_value(&interface.mac_address));
                    client.save(Collection::Interfaces, &mut existing)?;
                }
            }
        }
    }
    Ok(())
}

fn mac_value(mac: &str) -> Value {
    if mac.is_empty() {
        Value::Null
    } else {
        json!(mac.to_uppercase())
    }
}
