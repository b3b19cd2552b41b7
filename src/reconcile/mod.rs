//! Register and update this host in NetBox.
//!
//! Every change is an individual API call; a failure part way leaves the
//! earlier changes in place and the next run picks up from there. Two agents
//! running at once against the same device can both decide to create it.

pub mod interfaces;
pub mod lookup;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::DeviceSettings;
use crate::error::{AgentError, Result};
use crate::hardware::types::HardwareInventory;
use crate::netbox::{Collection, DcimApi, Query, Record};
use crate::platform::{PlatformIdentity, Topology};

pub use interfaces::sync_interfaces;

pub struct Reconciler<'a, C: DcimApi> {
    client: &'a C,
    identity: &'a PlatformIdentity,
    settings: &'a DeviceSettings,
}

impl<'a, C: DcimApi> Reconciler<'a, C> {
    pub fn new(client: &'a C, identity: &'a PlatformIdentity, settings: &'a DeviceSettings) -> Self {
        Reconciler {
            client,
            identity,
            settings,
        }
    }

    /// Register the host, and its chassis when it is a blade. Safe to run
    /// repeatedly: existing records are looked up, never duplicated.
    pub fn create(&self, inventory: &HardwareInventory) -> Result<Record> {
        let site = self.site()?;

        let device = match &self.identity.topology {
            Topology::Blade {
                slot,
                chassis_serial,
                chassis_model,
            } => {
                let blade = self.find_device(&self.identity.service_tag)?;
                let chassis = match self.find_device(chassis_serial)? {
                    Some(chassis) => chassis,
                    None => self.create_chassis(chassis_serial, chassis_model, site.as_ref())?,
                };
                let blade = match blade {
                    Some(blade) => blade,
                    None => self.create_host(&self.settings.blade_role, site.as_ref())?,
                };
                self.install_in_bay(&chassis, slot, &blade)?;
                blade
            }
            Topology::Standalone => match self.find_device(&self.identity.service_tag)? {
                Some(server) => server,
                None => self.create_host(&self.settings.server_role, site.as_ref())?,
            },
        };

        sync_interfaces(self.client, &device, &inventory.interfaces)?;
        Ok(device)
    }

    /// Bring an already registered host up to date: chassis or slot moves
    /// for blades, and the hostname.
    pub fn update(&self) -> Result<Record> {
        let mut device = self
            .find_device(&self.identity.service_tag)?
            .ok_or_else(|| AgentError::NotRegistered(self.identity.service_tag.clone()))?;

        if let Topology::Blade {
            slot,
            chassis_serial,
            chassis_model,
        } = &self.identity.topology
        {
            self.reconcile_bay(&device, slot, chassis_serial, chassis_model)?;
        }

        if device.str_field("name") != Some(self.identity.hostname.as_str()) {
            info!(
                "renaming device {:?} to {:?}",
                device.str_field("name"),
                self.identity.hostname
            );
            device.set("name", json!(self.identity.hostname));
            self.client.save(Collection::Devices, &mut device)?;
        }

        Ok(device)
    }

    fn reconcile_bay(
        &self,
        blade: &Record,
        slot: &str,
        chassis_serial: &str,
        chassis_model: &str,
    ) -> Result<()> {
        let bay_id = blade
            .get("parent_device")
            .and_then(|parent| parent.get("device_bay"))
            .and_then(|bay| bay.get("id"))
            .and_then(Value::as_u64);
        let current_bay = match bay_id {
            Some(id) => self.client.get(Collection::DeviceBays, &Query::new().with("id", id))?,
            None => None,
        };

        let mut current_bay = match current_bay {
            Some(bay) => bay,
            None => {
                warn!("blade {} is not installed in any bay", self.identity.service_tag);
                let chassis = self.find_or_create_chassis(chassis_serial, chassis_model)?;
                self.install_in_bay(&chassis, slot, blade)?;
                return Ok(());
            }
        };

        let recorded_chassis = match current_bay.nested_id("device") {
            Some(id) => self.client.get(Collection::Devices, &Query::new().with("id", id))?,
            None => None,
        };
        let moved = recorded_chassis
            .as_ref()
            .and_then(|chassis| chassis.str_field("serial"))
            != Some(chassis_serial);
        let right_bay = current_bay.str_field("name") == Some(bay_name(slot).as_str());

        if !moved && right_bay {
            return Ok(());
        }

        let chassis = match recorded_chassis {
            Some(chassis) if !moved => chassis,
            _ => {
                info!("blade {} moved to chassis {}", self.identity.service_tag, chassis_serial);
                self.find_or_create_chassis(chassis_serial, chassis_model)?
            }
        };

        info!("removing blade from {:?}", current_bay.str_field("name"));
        current_bay.set("installed_device", Value::Null);
        self.client.save(Collection::DeviceBays, &mut current_bay)?;

        self.install_in_bay(&chassis, slot, blade)?;
        Ok(())
    }

    /// Put `device` in the chassis bay for `slot`. A chassis without that
    /// bay is left alone.
    fn install_in_bay(&self, chassis: &Record, slot: &str, device: &Record) -> Result<()> {
        let name = bay_name(slot);
        let mut bays = self.client.filter(
            Collection::DeviceBays,
            &Query::new().with("device_id", chassis.id).with("name", &name),
        )?;

        if bays.is_empty() {
            warn!("chassis {} has no bay named {:?}", chassis.id, name);
            return Ok(());
        }
        let mut bay = bays.swap_remove(0);
        if bay.nested_id("installed_device") == Some(device.id) {
            return Ok(());
        }

        info!("installing device {} in {:?} of chassis {}", device.id, name, chassis.id);
        bay.set("installed_device", json!(device.id));
        self.client.save(Collection::DeviceBays, &mut bay)
    }

    fn find_device(&self, serial: &str) -> Result<Option<Record>> {
        self.client
            .get(Collection::Devices, &Query::new().with("serial", serial))
    }

    fn find_or_create_chassis(&self, serial: &str, model: &str) -> Result<Record> {
        match self.find_device(serial)? {
            Some(chassis) => Ok(chassis),
            None => {
                let site = self.site()?;
                self.create_chassis(serial, model, site.as_ref())
            }
        }
    }

    fn site(&self) -> Result<Option<Record>> {
        lookup::site(self.client, self.settings.datacenter.as_deref())
    }

    fn create_chassis(&self, serial: &str, model: &str, site: Option<&Record>) -> Result<Record> {
        let device_type = lookup::device_type(self.client, model)?;
        let role = lookup::device_role(self.client, &self.settings.chassis_role)?;

        info!("creating chassis {} ({})", serial, model);
        let mut fields = json!({
            "name": Value::Null,
            "serial": serial,
            "device_type": device_type.id,
            "role": role.id,
            "site": site.map(|s| s.id),
        });
        self.attach_tags(&mut fields)?;
        self.client.create(Collection::Devices, fields)
    }

    fn create_host(&self, role_name: &str, site: Option<&Record>) -> Result<Record> {
        let device_type = lookup::device_type(self.client, &self.identity.product_name)?;
        let role = lookup::device_role(self.client, role_name)?;

        info!(
            "creating device {} ({}) with role {}",
            self.identity.hostname, self.identity.service_tag, role_name
        );
        let mut fields = json!({
            "name": self.identity.hostname,
            "serial": self.identity.service_tag,
            "device_type": device_type.id,
            "role": role.id,
            "site": site.map(|s| s.id),
        });
        if let Some(platform) = &self.identity.platform {
            fields["platform"] = json!(lookup::platform(self.client, platform)?.id);
        }
        self.attach_tags(&mut fields)?;
        self.client.create(Collection::Devices, fields)
    }

    fn attach_tags(&self, fields: &mut Value) -> Result<()> {
        if self.settings.tags.is_empty() {
            return Ok(());
        }
        let tags = lookup::tags(self.client, &self.settings.tags)?;
        fields["tags"] = tags.iter().map(|tag| json!({"id": tag.id})).collect();
        Ok(())
    }
}

fn bay_name(slot: &str) -> String {
    format!("Blade {}", slot)
}
