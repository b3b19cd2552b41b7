use serde::Serialize;
use smbioslib::*;
use sysinfo::System;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::tools;

/// Where the host physically sits.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Topology {
    Standalone,
    Blade {
        slot: String,
        chassis_serial: String,
        chassis_model: String,
    },
}

/// Identity facts the reconciler keys on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformIdentity {
    pub hostname: String,
    pub service_tag: String,
    pub product_name: String,
    pub platform: Option<String>,
    pub topology: Topology,
}

/// The subset of SMBIOS the identity is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmiFacts {
    pub product_name: Option<String>,
    pub service_tag: Option<String>,
    pub chassis_serial: Option<String>,
    pub chassis_version: Option<String>,
    pub chassis_is_blade: bool,
    pub board_location: Option<String>,
}

impl PlatformIdentity {
    /// Read SMBIOS and the running system, then apply config overrides.
    pub fn probe(config: &AgentConfig) -> Result<Self> {
        let hostname = match &config.device.hostname_cmd {
            Some(command) => tools::run_shell(command)?,
            None => System::host_name().unwrap_or_else(|| "localhost".to_string()),
        };
        let platform = config
            .device
            .platform
            .clone()
            .or_else(System::long_os_version);

        Self::from_facts(read_dmi(), hostname, platform, config)
    }

    pub fn from_facts(
        dmi: DmiFacts,
        hostname: String,
        platform: Option<String>,
        config: &AgentConfig,
    ) -> Result<Self> {
        let overrides = &config.overrides;
        let service_tag = dmi
            .service_tag
            .ok_or(AgentError::MissingIdentity("system serial number"))?;
        let product_name = dmi
            .product_name
            .ok_or(AgentError::MissingIdentity("system product name"))?;

        if !verify_serial(&service_tag) {
            warn!("service tag {:?} does not look like a hardware serial", service_tag);
        }

        let topology = if overrides.blade.unwrap_or(dmi.chassis_is_blade) {
            let slot = overrides
                .blade_slot
                .clone()
                .or_else(|| dmi.board_location.as_deref().map(blade_slot_from_location))
                .ok_or(AgentError::MissingIdentity("blade slot"))?;
            let chassis_serial = overrides
                .chassis_serial
                .clone()
                .or(dmi.chassis_serial)
                .ok_or(AgentError::MissingIdentity("chassis serial number"))?;
            let chassis_model = overrides
                .chassis_model
                .clone()
                .or(dmi.chassis_version)
                .ok_or(AgentError::MissingIdentity("chassis model"))?;
            Topology::Blade {
                slot,
                chassis_serial,
                chassis_model,
            }
        } else {
            Topology::Standalone
        };

        Ok(PlatformIdentity {
            hostname,
            service_tag,
            product_name,
            platform,
            topology,
        })
    }
}

/// "Slot 04" -> "4". Locations without digits are kept verbatim.
fn blade_slot_from_location(location: &str) -> String {
    let digits: String = location
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.trim_start_matches('0') {
        "" if digits.is_empty() => location.trim().to_string(),
        "" => "0".to_string(),
        slot => slot.to_string(),
    }
}

/// 1 to 12 ASCII alphanumerics, at least one of them a digit.
pub fn verify_serial(serial: &str) -> bool {
    (1..=12).contains(&serial.len())
        && serial.chars().all(|c| c.is_ascii_alphanumeric())
        && serial.chars().any(|c| c.is_ascii_digit())
}

fn meaningful(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| {
            !s.is_empty()
                && s != "Not Specified"
                && s != "Not Available"
                && s != "To Be Filled By O.E.M."
                && s != "Default string"
        })
}

/// Load SMBIOS from sysfs. An unreadable table yields empty facts.
pub fn read_dmi() -> DmiFacts {
    let smbios_data = match SMBiosData::try_load_from_file("/sys/firmware/dmi/tables/DMI", None) {
        Ok(data) => data,
        Err(e) => {
            warn!("unable to read SMBIOS tables: {}", e);
            return DmiFacts::default();
        }
    };

    let mut facts = DmiFacts::default();
    for structure in smbios_data.iter() {
        match structure.defined_struct() {
            DefinedStruct::SystemInformation(system) => {
                facts.product_name = meaningful(system.product_name().to_utf8_lossy());
                facts.service_tag = meaningful(system.serial_number().to_utf8_lossy());
            }
            DefinedStruct::SystemChassisInformation(chassis) => {
                facts.chassis_serial = meaningful(chassis.serial_number().to_utf8_lossy());
                facts.chassis_version = meaningful(chassis.version().to_utf8_lossy());
                facts.chassis_is_blade = chassis.chassis_type().map_or(false, |kind| {
                    matches!(
                        kind.value,
                        ChassisType::Blade | ChassisType::BladeEnclosure | ChassisType::MultiSystemChassis
                    )
                });
            }
            DefinedStruct::BaseBoardInformation(board) => {
                facts.board_location = meaningful(board.location_in_chassis().to_utf8_lossy());
            }
            _ => continue,
        }
    }

    debug!(?facts, "read SMBIOS identity");
    facts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blade_dmi() -> DmiFacts {
        DmiFacts {
            product_name: Some("PowerEdge M640".to_string()),
            service_tag: Some("BLD0001".to_string()),
            chassis_serial: Some("CHS0001".to_string()),
            chassis_version: Some("PowerEdge M1000e".to_string()),
            chassis_is_blade: true,
            board_location: Some("Slot 04".to_string()),
        }
    }

    #[test]
    fn test_blade_identity_from_dmi() {
        let identity =
            PlatformIdentity::from_facts(blade_dmi(), "blade01".to_string(), None, &AgentConfig::default())
                .unwrap();
        assert_eq!(identity.service_tag, "BLD0001");
        assert_eq!(
            identity.topology,
            Topology::Blade {
                slot: "4".to_string(),
                chassis_serial: "CHS0001".to_string(),
                chassis_model: "PowerEdge M1000e".to_string(),
            }
        );
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AgentConfig::default();
        config.overrides.blade = Some(false);
        let identity =
            PlatformIdentity::from_facts(blade_dmi(), "srv01".to_string(), None, &config).unwrap();
        assert_eq!(identity.topology, Topology::Standalone);

        config.overrides.blade = None;
        config.overrides.blade_slot = Some("12".to_string());
        config.overrides.chassis_serial = Some("CHS0002".to_string());
        let identity =
            PlatformIdentity::from_facts(blade_dmi(), "srv01".to_string(), None, &config).unwrap();
        assert_eq!(
            identity.topology,
            Topology::Blade {
                slot: "12".to_string(),
                chassis_serial: "CHS0002".to_string(),
                chassis_model: "PowerEdge M1000e".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_service_tag_is_fatal() {
        let dmi = DmiFacts {
            service_tag: None,
            ..blade_dmi()
        };
        let err = PlatformIdentity::from_facts(dmi, "h".to_string(), None, &AgentConfig::default())
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingIdentity("system serial number")));
    }

    #[test]
    fn test_blade_slot_from_location() {
        assert_eq!(blade_slot_from_location("Slot 04"), "4");
        assert_eq!(blade_slot_from_location("Bay 10"), "10");
        assert_eq!(blade_slot_from_location("Slot 00"), "0");
        assert_eq!(blade_slot_from_location("Top"), "Top");
    }

    #[test]
    fn test_verify_serial() {
        assert!(verify_serial("ABC1234"));
        assert!(!verify_serial("ABCDEFG"));
        assert!(!verify_serial("ABC-1234"));
        assert!(!verify_serial("ABCDEFGHIJ123"));
        assert!(!verify_serial(""));
    }
}
