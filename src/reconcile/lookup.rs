use serde_json::json;
use tracing::info;

use crate::error::{AgentError, Result};
use crate::netbox::{Collection, DcimApi, Query, Record};

/// Roles are managed by operators; a missing one is a setup error.
pub fn device_role<C: DcimApi>(client: &C, name: &str) -> Result<Record> {
    client
        .get(Collection::DeviceRoles, &Query::new().with("name", name))?
        .ok_or_else(|| AgentError::MissingDeviceRole(name.to_string()))
}

/// Device types are never created by the agent.
pub fn device_type<C: DcimApi>(client: &C, model: &str) -> Result<Record> {
    client
        .get(Collection::DeviceTypes, &Query::new().with("model", model))?
        .ok_or_else(|| AgentError::MissingDeviceType(model.to_string()))
}

pub fn site<C: DcimApi>(client: &C, slug: Option<&str>) -> Result<Option<Record>> {
    match slug {
        Some(slug) => client.get(Collection::Sites, &Query::new().with("slug", slug)),
        None => Ok(None),
    }
}

pub fn platform<C: DcimApi>(client: &C, name: &str) -> Result<Record> {
    if let Some(platform) = client.get(Collection::Platforms, &Query::new().with("name", name))? {
        return Ok(platform);
    }
    info!("creating platform {:?}", name);
    client.create(
        Collection::Platforms,
        json!({"name": name, "slug": slugify(name)}),
    )
}

pub fn tags<C: DcimApi>(client: &C, names: &[String]) -> Result<Vec<Record>> {
    names
        .iter()
        .map(|name| {
            match client.get(Collection::Tags, &Query::new().with("name", name))? {
                Some(tag) => Ok(tag),
                None => {
                    info!("creating tag {:?}", name);
                    client.create(Collection::Tags, json!({"name": name, "slug": slugify(name)}))
                }
            }
        })
        .collect()
}

pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
