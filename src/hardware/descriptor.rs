use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};

/// Class tag of an lshw node. Tags the walker never dispatches on collapse
/// into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeClass {
    System,
    Bus,
    Power,
    Storage,
    Memory,
    Processor,
    Bridge,
    Display,
    Network,
    Generic,
    Disk,
    Volume,
    Communication,
    Input,
    Multimedia,
    #[default]
    #[serde(other)]
    Other,
}

/// lshw emits `logicalname` as a string, or as a list on newer versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Names::One(name) => std::slice::from_ref(name),
            Names::Many(names) => names,
        }
    }
}

impl From<&str> for Names {
    fn from(name: &str) -> Self {
        Names::One(name.to_string())
    }
}

/// One node of the lshw hardware tree.
///
/// Only the attributes the extractors read are typed; everything else lshw
/// reports is kept in `extra` so a node can be passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorNode {
    #[serde(default)]
    pub class: NodeClass,
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DescriptorNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logicalname: Option<Names>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DescriptorNode {
    #[cfg(test)]
    pub fn new(class: NodeClass, id: &str) -> Self {
        DescriptorNode {
            class,
            id: id.to_string(),
            children: None,
            serial: None,
            product: None,
            vendor: None,
            description: None,
            logicalname: None,
            size: None,
            slot: None,
            version: None,
            extra: Map::new(),
        }
    }

    /// Children in report order; empty when the node has none.
    pub fn children(&self) -> &[DescriptorNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}

/// Parse raw `lshw -json` output.
///
/// Starting with lshw 02.18 the report is wrapped in a one-element list; both
/// shapes are accepted.
pub fn parse_descriptor(raw: &[u8]) -> Result<DescriptorNode> {
    let value: Value =
        serde_json::from_slice(raw).map_err(|e| AgentError::DescriptorParse(e.to_string()))?;

    let root = match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::DescriptorParse("empty report list".to_string()))?,
        other => other,
    };

    serde_json::from_value(root).map_err(|e| AgentError::DescriptorParse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "id": "host",
        "class": "system",
        "vendor": "Dell Inc.",
        "product": "PowerEdge R640",
        "serial": "ABC1234",
        "configuration": {"boot": "normal"},
        "children": [
            {"id": "core", "class": "bus", "product": "0X45NX", "serial": "MB001"}
        ]
    }"#;

    #[test]
    fn test_parse_bare_object() {
        let root = parse_descriptor(REPORT.as_bytes()).unwrap();
        assert_eq!(root.class, NodeClass::System);
        assert_eq!(root.vendor.as_deref(), Some("Dell Inc."));
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].class, NodeClass::Bus);
        assert!(root.extra.contains_key("configuration"));
    }

    #[test]
    fn test_parse_list_wrapped_object() {
        let wrapped = format!("[{}]", REPORT);
        let wrapped_root = parse_descriptor(wrapped.as_bytes()).unwrap();
        let bare_root = parse_descriptor(REPORT.as_bytes()).unwrap();
        assert_eq!(wrapped_root, bare_root);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_descriptor(b"{\"id\": \"host\",").unwrap_err();
        assert!(matches!(err, AgentError::DescriptorParse(_)));

        let err = parse_descriptor(b"[]").unwrap_err();
        assert!(matches!(err, AgentError::DescriptorParse(_)));
    }

    #[test]
    fn test_unknown_class_maps_to_other() {
        let node: DescriptorNode =
            serde_json::from_str(r#"{"id": "tape", "class": "tape"}"#).unwrap();
        assert_eq!(node.class, NodeClass::Other);
        assert!(!node.has_children());
    }

    #[test]
    fn test_logicalname_scalar_or_list() {
        let one: DescriptorNode =
            serde_json::from_str(r#"{"id": "n", "class": "network", "logicalname": "eno1"}"#)
                .unwrap();
        let many: DescriptorNode = serde_json::from_str(
            r#"{"id": "n", "class": "network", "logicalname": ["eno1", "eno1d1"]}"#,
        )
        .unwrap();
        assert_eq!(one.logicalname.unwrap().as_slice(), ["eno1".to_string()]);
        assert_eq!(many.logicalname.unwrap().as_slice().len(), 2);
    }
}
