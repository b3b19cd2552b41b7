use thiserror::Error;

/// Errors that abort a run. Anything already committed to NetBox stays committed.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("{0} does not seem to be installed")]
    ToolMissing(String),

    #[error("`{program}` exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("failed to parse lshw output: {0}")]
    DescriptorParse(String),

    #[error("lshw output is missing required field `{0}`")]
    DescriptorShape(&'static str),

    #[error("unable to determine the {0} of this host")]
    MissingIdentity(&'static str),

    #[error("DeviceRole \"{0}\" does not exist, please create it")]
    MissingDeviceRole(String),

    #[error("DeviceType \"{0}\" does not exist, please create it")]
    MissingDeviceType(String),

    #[error("the server (serial: {0}) isn't registered in NetBox yet, register it before updating it")]
    NotRegistered(String),

    #[error("expected a single {collection} record matching {query}, got {count}")]
    MultipleResults {
        collection: &'static str,
        query: String,
        count: usize,
    },

    #[error("NetBox API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of the secondary storage tool. Callers log it and keep the
/// disks found by the primary tree walk.
#[derive(Error, Debug)]
pub enum DegradedCapabilityError {
    #[error("{0} >= 1.0 does not seem to be installed")]
    ToolMissing(String),

    #[error("failed to run {program}: {reason}")]
    Invocation { program: String, reason: String },

    #[error("failed to parse nvme output: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_registered_message_names_serial() {
        let error = AgentError::NotRegistered("ABC1234".to_string());
        assert!(error.to_string().contains("ABC1234"));
    }

    #[test]
    fn test_missing_device_type_message() {
        let error = AgentError::MissingDeviceType("PowerEdge M1000e".to_string());
        assert_eq!(
            error.to_string(),
            "DeviceType \"PowerEdge M1000e\" does not exist, please create it"
        );
    }

    #[test]
    fn test_degraded_tool_missing_message() {
        let error = DegradedCapabilityError::ToolMissing("nvme-cli".to_string());
        assert_eq!(error.to_string(), "nvme-cli >= 1.0 does not seem to be installed");
    }
}
