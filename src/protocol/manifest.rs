//! Agent manifest: static descriptive metadata for one agent identity

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Agent manifest as served by `GET {agent_id}/manifest`
///
/// Immutable once fetched; a fresh fetch replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawManifest")]
pub struct Manifest {
    /// Agent identity, when the manifest states it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    /// Display name of the agent
    pub name: String,

    /// Human-readable description
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// JSON schema of the run input
    pub input_schema: Value,

    /// JSON schema of the final result
    pub output_schema: Value,

    /// JSON schema of stream frames
    pub reasoning_schema: Value,

    pub pricing: Pricing,

    pub capabilities: Capabilities,

    /// Every other field the manifest carries, preserved verbatim
    pub metadata: Map<String, Value>,
}

/// Pricing information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default = "default_unit")]
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_run: Option<f64>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            unit: default_unit(),
            per_run: None,
        }
    }
}

fn default_unit() -> String {
    "credits".to_string()
}

/// Operations the agent supports
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub run: bool,

    #[serde(default)]
    pub status: bool,

    #[serde(default)]
    pub results: bool,

    #[serde(default)]
    pub streaming: bool,
}

impl Capabilities {
    /// Capabilities of an agent supporting every operation
    pub fn all() -> Self {
        Self {
            run: true,
            status: true,
            results: true,
            streaming: true,
        }
    }
}

impl Manifest {
    /// Create a manifest with empty schemas
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            agent_id: None,
            name: name.into(),
            description: description.into(),
            version: None,
            input_schema: Value::Object(Map::new()),
            output_schema: Value::Object(Map::new()),
            reasoning_schema: Value::Object(Map::new()),
            pricing: Pricing::default(),
            capabilities: Capabilities::default(),
            metadata: Map::new(),
        }
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }
}

/// Capabilities as they appear on the wire: an object, or a list of names
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCapabilities {
    Flags(Capabilities),
    Names(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    agent_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    input_schema: Option<Value>,
    #[serde(default)]
    output_schema: Option<Value>,
    #[serde(default, alias = "stream_event_schema")]
    reasoning_schema: Option<Value>,
    #[serde(default)]
    pricing: Option<Pricing>,
    #[serde(default)]
    capabilities: Option<RawCapabilities>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl From<RawManifest> for Manifest {
    fn from(raw: RawManifest) -> Self {
        let protocol_streaming = raw
            .rest
            .get("protocol")
            .and_then(|p| p.get("streaming"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut capabilities = match raw.capabilities {
            Some(RawCapabilities::Flags(flags)) => flags,
            Some(RawCapabilities::Names(names)) => Capabilities {
                run: names.iter().any(|n| n == "run"),
                status: names.iter().any(|n| n == "status"),
                results: names.iter().any(|n| n == "results"),
                streaming: names.iter().any(|n| n == "streaming"),
            },
            None => Capabilities::default(),
        };
        capabilities.streaming |= protocol_streaming;

        let mut metadata = raw.metadata.unwrap_or_default();
        metadata.extend(raw.rest);

        let empty = || Value::Object(Map::new());

        Manifest {
            name: raw
                .name
                .or_else(|| raw.agent_id.clone())
                .unwrap_or_default(),
            agent_id: raw.agent_id,
            description: raw.description.unwrap_or_default(),
            version: raw.version,
            input_schema: raw.input_schema.unwrap_or_else(empty),
            output_schema: raw.output_schema.unwrap_or_else(empty),
            reasoning_schema: raw.reasoning_schema.unwrap_or_else(empty),
            pricing: raw.pricing.unwrap_or_default(),
            capabilities,
            metadata,
        }
    }
}
