use serde::{Deserialize, Deserializer, Serialize};

/// Decoded module metadata (the subset of a `*.podspec.json` importfix cares about).
///
/// Unknown fields are ignored so full podspec documents can be read as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,

    /// Compiled module name, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,

    /// Declared source-path patterns. Documents may carry a single string or a list.
    #[serde(deserialize_with = "one_or_many")]
    pub source_files: Vec<String>,
}

impl ModuleDescriptor {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// The identifier other modules use to import this one.
    pub fn canonical_name(&self) -> &str {
        self.module_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
