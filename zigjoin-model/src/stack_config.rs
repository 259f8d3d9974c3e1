use std::collections::BTreeMap;

/// Stack configuration values written to the coordinator before scanning,
/// keyed by config id name (for example `CONFIG_STACK_PROFILE`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StackConfig(pub BTreeMap<String, u16>);

impl StackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, value: u16) -> Self {
        self.0.insert(id.into(), value);
        self
    }

    pub fn get(&self, id: &str) -> Option<u16> {
        self.0.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.0.iter().map(|(id, value)| (id.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
