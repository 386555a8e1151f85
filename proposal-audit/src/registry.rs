use alloy_json_abi::JsonAbi;

/// Error type for interface registration
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Invalid JSON in an interface source
    #[error("invalid interface JSON for {name}: {reason}")]
    InvalidJson { name: String, reason: String },
}

/// Ordered collection of named contract interfaces.
///
/// Iteration order is load order, and load order is the decoder's tie-break
/// policy: when two interfaces share a selector, the one registered first
/// wins. Registering a name twice replaces the parsed interface in place so
/// the trial order stays reproducible.
#[derive(Debug, Clone, Default)]
pub struct InterfaceRegistry {
    interfaces: Vec<(String, JsonAbi)>,
}

impl InterfaceRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            interfaces: Vec::new(),
        }
    }

    /// Parses a collection of `(name, abi-json)` sources into a registry,
    /// preserving source order.
    pub fn load<I, N, S>(sources: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: AsRef<str>,
    {
        let mut registry = Self::new();
        for (name, abi_json) in sources {
            registry.register(name, abi_json.as_ref())?;
        }
        Ok(registry)
    }

    /// Registers one interface under a logical contract name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        abi_json: &str,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let abi: JsonAbi =
            serde_json::from_str(abi_json).map_err(|e| RegistryError::InvalidJson {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        if let Some(entry) = self.interfaces.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = abi;
        } else {
            self.interfaces.push((name, abi));
        }
        Ok(())
    }

    /// Yields `(name, interface)` pairs in load order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonAbi)> {
        self.interfaces.iter().map(|(n, abi)| (n.as_str(), abi))
    }

    /// Looks up one interface by its registered name
    pub fn get(&self, name: &str) -> Option<&JsonAbi> {
        self.interfaces
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, abi)| abi)
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}
