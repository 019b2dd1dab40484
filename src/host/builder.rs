//! Fluent builder for Host construction.

use crate::host::Host;

const DEFAULT_NAME: &str = "host";
const DEFAULT_CAPACITY: usize = 16;

/// Builder for constructing [`Host`] instances with fluent API.
///
/// # Example
/// ```
/// use cohost::HostBuilder;
///
/// let host = HostBuilder::new().name("menu").capacity(4).build();
/// assert_eq!(host.name(), "menu");
/// ```
pub struct HostBuilder {
    name: String,
    capacity: usize,
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HostBuilder {
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }

    /// Name attached to every log record of the host.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of waiter slots to allocate up front.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a host with an empty registry.
    pub fn build(self) -> Host {
        Host::with_config(self.name, self.capacity)
    }
}
