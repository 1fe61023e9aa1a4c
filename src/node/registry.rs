//! Driver registry: maps vendor and device-type strings to driver factories.

use std::collections::HashMap;
use tracing::debug;

use super::driver::NodeDriver;
use super::drivers::JuniperDriverFactory;
use super::types::{ConnectionParams, DriverError, DriverResult};

/// Factory for constructing driver instances.
///
/// A factory declares which vendor and device-type strings it serves;
/// registration indexes it under all of them.
pub trait DriverFactory: Send + Sync {
    /// Canonical driver name (e.g. "juniper")
    fn name(&self) -> &str;

    /// Vendor strings this driver serves
    fn supported_vendors(&self) -> Vec<&str>;

    /// Containerlab kind / device-type strings this driver serves
    fn supported_device_types(&self) -> Vec<&str>;

    /// Construct a driver instance bound to one device
    fn create(&self, params: ConnectionParams) -> DriverResult<Box<dyn NodeDriver>>;
}

/// Registry of driver factories with case-insensitive vendor and
/// device-type lookup.
///
/// Owned by the caller and injected into the execution engines; there is
/// no process-global registry.
#[derive(Default)]
pub struct DriverRegistry {
    factories: HashMap<String, Box<dyn DriverFactory>>,
    vendor_map: HashMap<String, String>,
    device_type_map: HashMap<String, String>,
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with all builtin drivers registered
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JuniperDriverFactory));
        registry
    }

    /// Register a factory under its own name
    pub fn register(&mut self, factory: Box<dyn DriverFactory>) {
        let name = factory.name().to_lowercase();
        self.register_as(factory, &name);
    }

    /// Register a factory under an explicit name.
    ///
    /// A later registration for the same vendor or device type shadows the
    /// earlier one; tests and downstream users rely on this to override a
    /// builtin driver.
    pub fn register_as(&mut self, factory: Box<dyn DriverFactory>, name: &str) {
        let name = name.to_lowercase();

        for vendor in factory.supported_vendors() {
            let vendor = vendor.to_lowercase();
            if let Some(previous) = self.vendor_map.insert(vendor.clone(), name.clone()) {
                if previous != name {
                    debug!(vendor = %vendor, old = %previous, new = %name, "Vendor mapping replaced");
                }
            }
        }

        for device_type in factory.supported_device_types() {
            let device_type = device_type.to_lowercase();
            if let Some(previous) = self.device_type_map.insert(device_type.clone(), name.clone())
            {
                if previous != name {
                    debug!(device_type = %device_type, old = %previous, new = %name, "Device type mapping replaced");
                }
            }
        }

        debug!(driver = %name, "Registered driver");
        self.factories.insert(name, factory);
    }

    /// Resolve a driver for the given connection parameters and construct it.
    ///
    /// Vendor takes precedence over device type when both are present and
    /// resolve to different drivers.
    pub fn resolve_and_construct(
        &self,
        params: ConnectionParams,
    ) -> DriverResult<Box<dyn NodeDriver>> {
        let factory = self.resolve(params.vendor.as_deref(), params.device_type.as_deref())?;
        factory.create(params)
    }

    /// Resolve a factory by vendor first, then device type
    fn resolve(
        &self,
        vendor: Option<&str>,
        device_type: Option<&str>,
    ) -> DriverResult<&dyn DriverFactory> {
        if let Some(vendor) = vendor {
            if let Some(name) = self.vendor_map.get(&vendor.to_lowercase()) {
                if let Some(factory) = self.factories.get(name) {
                    return Ok(factory.as_ref());
                }
            }
        }

        if let Some(device_type) = device_type {
            if let Some(name) = self.device_type_map.get(&device_type.to_lowercase()) {
                if let Some(factory) = self.factories.get(name) {
                    return Ok(factory.as_ref());
                }
            }
        }

        Err(DriverError::NoDriverFound {
            vendor: vendor.unwrap_or("-").to_string(),
            device_type: device_type.unwrap_or("-").to_string(),
        })
    }

    /// Names of all registered drivers, sorted
    pub fn driver_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// All vendor strings with a registered driver, sorted
    pub fn vendors(&self) -> Vec<String> {
        let mut vendors: Vec<String> = self.vendor_map.keys().cloned().collect();
        vendors.sort();
        vendors
    }

    /// All device-type strings with a registered driver, sorted
    pub fn device_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.device_type_map.keys().cloned().collect();
        types.sort();
        types
    }

    /// Remove all registrations
    pub fn clear(&mut self) {
        self.factories.clear();
        self.vendor_map.clear();
        self.device_type_map.clear();
    }
}
