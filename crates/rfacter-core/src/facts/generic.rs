//! Facts every platform offers.

use crate::error::FacterError;
use crate::platform::Platform;
use crate::probe::FieldFact;
use crate::registry::FactRegistry;
use crate::resolvers::Resolver;
use std::sync::Arc;

pub fn register(
    registry: &mut FactRegistry,
    host: &Arc<dyn Resolver>,
    platform: &Platform,
) -> Result<(), FacterError> {
    FieldFact::new("kernel", host, "kernel").register(registry)?;
    FieldFact::new("os.architecture", host, "architecture")
        .alias("architecture")
        .register(registry)?;
    FieldFact::new("os.hardware", host, "hardware")
        .alias("hardwaremodel")
        .register(registry)?;
    FieldFact::new("path", host, "path").register(registry)?;
    FieldFact::new("timezone", host, "timezone").register(registry)?;
    FieldFact::new("facterversion", host, "version").register(registry)?;

    // Linux reads processors from /proc/cpuinfo instead.
    if *platform != Platform::Linux {
        FieldFact::new("processors.count", host, "processor_count")
            .alias("processorcount")
            .register(registry)?;
    }
    Ok(())
}
