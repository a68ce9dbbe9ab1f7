//! Linux fact catalogue.

use super::disks::DisksFact;
use crate::error::FacterError;
use crate::fs::FileSystem;
use crate::probe::FieldFact;
use crate::registry::FactRegistry;
use crate::resolvers::disks::Disks;
use crate::resolvers::dmi::Dmi;
use crate::resolvers::hostname::Hostname;
use crate::resolvers::kernel::Kernel;
use crate::resolvers::memory::Memory;
use crate::resolvers::os_release::OsRelease;
use crate::resolvers::processors::Processors;
use crate::resolvers::uptime::Uptime;
use crate::resolvers::virtualization::Virtualization;
use crate::resolvers::{Memoized, Resolver};
use std::sync::Arc;

/// Registers every Linux fact. Resolvers are created here, so each call
/// yields a registry with fresh memo state.
pub fn register<F: FileSystem + 'static>(
    registry: &mut FactRegistry,
    fs: &Arc<F>,
) -> Result<(), FacterError> {
    let os: Arc<dyn Resolver> = Memoized::shared(OsRelease::new(Arc::clone(fs)));
    FieldFact::new("os.name", &os, "name")
        .alias("operatingsystem")
        .register(registry)?;
    FieldFact::new("os.family", &os, "family")
        .alias("osfamily")
        .register(registry)?;
    FieldFact::new("os.release", &os, "release")
        .alias_from("operatingsystemrelease", "release.full")
        .alias_from("operatingsystemmajrelease", "release.major")
        .register(registry)?;
    FieldFact::new("os.distro.id", &os, "distro_id")
        .alias("lsbdistid")
        .register(registry)?;
    FieldFact::new("os.distro.codename", &os, "codename")
        .alias("lsbdistcodename")
        .register(registry)?;
    FieldFact::new("os.distro.description", &os, "description")
        .alias("lsbdistdescription")
        .register(registry)?;

    let kernel: Arc<dyn Resolver> = Memoized::shared(Kernel::new(Arc::clone(fs)));
    FieldFact::new("kernelrelease", &kernel, "release").register(registry)?;
    FieldFact::new("kernelversion", &kernel, "version").register(registry)?;
    FieldFact::new("kernelmajversion", &kernel, "major_version").register(registry)?;

    let net: Arc<dyn Resolver> = Memoized::shared(Hostname::new(Arc::clone(fs)));
    FieldFact::new("networking.hostname", &net, "hostname")
        .alias("hostname")
        .register(registry)?;
    FieldFact::new("networking.domain", &net, "domain")
        .alias("domain")
        .register(registry)?;
    FieldFact::new("networking.fqdn", &net, "fqdn")
        .alias("fqdn")
        .register(registry)?;

    let memory: Arc<dyn Resolver> = Memoized::shared(Memory::new(Arc::clone(fs)));
    register_memory(registry, &memory)?;

    let cpu: Arc<dyn Resolver> = Memoized::shared(Processors::new(Arc::clone(fs)));
    FieldFact::new("processors.count", &cpu, "count")
        .alias("processorcount")
        .register(registry)?;
    FieldFact::new("processors.physicalcount", &cpu, "physical_count")
        .alias("physicalprocessorcount")
        .register(registry)?;
    FieldFact::new("processors.models", &cpu, "models").register(registry)?;

    let disks: Arc<dyn Resolver> = Memoized::shared(Disks::new(Arc::clone(fs)));
    DisksFact::new(&disks).register(registry)?;

    let uptime: Arc<dyn Resolver> = Memoized::shared(Uptime::new(Arc::clone(fs)));
    FieldFact::new("system_uptime.seconds", &uptime, "seconds")
        .alias("uptime_seconds")
        .register(registry)?;
    FieldFact::new("system_uptime.hours", &uptime, "hours")
        .alias("uptime_hours")
        .register(registry)?;
    FieldFact::new("system_uptime.days", &uptime, "days")
        .alias("uptime_days")
        .register(registry)?;
    FieldFact::new("system_uptime.uptime", &uptime, "uptime")
        .alias("uptime")
        .register(registry)?;

    let dmi: Arc<dyn Resolver> = Memoized::shared(Dmi::new(Arc::clone(fs)));
    FieldFact::new("dmi.manufacturer", &dmi, "manufacturer")
        .alias("manufacturer")
        .register(registry)?;
    FieldFact::new("dmi.product.name", &dmi, "product_name")
        .alias("productname")
        .register(registry)?;
    FieldFact::new("dmi.product.serial_number", &dmi, "serial_number")
        .alias("serialnumber")
        .register(registry)?;
    FieldFact::new("dmi.product.uuid", &dmi, "uuid")
        .alias("uuid")
        .register(registry)?;
    FieldFact::new("dmi.bios.vendor", &dmi, "bios_vendor")
        .alias("bios_vendor")
        .register(registry)?;
    FieldFact::new("dmi.bios.version", &dmi, "bios_version")
        .alias("bios_version")
        .register(registry)?;

    let virt: Arc<dyn Resolver> =
        Memoized::shared(Virtualization::new(Arc::clone(fs), Arc::clone(&dmi)));
    FieldFact::new("virtual", &virt, "virtual").register(registry)?;
    FieldFact::new("is_virtual", &virt, "is_virtual").register(registry)?;

    Ok(())
}

fn register_memory(
    registry: &mut FactRegistry,
    memory: &Arc<dyn Resolver>,
) -> Result<(), FacterError> {
    FieldFact::new("memory.system.total", memory, "system.total")
        .alias("memorysize")
        .alias_from("memorysize_mb", "system.total_mb")
        .register(registry)?;
    FieldFact::new("memory.system.total_bytes", memory, "system.total_bytes").register(registry)?;
    FieldFact::new("memory.system.available", memory, "system.available")
        .alias("memoryfree")
        .alias_from("memoryfree_mb", "system.available_mb")
        .register(registry)?;
    FieldFact::new("memory.system.available_bytes", memory, "system.available_bytes")
        .register(registry)?;
    FieldFact::new("memory.system.used", memory, "system.used").register(registry)?;
    FieldFact::new("memory.system.used_bytes", memory, "system.used_bytes").register(registry)?;
    FieldFact::new("memory.system.capacity", memory, "system.capacity").register(registry)?;

    FieldFact::new("memory.swap.total", memory, "swap.total")
        .alias("swapsize")
        .alias_from("swapsize_mb", "swap.total_mb")
        .register(registry)?;
    FieldFact::new("memory.swap.total_bytes", memory, "swap.total_bytes").register(registry)?;
    FieldFact::new("memory.swap.available", memory, "swap.available")
        .alias("swapfree")
        .alias_from("swapfree_mb", "swap.available_mb")
        .register(registry)?;
    FieldFact::new("memory.swap.available_bytes", memory, "swap.available_bytes")
        .register(registry)?;
    FieldFact::new("memory.swap.used", memory, "swap.used").register(registry)?;
    FieldFact::new("memory.swap.used_bytes", memory, "swap.used_bytes").register(registry)?;
    FieldFact::new("memory.swap.capacity", memory, "swap.capacity").register(registry)?;
    Ok(())
}
