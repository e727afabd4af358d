//! Plugin wiring: dependency declaration and registry installation.

use tracing::info;

use crate::arch::ArchitectureRegistry;
use crate::decode::Disassembler;
use crate::error::{Error, Result};
use crate::extension::Aarch64Extension;

/// Name of the base architecture the extension wraps.
pub const BASE_ARCHITECTURE: &str = "aarch64";

/// Plugins that must be loaded before this one.
#[must_use]
pub const fn plugin_dependencies() -> &'static [&'static str] {
    &["arch_arm64"]
}

/// Install the extension over the registered base architecture.
///
/// The decoder engine is checked first; when it cannot be created the
/// plugin refuses to activate and the registry is left untouched.
///
/// # Errors
///
/// Returns [`Error::EngineInit`] when the decoder engine cannot be created
/// and [`Error::MissingArchitecture`] when no base architecture is
/// registered under [`BASE_ARCHITECTURE`].
pub fn plugin_init(registry: &mut ArchitectureRegistry) -> Result<()> {
    Disassembler::check()?;
    let base = registry
        .take(BASE_ARCHITECTURE)
        .ok_or(Error::MissingArchitecture(BASE_ARCHITECTURE))?;
    registry.register(Box::new(Aarch64Extension::new(base)));
    info!("registered AArch64 extensions plugin");
    Ok(())
}
