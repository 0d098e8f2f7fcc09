//! Private registry module management

mod api;
mod models;

pub use models::{
    RegistryModule, RegistryModuleAttributes, RegistryModuleCreateOptions, RegistryModuleId,
    RegistryModuleVersion, RegistryModuleVersionAttributes, RegistryModuleVersionCreateOptions,
    RegistryName, VersionStatus,
};
