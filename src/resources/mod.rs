//! Resource modules built on the request pipeline
//!
//! Each module declares its wire types in `models` and its operations as
//! `TfeClient` methods in `api`. Operations validate caller-supplied
//! identifiers and hand everything else to the pipeline.

pub mod configuration_versions;
pub mod organizations;
pub mod plans;
pub mod projects;
pub mod registry_modules;
pub mod runs;
pub mod state_versions;
mod traits;
pub mod workspaces;

pub use configuration_versions::{
    ConfigurationVersion, ConfigurationVersionAttributes, ConfigurationVersionCreateOptions,
};
pub use organizations::{
    Organization, OrganizationAttributes, OrganizationCreateOptions, OrganizationUpdateOptions,
};
pub use plans::{Plan, PlanAttributes};
pub use projects::{
    Project, ProjectAttributes, ProjectCreateOptions, ProjectListOptions, ProjectUpdateOptions,
};
pub use registry_modules::{
    RegistryModule, RegistryModuleAttributes, RegistryModuleCreateOptions, RegistryModuleId,
    RegistryModuleVersion, RegistryModuleVersionCreateOptions,
};
pub use runs::{Run, RunAttributes, RunCreateOptions, RunInclude, RunListOptions};
pub use state_versions::{
    StateVersion, StateVersionAttributes, StateVersionCreateOptions, StateVersionListOptions,
};
pub use traits::TfeResource;
pub use workspaces::{
    Workspace, WorkspaceAttributes, WorkspaceCreateOptions, WorkspaceInclude,
    WorkspaceListOptions, WorkspaceUpdateOptions,
};
