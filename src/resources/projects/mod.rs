//! Project module

mod api;
mod models;

pub use models::{
    Project, ProjectAttributes, ProjectCreateOptions, ProjectListOptions, ProjectRelationships,
    ProjectUpdateOptions,
};
