//! Workspace module

mod api;
mod models;

pub use models::{
    Workspace, WorkspaceAttributes, WorkspaceCreateOptions, WorkspaceInclude,
    WorkspaceListOptions, WorkspaceRelationships, WorkspaceUpdateOptions,
};
