//! Run module

mod api;
mod models;

pub use models::{
    Run, RunActions, RunAttributes, RunCreateOptions, RunInclude, RunListOptions,
    RunRelationships, RunStatus,
};
