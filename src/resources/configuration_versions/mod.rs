//! Configuration version module

mod api;
mod models;

pub use models::{
    ConfigurationVersion, ConfigurationVersionAttributes, ConfigurationVersionCreateOptions,
    ConfigurationVersionRelationships,
};
