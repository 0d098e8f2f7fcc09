//! State version module

mod api;
mod models;

pub use models::{
    StateVersion, StateVersionAttributes, StateVersionCreateOptions, StateVersionListOptions,
    StateVersionRelationships,
};
