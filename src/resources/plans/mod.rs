//! Plan module

mod api;
mod models;

pub use models::{Plan, PlanAttributes};
