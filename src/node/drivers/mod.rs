//! Concrete driver implementations.

pub mod juniper;

pub use juniper::{JuniperDriver, JuniperDriverFactory};
