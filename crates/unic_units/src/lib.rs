#![doc = include_str!("../README.md")]

pub mod scope;
pub mod unit;

pub use scope::ScopeKind;
pub use unit::{FalsyValue, LoopKind, Unit};
