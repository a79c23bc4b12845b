//! Geometric primitives used by hit testing

pub mod primitives;

pub use primitives::{Ray, BoundingSphere};
