//! Pointer input helpers

pub mod pointer;

pub use pointer::PointerState;
