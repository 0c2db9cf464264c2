//! The OpenGL backend, built on the `gl` crate. Works with desktop GL 2.0+
//! and OpenGL ES 2.0+ contexts.

pub mod capabilities;
pub mod types;
pub mod visitor;
