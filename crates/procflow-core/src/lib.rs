//! procflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the procflow layout
//! solver and its callers. It includes:
//!
//! - **Geometry**: Points, sizes, directional extents and bounds ([`geometry`] module)
//! - **Positioned**: The trait through which caller objects expose and receive
//!   their gravity point ([`positioned::Positioned`])
//! - **Node kinds**: The catalogue of process node shapes and their sizes
//!   ([`kind::NodeKind`])

pub mod geometry;
pub mod kind;
pub mod positioned;
