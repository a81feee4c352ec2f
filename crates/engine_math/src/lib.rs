//! # engine_math
//!
//! Math types for the ECS engine. Re-exports [`glam`] for linear algebra and
//! ships the [`TransformModule`], which declares the spatial components most
//! entities carry.

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

pub use transform::{LOCATION, ROTATION, SCALE, Transform3D, TransformModule};
