//! The `transform` module: position, rotation and scale as three separate
//! components.
//!
//! Splitting the transform lets systems query only what they touch (a
//! mover needs `location`, a renderer needs all three). [`Transform3D`]
//! bundles the parts back together for spawning and for building model
//! matrices.

use engine_ecs::{ComponentSchema, Entity, EntityStore, Module, StoreError};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Component name for world-space position ([`Vec3`]).
pub const LOCATION: &str = "location";
/// Component name for orientation ([`Quat`]).
pub const ROTATION: &str = "rotation";
/// Component name for per-axis scale ([`Vec3`]).
pub const SCALE: &str = "scale";

/// Declares the [`LOCATION`], [`ROTATION`] and [`SCALE`] components.
pub struct TransformModule;

impl Module for TransformModule {
    const NAME: &'static str = "transform";
    type State = ();

    fn components(schema: &mut ComponentSchema) {
        schema
            .field::<Vec3>(LOCATION)
            .field::<Quat>(ROTATION)
            .field::<Vec3>(SCALE);
    }
}

/// Position, rotation and scale in 3D space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Compute the 4×4 model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Write all three components onto `entity`.
    ///
    /// # Errors
    ///
    /// Fails if `entity` is not alive or the store was not composed with
    /// [`TransformModule`].
    pub fn insert(&self, store: &mut EntityStore, entity: Entity) -> Result<(), StoreError> {
        store.set_component(entity, LOCATION, self.position)?;
        store.set_component(entity, ROTATION, self.rotation)?;
        store.set_component(entity, SCALE, self.scale)?;
        Ok(())
    }

    /// Read the transform of `entity`.
    ///
    /// Returns `None` if the entity has no location. Missing rotation or
    /// scale fall back to the identity values.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Transform3D::insert`].
    pub fn read(store: &EntityStore, entity: Entity) -> Result<Option<Self>, StoreError> {
        let Some(&position) = store.get_component::<Vec3>(entity, LOCATION)? else {
            return Ok(None);
        };
        let rotation = store
            .get_component::<Quat>(entity, ROTATION)?
            .copied()
            .unwrap_or(Quat::IDENTITY);
        let scale = store
            .get_component::<Vec3>(entity, SCALE)?
            .copied()
            .unwrap_or(Vec3::ONE);
        Ok(Some(Self {
            position,
            rotation,
            scale,
        }))
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}
