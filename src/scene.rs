//! Named scene objects the turn engine reads and writes.
//!
//! The engine never owns geometry. It resolves objects by name once the scene
//! has loaded and then reads and writes single position and rotation
//! components through the [`Scene`] trait. [`SceneGraph`] is a simple
//! in-memory implementation.

use std::collections::HashMap;

use nalgebra::Vector3;
use strum::IntoEnumIterator;

use crate::config::SceneConfig;
use crate::cube::{Axis, Face, Piece};

/// Handle to an object owned by a [`Scene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Constructs a handle from a raw index.
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw index of this handle.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Access to the objects of a 3D scene.
///
/// Reading a component of an object the scene does not know returns `0.0`;
/// writing one does nothing.
pub trait Scene {
    /// Returns the object named `name`, or `None` if the scene has not
    /// finished loading or has no such object.
    fn resolve(&self, name: &str) -> Option<ObjectId>;

    /// Position of an object along `axis`, in scene units.
    fn position(&self, id: ObjectId, axis: Axis) -> f32;
    /// Rotation of an object about `axis`, in radians.
    fn rotation(&self, id: ObjectId, axis: Axis) -> f32;

    /// Sets the position of an object along `axis`.
    fn set_position(&mut self, id: ObjectId, axis: Axis, value: f32);
    /// Sets the rotation of an object about `axis`.
    fn set_rotation(&mut self, id: ObjectId, axis: Axis, value: f32);
}

/// Object stored in a [`SceneGraph`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Unique name of the object
    pub name: String,
    /// Position in scene units
    pub position: Vector3<f32>,
    /// Euler rotation in radians
    pub rotation: Vector3<f32>,
}

/// In-memory scene of named objects.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    objects: Vec<SceneObject>,
    by_name: HashMap<String, ObjectId>,
    loaded: bool,
    writes: u64,
}

impl SceneGraph {
    /// Constructs an empty scene that has not finished loading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a loaded scene holding one object per piece, at its resting
    /// position, and one orientation marker per face, at its center.
    pub fn cube(config: &SceneConfig) -> Self {
        let mut scene = Self::new();
        for piece in Piece::iter() {
            scene.add(
                config.object_name(piece.name()),
                piece.rest_position(config.piece_spacing),
            );
        }
        for face in Face::iter() {
            scene.add(
                config.object_name(face.name()),
                face.normal() * config.piece_spacing,
            );
        }
        scene.finish_loading();
        scene
    }

    /// Adds an object and returns its handle. An existing object with the
    /// same name is replaced in name lookups.
    pub fn add(&mut self, name: impl Into<String>, position: Vector3<f32>) -> ObjectId {
        let name = name.into();
        let id = ObjectId::new(self.objects.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.objects.push(SceneObject {
            name,
            position,
            rotation: Vector3::zeros(),
        });
        id
    }

    /// Marks the scene as loaded. Name lookups fail until this is called.
    pub fn finish_loading(&mut self) {
        self.loaded = true;
    }

    /// Whether the scene has finished loading.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns an object by handle.
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    /// Returns an object by name, regardless of loading state.
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.by_name.get(name).and_then(|&id| self.object(id))
    }

    /// Number of component writes performed so far.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.index())
    }
}

impl Scene for SceneGraph {
    fn resolve(&self, name: &str) -> Option<ObjectId> {
        if !self.loaded {
            return None;
        }
        self.by_name.get(name).copied()
    }

    fn position(&self, id: ObjectId, axis: Axis) -> f32 {
        self.object(id).map_or(0.0, |obj| obj.position[axis.index()])
    }

    fn rotation(&self, id: ObjectId, axis: Axis) -> f32 {
        self.object(id).map_or(0.0, |obj| obj.rotation[axis.index()])
    }

    fn set_position(&mut self, id: ObjectId, axis: Axis, value: f32) {
        if let Some(obj) = self.object_mut(id) {
            obj.position[axis.index()] = value;
            self.writes += 1;
        }
    }

    fn set_rotation(&mut self, id: ObjectId, axis: Axis, value: f32) {
        if let Some(obj) = self.object_mut(id) {
            obj.rotation[axis.index()] = value;
            self.writes += 1;
        }
    }
}
