//! # Block Side Module
//!
//! This module defines the six faces of a voxel block. The instanced cube
//! template is assembled face by face from these.

use cgmath::{Point3, Vector3};

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing negative X)
    FRONT = 0,

    /// The back face (facing positive X)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative Z)
    LEFT = 4,

    /// The right face (facing positive Z)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockSide::FRONT => Vector3::new(-1.0, 0.0, 0.0),
            BlockSide::BACK => Vector3::new(1.0, 0.0, 0.0),
            BlockSide::BOTTOM => Vector3::new(0.0, -1.0, 0.0),
            BlockSide::TOP => Vector3::new(0.0, 1.0, 0.0),
            BlockSide::LEFT => Vector3::new(0.0, 0.0, -1.0),
            BlockSide::RIGHT => Vector3::new(0.0, 0.0, 1.0),
        }
    }

    /// The four corners of this face on the unit cube `[0, 1]³`.
    ///
    /// Corners are ordered lower-left, lower-right, upper-left, upper-right as
    /// seen from outside the cube, so indices `[0, 1, 3, 0, 3, 2]` wind
    /// counter-clockwise around the outward normal.
    pub fn unit_corners(self) -> [Point3<f32>; 4] {
        match self {
            BlockSide::FRONT => [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
            ],
            BlockSide::BACK => [
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 1.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            BlockSide::BOTTOM => [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
            ],
            BlockSide::TOP => [
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 1.0),
            ],
            BlockSide::LEFT => [
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            BlockSide::RIGHT => [
                Point3::new(0.0, 0.0, 1.0),
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(0.0, 1.0, 1.0),
                Point3::new(1.0, 1.0, 1.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    #[test]
    fn test_unit_corners_wind_around_outward_normal() {
        for side in BlockSide::all() {
            let [ll, lr, ul, ur] = side.unit_corners();
            // First triangle of the quad: ll, lr, ur.
            let face_normal = (lr - ll).cross(ur - ll).normalize();
            assert!(
                (face_normal - side.normal()).magnitude() < 1e-6,
                "{:?} winds the wrong way: {:?}",
                side,
                face_normal
            );
            // Second triangle: ll, ur, ul.
            let second = (ur - ll).cross(ul - ll).normalize();
            assert!((second - side.normal()).magnitude() < 1e-6);
        }
    }
}
