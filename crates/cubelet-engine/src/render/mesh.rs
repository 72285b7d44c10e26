//! Cube geometry: 8 shared corners, 36 indices.

use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const RED: [f32; 3] = Color::RED.to_rgb_array();

const fn v(x: f32, y: f32, z: f32) -> Vertex {
    Vertex { position: [x, y, z], color: RED }
}

/// Unit cube centered on the origin.
///
/// Index = `x | y << 1 | z << 2` where each bit selects the +0.5 side.
pub const CUBE_VERTICES: [Vertex; 8] = [
    v(-0.5, -0.5, -0.5),
    v(0.5, -0.5, -0.5),
    v(-0.5, 0.5, -0.5),
    v(0.5, 0.5, -0.5),
    v(-0.5, -0.5, 0.5),
    v(0.5, -0.5, 0.5),
    v(-0.5, 0.5, 0.5),
    v(0.5, 0.5, 0.5),
];

/// Two triangles per face, counter-clockwise seen from outside.
#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    4, 5, 7,  4, 7, 6, // +Z
    1, 0, 2,  1, 2, 3, // -Z
    5, 1, 3,  5, 3, 7, // +X
    0, 4, 6,  0, 6, 2, // -X
    6, 7, 3,  6, 3, 2, // +Y
    0, 1, 5,  0, 5, 4, // -Y
];

pub const CUBE_INDEX_COUNT: u32 = CUBE_INDICES.len() as u32;

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(i: u16) -> glam::Vec3 {
        glam::Vec3::from(CUBE_VERTICES[i as usize].position)
    }

    #[test]
    fn vertex_stride_is_six_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::layout().array_stride, 24);
        assert_eq!(Vertex::layout().attributes[1].offset, 12);
    }

    #[test]
    fn corners_are_unique_and_at_half_extent() {
        for (i, a) in CUBE_VERTICES.iter().enumerate() {
            assert!(a.position.iter().all(|c| c.abs() == 0.5));
            for b in &CUBE_VERTICES[i + 1..] {
                assert_ne!(a.position, b.position);
            }
        }
    }

    #[test]
    fn every_vertex_is_red() {
        assert!(CUBE_VERTICES.iter().all(|v| v.color == [1.0, 0.0, 0.0]));
    }

    #[test]
    fn indices_are_in_range_and_cover_all_vertices() {
        assert_eq!(CUBE_INDEX_COUNT, 36);
        assert!(CUBE_INDICES.iter().all(|&i| (i as usize) < CUBE_VERTICES.len()));
        for v in 0..8u16 {
            assert!(CUBE_INDICES.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn each_face_spans_exactly_four_coplanar_corners() {
        for face in CUBE_INDICES.chunks(6) {
            let mut corners: Vec<u16> = face.to_vec();
            corners.sort_unstable();
            corners.dedup();
            assert_eq!(corners.len(), 4, "face {face:?}");

            // All four corners share one coordinate at ±0.5.
            let shared_axis = (0..3).any(|axis| {
                let c = pos(corners[0])[axis];
                corners.iter().all(|&i| pos(i)[axis] == c)
            });
            assert!(shared_axis, "face {face:?} is not planar");
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for tri in CUBE_INDICES.chunks(3) {
            let (a, b, c) = (pos(tri[0]), pos(tri[1]), pos(tri[2]));
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {tri:?} faces inward");
        }
    }
}
