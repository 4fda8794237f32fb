use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Primitive shapes the geometry provider can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshKind {
    Triangle,
    Quad,
    Cube,
    Sphere,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [Self::Triangle, Self::Quad, Self::Cube, Self::Sphere];

    /// Closed shapes enclose the origin; flat ones lie in the z = 0 plane
    /// facing +Z.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Cube | Self::Sphere)
    }
}

/// One mesh vertex. Each renderer variant reads the attributes it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec3,
    pub tex_coords: Vec2,
}

/// Vertices plus a counter-clockwise triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

const SPHERE_SECTORS: u32 = 36;
const SPHERE_STACKS: u32 = 18;

impl MeshData {
    /// Build the mesh for `kind`, centred on the origin with unit half-extent.
    pub fn build(kind: MeshKind) -> Self {
        match kind {
            MeshKind::Triangle => triangle(),
            MeshKind::Quad => quad(),
            MeshKind::Cube => cube(),
            MeshKind::Sphere => sphere(SPHERE_SECTORS, SPHERE_STACKS),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corner positions of every triangle, in index order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.vertices[t[0] as usize].position,
                self.vertices[t[1] as usize].position,
                self.vertices[t[2] as usize].position,
            ]
        })
    }
}

fn flat_vertex(x: f32, y: f32, color: Vec3, u: f32, v: f32) -> Vertex {
    Vertex {
        position: Vec3::new(x, y, 0.0),
        normal: Vec3::Z,
        color,
        tex_coords: Vec2::new(u, v),
    }
}

fn triangle() -> MeshData {
    MeshData {
        vertices: vec![
            flat_vertex(-1.0, -1.0, Vec3::X, 0.0, 1.0),
            flat_vertex(1.0, -1.0, Vec3::Y, 1.0, 1.0),
            flat_vertex(0.0, 1.0, Vec3::Z, 0.5, 0.0),
        ],
        indices: vec![0, 1, 2],
    }
}

fn quad() -> MeshData {
    MeshData {
        vertices: vec![
            flat_vertex(-1.0, -1.0, Vec3::X, 0.0, 1.0),
            flat_vertex(1.0, -1.0, Vec3::Y, 1.0, 1.0),
            flat_vertex(1.0, 1.0, Vec3::Z, 1.0, 0.0),
            flat_vertex(-1.0, 1.0, Vec3::ONE, 0.0, 0.0),
        ],
        indices: vec![0, 1, 2, 2, 3, 0],
    }
}

/// Six faces, each described by its outward normal and two in-plane axes
/// with `u × v = normal`, so every face winds counter-clockwise from outside.
fn cube() -> MeshData {
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut mesh = MeshData::default();
    for (normal, u, v) in faces {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in corners {
            mesh.vertices.push(Vertex {
                position: normal + u * su + v * sv,
                normal,
                color: normal.abs(),
                tex_coords: Vec2::new((su + 1.0) * 0.5, (1.0 - sv) * 0.5),
            });
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    mesh
}

/// UV sphere of radius 1. Rows run from the north pole (row 0) to the south
/// pole; the pole rows emit one triangle per sector to avoid degenerate ones.
fn sphere(sectors: u32, stacks: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for i in 0..=stacks {
        let phi = i as f32 * PI / stacks as f32;
        let (ring, y) = (phi.sin(), phi.cos());
        for j in 0..=sectors {
            let theta = j as f32 * TAU / sectors as f32;
            let position = Vec3::new(ring * theta.sin(), y, ring * theta.cos());
            mesh.vertices.push(Vertex {
                position,
                normal: position.normalize_or(Vec3::Y),
                color: Vec3::ONE,
                tex_coords: Vec2::new(j as f32 / sectors as f32, i as f32 / stacks as f32),
            });
        }
    }

    let row = sectors + 1;
    for i in 0..stacks {
        for j in 0..sectors {
            let k1 = i * row + j;
            let k2 = k1 + row;
            if i != 0 {
                mesh.indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stacks - 1 {
                mesh.indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_stay_in_range_for_every_kind() {
        for kind in MeshKind::ALL {
            let mesh = MeshData::build(kind);
            assert!(!mesh.indices.is_empty(), "{kind:?} has no triangles");
            assert_eq!(mesh.indices.len() % 3, 0);
            let n = mesh.vertices.len() as u32;
            assert!(mesh.indices.iter().all(|&i| i < n), "{kind:?} index out of range");
        }
    }

    #[test]
    fn winding_faces_outward() {
        for kind in MeshKind::ALL {
            let mesh = MeshData::build(kind);
            for [a, b, c] in mesh.triangles() {
                let face = (b - a).cross(c - a);
                assert!(face.length() > 1e-6, "{kind:?} has a degenerate triangle");
                let outward = if kind.is_closed() {
                    (a + b + c) / 3.0
                } else {
                    Vec3::Z
                };
                assert!(face.dot(outward) > 0.0, "{kind:?} triangle winds inward");
            }
        }
    }

    #[test]
    fn cube_spans_unit_half_extent() {
        let mesh = MeshData::build(MeshKind::Cube);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        for v in &mesh.vertices {
            assert_eq!(v.position.abs().max_element(), 1.0);
            assert!(v.position.dot(v.normal) > 0.0);
        }
    }

    #[test]
    fn sphere_vertices_lie_on_unit_radius() {
        let mesh = MeshData::build(MeshKind::Sphere);
        for v in &mesh.vertices {
            assert!((v.position.length() - 1.0).abs() < 1e-5);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
        let expected = 2 * SPHERE_SECTORS * (SPHERE_STACKS - 1);
        assert_eq!(mesh.triangle_count(), expected as usize);
    }

    #[test]
    fn build_is_deterministic() {
        assert_eq!(
            MeshData::build(MeshKind::Sphere),
            MeshData::build(MeshKind::Sphere)
        );
    }
}
