//! Procedural mesh generation for shapes Bevy has no primitive for

use bevy::asset::RenderAssetUsages;
use bevy::math::cubic_splines::{CubicCardinalSpline, CubicCurve, CubicGenerator};
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

/// Flat-shaded regular octahedron with vertices `radius` from the center.
pub fn octahedron(radius: f32) -> Mesh {
    let tips = [
        Vec3::X * radius,
        Vec3::NEG_X * radius,
        Vec3::Y * radius,
        Vec3::NEG_Y * radius,
        Vec3::Z * radius,
        Vec3::NEG_Z * radius,
    ];
    // Each face as (x, y, z) tip indices, wound counter-clockwise from outside.
    let faces = [
        [0, 2, 4],
        [4, 2, 1],
        [1, 2, 5],
        [5, 2, 0],
        [4, 3, 0],
        [1, 3, 4],
        [5, 3, 1],
        [0, 3, 5],
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    for [a, b, c] in faces {
        let (pa, pb, pc) = (tips[a], tips[b], tips[c]);
        let normal = (pb - pa).cross(pc - pa).normalize();
        positions.extend([pa.to_array(), pb.to_array(), pc.to_array()]);
        normals.extend([normal.to_array(); 3]);
        uvs.extend([[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]]);
    }
    let indices = (0..positions.len() as u32).collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Tube of `radius` swept along `curve` over its whole parameter range.
///
/// `segments` rings along the curve, `radial` vertices per ring. Ring frames
/// are parallel-transported so the tube does not twist.
pub fn tube(curve: &CubicCurve<Vec3>, segments: usize, radius: f32, radial: usize) -> Mesh {
    let segments = segments.max(1);
    let radial = radial.max(3);
    let span = curve.segments().len() as f32;

    let samples: Vec<Vec3> = (0..=segments)
        .map(|i| curve.position(i as f32 / segments as f32 * span))
        .collect();
    let tangents: Vec<Vec3> = (0..=segments)
        .map(|i| {
            let prev = samples[i.saturating_sub(1)];
            let next = samples[(i + 1).min(segments)];
            (next - prev).normalize_or(Vec3::Y)
        })
        .collect();

    let mut normal = tangents[0].any_orthonormal_vector();
    let mut positions = Vec::with_capacity((segments + 1) * (radial + 1));
    let mut normals = Vec::with_capacity(positions.capacity());
    let mut uvs = Vec::with_capacity(positions.capacity());

    for (i, (&center, &tangent)) in samples.iter().zip(&tangents).enumerate() {
        // Remove the tangential component left over from the previous ring.
        normal = (normal - tangent * normal.dot(tangent)).normalize_or(tangent.any_orthonormal_vector());
        let binormal = tangent.cross(normal);

        for j in 0..=radial {
            let angle = j as f32 / radial as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let outward = normal * cos + binormal * sin;
            positions.push((center + outward * radius).to_array());
            normals.push(outward.to_array());
            uvs.push([i as f32 / segments as f32, j as f32 / radial as f32]);
        }
    }

    let ring = (radial + 1) as u32;
    let mut indices = Vec::with_capacity(segments * radial * 6);
    for i in 0..segments as u32 {
        for j in 0..radial as u32 {
            let a = i * ring + j;
            let b = (i + 1) * ring + j;
            let c = (i + 1) * ring + j + 1;
            let d = i * ring + j + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

/// Control points of a candy cane: straight shaft, then a hook.
pub fn candy_cane_path() -> [Vec3; 4] {
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        Vec3::new(0.5, 2.5, 0.0),
        Vec3::new(1.0, 2.2, 0.0),
    ]
}

/// Catmull-Rom curve through [`candy_cane_path`].
pub fn candy_cane_curve() -> Option<CubicCurve<Vec3>> {
    CubicCardinalSpline::new_catmull_rom(candy_cane_path())
        .to_curve()
        .ok()
}

/// Candy cane tube, or a plain cylinder if the path cannot form a curve.
pub fn candy_cane(segments: usize, radius: f32, radial: usize) -> Mesh {
    match candy_cane_curve() {
        Some(curve) => tube(&curve, segments, radius, radial),
        None => {
            warn!("Candy cane path rejected, using a straight cane");
            Cylinder::new(radius, 2.0).mesh().build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octahedron_faces_point_outward() {
        let mesh = octahedron(1.5);
        assert_eq!(mesh.count_vertices(), 24);

        let Some(bevy::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        let Some(bevy::mesh::VertexAttributeValues::Float32x3(normals)) =
            mesh.attribute(Mesh::ATTRIBUTE_NORMAL)
        else {
            panic!("missing normals");
        };
        for (p, n) in positions.iter().zip(normals) {
            assert!(Vec3::from_array(*p).dot(Vec3::from_array(*n)) > 0.0);
        }
    }

    #[test]
    fn tube_has_expected_topology() {
        let mesh = candy_cane(20, 0.15, 8);
        assert_eq!(mesh.count_vertices(), 21 * 9);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(20 * 8 * 6));
    }

    #[test]
    fn tube_stays_at_radius() {
        let path = candy_cane_path();
        let curve = candy_cane_curve().expect("four control points form a curve");
        let mesh = tube(&curve, 10, 0.15, 6);
        let Some(bevy::mesh::VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("missing positions");
        };
        // The end rings sit around the first and last control points.
        for p in &positions[..7] {
            let d = Vec3::from_array(*p).distance(path[0]);
            assert!((d - 0.15).abs() < 1e-4);
        }
        for p in &positions[positions.len() - 7..] {
            let d = Vec3::from_array(*p).distance(path[3]);
            assert!((d - 0.15).abs() < 1e-4);
        }
    }
}
