//! Bounding volume hierarchy over the triangles of a single mesh.
//!
//! Nodes live in an arena and refer to each other by index. Leaves own a
//! contiguous range of a reordered triangle-index array. The split axis of
//! every branch is the one whose midpoint bisection leaves the two halves
//! furthest apart.

use lantern_core::Mesh;
use lantern_math::{Aabb, Interval, Ray};

use crate::triangle::{intersect_triangle, triangle_bounds};

/// Triangles per leaf before a node is split.
pub const DEFAULT_LEAF_SIZE: usize = 8;

#[derive(Debug, Clone, Copy)]
enum MeshBvhNode {
    Leaf { bbox: Aabb, start: usize, end: usize },
    Branch { bbox: Aabb, left: usize, right: usize },
}

impl MeshBvhNode {
    fn bbox(&self) -> &Aabb {
        match self {
            MeshBvhNode::Leaf { bbox, .. } | MeshBvhNode::Branch { bbox, .. } => bbox,
        }
    }
}

/// Closest triangle hit found by [`MeshBvh::hit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshHit {
    pub triangle: usize,
    pub t: f32,
    /// Barycentric weight of the triangle's second vertex
    pub u: f32,
    /// Barycentric weight of the triangle's third vertex
    pub v: f32,
}

/// Acceleration structure over triangle indices of one [`Mesh`].
///
/// The mesh itself is not stored; callers pass it to [`MeshBvh::hit`].
#[derive(Debug, Clone)]
pub struct MeshBvh {
    nodes: Vec<MeshBvhNode>,
    triangles: Vec<u32>,
    root: Option<usize>,
}

impl MeshBvh {
    /// Build with [`DEFAULT_LEAF_SIZE`].
    pub fn build(mesh: &Mesh) -> Self {
        Self::build_with_leaf_size(mesh, DEFAULT_LEAF_SIZE)
    }

    pub fn build_with_leaf_size(mesh: &Mesh, leaf_size: usize) -> Self {
        let leaf_size = leaf_size.max(1);
        let bounds: Vec<Aabb> = (0..mesh.triangle_count())
            .map(|triangle| triangle_bounds(mesh.triangle_positions(triangle)))
            .collect();

        let mut triangles: Vec<u32> = (0..bounds.len() as u32).collect();
        let mut nodes = Vec::with_capacity(2 * bounds.len() / leaf_size + 1);
        let root = (!triangles.is_empty())
            .then(|| build_node(&mut nodes, &bounds, &mut triangles, 0, leaf_size));

        log::debug!(
            "Mesh BVH: {} triangles, {} nodes, leaf size {}",
            triangles.len(),
            nodes.len(),
            leaf_size
        );

        Self {
            nodes,
            triangles,
            root,
        }
    }

    /// Box around every triangle, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.map(|root| *self.nodes[root].bbox())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Closest triangle intersection inside `ray_t`.
    ///
    /// `mesh` must be the mesh the hierarchy was built from.
    pub fn hit(&self, mesh: &Mesh, ray: &Ray, ray_t: Interval) -> Option<MeshHit> {
        self.hit_node(self.root?, mesh, ray, ray_t)
    }

    fn hit_node(&self, index: usize, mesh: &Mesh, ray: &Ray, ray_t: Interval) -> Option<MeshHit> {
        match self.nodes[index] {
            MeshBvhNode::Leaf { bbox, start, end } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<MeshHit> = None;
                for &triangle in &self.triangles[start..end] {
                    let triangle = triangle as usize;
                    let window = closest.map_or(ray_t, |hit| ray_t.with_max(hit.t));
                    if let Some((t, u, v)) =
                        intersect_triangle(ray, mesh.triangle_positions(triangle), window)
                    {
                        closest = Some(MeshHit { triangle, t, u, v });
                    }
                }
                closest
            }

            MeshBvhNode::Branch { bbox, left, right } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let left_hit = self.hit_node(left, mesh, ray, ray_t);
                let window = left_hit.map_or(ray_t, |hit| ray_t.with_max(hit.t));
                self.hit_node(right, mesh, ray, window).or(left_hit)
            }
        }
    }
}

fn union_of(bounds: &[Aabb], triangles: &[u32]) -> Aabb {
    triangles
        .iter()
        .fold(Aabb::EMPTY, |acc, &triangle| Aabb::surrounding(&acc, &bounds[triangle as usize]))
}

fn sort_by_min(bounds: &[Aabb], triangles: &mut [u32], axis: usize) {
    triangles.sort_by(|&a, &b| {
        let a_min = bounds[a as usize].axis_interval(axis).min;
        let b_min = bounds[b as usize].axis_interval(axis).min;
        a_min.total_cmp(&b_min)
    });
}

/// Sort `triangles` along the axis whose midpoint split separates the two
/// halves the most. Ties keep the earliest axis in x, y, z order.
fn sort_by_best_axis(bounds: &[Aabb], triangles: &mut [u32], mid: usize) {
    let mut best: Option<(f32, Vec<u32>)> = None;

    for axis in 0..3 {
        let mut order = triangles.to_vec();
        sort_by_min(bounds, &mut order, axis);

        let (left, right) = order.split_at(mid);
        let score = union_of(bounds, left).separation(&union_of(bounds, right));

        if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
            best = Some((score, order));
        }
    }

    if let Some((_, order)) = best {
        triangles.copy_from_slice(&order);
    }
}

fn build_node(
    nodes: &mut Vec<MeshBvhNode>,
    bounds: &[Aabb],
    triangles: &mut [u32],
    offset: usize,
    leaf_size: usize,
) -> usize {
    let bbox = union_of(bounds, triangles);
    let count = triangles.len();

    let node = if count <= leaf_size {
        MeshBvhNode::Leaf {
            bbox,
            start: offset,
            end: offset + count,
        }
    } else {
        let mid = count / 2;
        sort_by_best_axis(bounds, triangles, mid);

        let (left_half, right_half) = triangles.split_at_mut(mid);
        let left = build_node(nodes, bounds, left_half, offset, leaf_size);
        let right = build_node(nodes, bounds, right_half, offset + mid, leaf_size);
        MeshBvhNode::Branch { bbox, left, right }
    };

    nodes.push(node);
    nodes.len() - 1
}
