//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Built once over a list of primitives, then read-only. Nodes are stored
//! in an arena and refer to their children by index; the primitives are
//! owned by the tree.

use std::cmp::Ordering;

use lantern_math::{Aabb, Interval, Ray};
use rand::{Rng, RngCore};
use thiserror::Error;

use crate::{HitRecord, Hittable, Primitive};

/// Errors that can occur while building a BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Cannot build a BVH over an empty primitive list")]
    EmptyPrimitiveList,

    #[error("Primitive {index} has no bounding box")]
    MissingBoundingBox { index: usize },
}

/// A child slot of a BVH node: another node, or a primitive directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BvhChild {
    Node(usize),
    Primitive(usize),
}

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    left: BvhChild,
    right: BvhChild,
    bbox: Aabb,
}

/// Binary BVH over heterogeneous primitives.
///
/// A node with one primitive stores it in both slots; traversal tests it
/// once.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<Primitive>,
    root: usize,
}

impl Bvh {
    /// Build a BVH whose boxes are valid over `[time0, time1]`.
    ///
    /// Every node picks its split axis uniformly at random, sorts its
    /// primitives by box minimum on that axis and splits the list in half.
    pub fn build(
        primitives: Vec<Primitive>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> Result<Bvh, BuildError> {
        if primitives.is_empty() {
            return Err(BuildError::EmptyPrimitiveList);
        }

        let boxes = primitives
            .iter()
            .enumerate()
            .map(|(index, primitive)| {
                primitive
                    .bounding_box(time0, time1)
                    .ok_or(BuildError::MissingBoundingBox { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut order: Vec<usize> = (0..primitives.len()).collect();
        let mut nodes = Vec::with_capacity(primitives.len());
        let root = build_node(&mut nodes, &boxes, &mut order, rng);

        log::info!(
            "Built BVH: {} primitives, {} nodes",
            primitives.len(),
            nodes.len()
        );

        Ok(Bvh {
            nodes,
            primitives,
            root,
        })
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn child_box(&self, child: BvhChild, time0: f32, time1: f32) -> Option<Aabb> {
        match child {
            BvhChild::Node(index) => Some(self.nodes[index].bbox),
            BvhChild::Primitive(index) => self.primitives[index].bounding_box(time0, time1),
        }
    }

    fn hit_child(
        &self,
        child: BvhChild,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        match child {
            BvhChild::Node(index) => self.hit_node(index, ray, ray_t, rng),
            BvhChild::Primitive(index) => self.primitives[index].hit(ray, ray_t, rng),
        }
    }

    fn hit_node(
        &self,
        index: usize,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'_>> {
        let node = &self.nodes[index];
        if !node.bbox.hit(ray, ray_t) {
            return None;
        }

        let left = self.hit_child(node.left, ray, ray_t, rng);
        if node.left == node.right {
            return left;
        }

        // Only hits closer than the left one can replace it
        let window = left.map_or(ray_t, |rec| ray_t.with_max(rec.t));
        self.hit_child(node.right, ray, window, rng).or(left)
    }
}

impl Hittable for Bvh {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        self.hit_node(self.root, ray, ray_t, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.nodes[self.root].bbox)
    }
}

fn build_node(
    nodes: &mut Vec<BvhNode>,
    boxes: &[Aabb],
    order: &mut [usize],
    rng: &mut dyn RngCore,
) -> usize {
    let axis = rng.gen_range(0..3);
    order.sort_by(|&a, &b| {
        let a_min = boxes[a].axis_interval(axis).min;
        let b_min = boxes[b].axis_interval(axis).min;
        a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
    });

    let (left, right) = match order.len() {
        1 => (BvhChild::Primitive(order[0]), BvhChild::Primitive(order[0])),
        2 => (BvhChild::Primitive(order[0]), BvhChild::Primitive(order[1])),
        n => {
            let (left_half, right_half) = order.split_at_mut(n / 2);
            (
                BvhChild::Node(build_node(nodes, boxes, left_half, rng)),
                BvhChild::Node(build_node(nodes, boxes, right_half, rng)),
            )
        }
    };

    let child_box = |child: BvhChild, nodes: &[BvhNode]| match child {
        BvhChild::Node(index) => nodes[index].bbox,
        BvhChild::Primitive(index) => boxes[index],
    };
    let bbox = Aabb::surrounding(&child_box(left, nodes), &child_box(right, nodes));

    nodes.push(BvhNode { left, right, bbox });
    nodes.len() - 1
}
