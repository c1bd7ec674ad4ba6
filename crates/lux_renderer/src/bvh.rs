//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Nodes live in a flat arena and refer to each other by index. Leaves hold
//! exactly one primitive, identified by its index in the slice the tree was
//! built from; the same slice must be passed back when querying.

use std::time::Instant;

use crate::{Intersection, Object};
use lux_math::{Bounds3, Ray, Vec3};
use serde::{Deserialize, Serialize};

/// Number of evenly spaced split candidates tried by the SAH search.
pub const SAH_CANDIDATES: usize = 10;

/// How interior nodes partition their primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMethod {
    /// Split at the median centroid along the widest axis.
    Naive,
    /// Coarse surface-area-heuristic search over centroid bounds.
    #[default]
    Sah,
}

/// Index of a node inside a [`Bvh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// BVH node - either a branch with two children or a leaf with one primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum BvhNode {
    /// Leaf holding a single primitive.
    Leaf { bounds: Bounds3, primitive: usize },
    /// Internal node; `bounds` is the union of both children.
    Interior {
        bounds: Bounds3,
        left: NodeId,
        right: NodeId,
    },
}

impl BvhNode {
    pub fn bounds(&self) -> &Bounds3 {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Interior { bounds, .. } => bounds,
        }
    }
}

/// Cached per-primitive data used while building.
#[derive(Debug, Clone, Copy)]
struct BuildItem {
    primitive: usize,
    bounds: Bounds3,
    centroid: Vec3,
}

/// An immutable binary BVH over a slice of primitives.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    root: Option<NodeId>,
    split_method: SplitMethod,
}

impl Bvh {
    /// Build a tree over `primitives`. An empty slice produces an empty tree.
    pub fn build<P: Object>(primitives: &[P], split_method: SplitMethod) -> Self {
        let mut bvh = Bvh {
            nodes: Vec::with_capacity((2 * primitives.len()).saturating_sub(1)),
            root: None,
            split_method,
        };
        if primitives.is_empty() {
            return bvh;
        }

        let start = Instant::now();
        let mut items: Vec<BuildItem> = primitives
            .iter()
            .enumerate()
            .map(|(primitive, p)| {
                let bounds = p.bounds();
                BuildItem {
                    primitive,
                    bounds,
                    centroid: bounds.centroid(),
                }
            })
            .collect();

        bvh.root = Some(bvh.build_recursive(&mut items));

        log::info!(
            "BVH built: {} primitives, {} nodes, depth {}, {:?} split in {:.2?}",
            primitives.len(),
            bvh.nodes.len(),
            bvh.depth(),
            split_method,
            start.elapsed()
        );
        bvh
    }

    fn push(&mut self, node: BvhNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn leaf(&mut self, item: &BuildItem) -> NodeId {
        self.push(BvhNode::Leaf {
            bounds: item.bounds,
            primitive: item.primitive,
        })
    }

    fn interior(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let bounds = self.nodes[left.0].bounds().union(self.nodes[right.0].bounds());
        self.push(BvhNode::Interior {
            bounds,
            left,
            right,
        })
    }

    /// Recursive construction; children are pushed before their parent.
    fn build_recursive(&mut self, items: &mut [BuildItem]) -> NodeId {
        match items.len() {
            1 => self.leaf(&items[0]),
            2 => {
                let left = self.leaf(&items[0]);
                let right = self.leaf(&items[1]);
                self.interior(left, right)
            }
            _ => {
                let centroid_bounds = centroid_bounds(items);
                let axis = centroid_bounds.max_extent();
                items.sort_unstable_by(|a, b| a.centroid[axis].total_cmp(&b.centroid[axis]));

                let mid = match self.split_method {
                    SplitMethod::Naive => items.len() / 2,
                    SplitMethod::Sah => sah_split(items),
                };

                let (left_items, right_items) = items.split_at_mut(mid);
                let left = self.build_recursive(left_items);
                let right = self.build_recursive(right_items);
                self.interior(left, right)
            }
        }
    }

    /// Nearest intersection of `ray` with the primitives the tree indexes.
    pub fn intersect<'a, P: Object>(&self, primitives: &'a [P], ray: &Ray) -> Intersection<'a> {
        let Some(root) = self.root else {
            return Intersection::none();
        };

        // Once per ray, not per node
        let inv_dir = ray.direction_inv;
        let dir_is_neg = ray.dir_is_neg();
        self.intersect_node(root, primitives, ray, inv_dir, dir_is_neg)
    }

    fn intersect_node<'a, P: Object>(
        &self,
        id: NodeId,
        primitives: &'a [P],
        ray: &Ray,
        inv_dir: Vec3,
        dir_is_neg: [bool; 3],
    ) -> Intersection<'a> {
        let node = &self.nodes[id.0];
        if !node.bounds().intersect_p(ray, inv_dir, dir_is_neg) {
            return Intersection::none();
        }

        match *node {
            BvhNode::Leaf { primitive, .. } => primitives
                .get(primitive)
                .map_or_else(Intersection::none, |p| p.intersect(ray)),
            BvhNode::Interior { left, right, .. } => {
                let hit_left = self.intersect_node(left, primitives, ray, inv_dir, dir_is_neg);
                let hit_right = self.intersect_node(right, primitives, ray, inv_dir, dir_is_neg);
                if hit_left.distance < hit_right.distance {
                    hit_left
                } else {
                    hit_right
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &BvhNode {
        &self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }

    /// Bounds of the whole tree, empty for an empty tree.
    pub fn bounds(&self) -> Bounds3 {
        self.root
            .map_or(Bounds3::EMPTY, |root| *self.nodes[root.0].bounds())
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn walk(bvh: &Bvh, id: NodeId) -> usize {
            match bvh.nodes[id.0] {
                BvhNode::Leaf { .. } => 1,
                BvhNode::Interior { left, right, .. } => 1 + walk(bvh, left).max(walk(bvh, right)),
            }
        }
        self.root.map_or(0, |root| walk(self, root))
    }
}

fn centroid_bounds(items: &[BuildItem]) -> Bounds3 {
    items
        .iter()
        .fold(Bounds3::EMPTY, |acc, item| acc.union_point(item.centroid))
}

/// Pick a split index for `items`, already sorted along the split axis.
///
/// Candidates sit at evenly spaced fractions of the list. The cost of a
/// candidate weighs each side's primitive count by its share of the summed
/// centroid-bounds surface area. Candidates leaving a side empty, or whose
/// areas sum to zero, are skipped; the first minimum wins. Falls back to the
/// median when no candidate is usable.
fn sah_split(items: &[BuildItem]) -> usize {
    let n = items.len();
    let mut best: Option<(usize, f32)> = None;
    let mut last_mid = None;

    for k in 0..SAH_CANDIDATES {
        let mid = n * k / SAH_CANDIDATES;
        if mid == 0 || mid == n || last_mid == Some(mid) {
            continue;
        }
        last_mid = Some(mid);

        let (left, right) = items.split_at(mid);
        let left_area = centroid_bounds(left).surface_area();
        let right_area = centroid_bounds(right).surface_area();
        let total = left_area + right_area;
        if total <= 0.0 {
            continue;
        }

        let cost = left_area / total * left.len() as f32 + right_area / total * right.len() as f32;
        if !cost.is_finite() {
            continue;
        }
        if best.map_or(true, |(_, best_cost)| cost < best_cost) {
            best = Some((mid, cost));
        }
    }

    best.map_or(n / 2, |(mid, _)| mid)
}
