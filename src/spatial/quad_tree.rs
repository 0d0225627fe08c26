use glam::Vec2;
use crate::models::BoundingBox;
use crate::particles::Particle;
use crate::utils::{DEFAULT_LEAF_CAPACITY, DEFAULT_MAX_DEPTH};

/// Subdivision policy of a [`QuadTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadTreeConfig {
    /// A node holding at most this many particles becomes a leaf.
    pub leaf_capacity: usize,
    /// Nodes at this depth become leaves whatever their particle count. This bounds the
    /// recursion when many particles share the same position.
    pub max_depth: usize,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            leaf_capacity: DEFAULT_LEAF_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Quad-tree node.
///
/// Children of an internal node are ordered top-left, top-right, bottom-left, bottom-right and
/// cover the four quadrants of the node's box, see [`BoundingBox::quadrant`]. Nodes do not
/// store their box; it is derived from the tree's box while descending.
#[derive(Debug, Clone)]
pub enum QuadTreeNode {
    /// A region whose particles are stored directly.
    Leaf(Vec<Particle>),
    /// A region split at its midpoint into four children.
    Internal(Box<[QuadTreeNode; 4]>),
}

/// A quad-tree over a particle set, answering radius queries.
///
/// The tree is a snapshot: particles are copied in at construction and the tree is rebuilt
/// whenever positions change.
///
/// # Examples
///
/// ```
/// use rs_nbody::models::Vec2;
/// use rs_nbody::particles::Particle;
/// use rs_nbody::spatial::QuadTree;
///
/// let particles: Vec<Particle> = (0..10)
///     .map(|i| Particle::new(i, 1.0, Vec2::new(i as f32, 0.0), Vec2::ZERO))
///     .collect();
/// let tree = QuadTree::from_particles(&particles);
///
/// let mut found = Vec::new();
/// tree.query(Vec2::new(4.0, 0.0), 1.5, &mut found);
/// let mut ids: Vec<usize> = found.iter().map(|p| p.id).collect();
/// ids.sort();
/// assert_eq!(ids, vec![3, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct QuadTree {
    root: QuadTreeNode,
    bbox: BoundingBox,
    len: usize,
}

impl QuadTree {
    /// Builds a tree over `particles` inside `bbox` with the default subdivision policy.
    pub fn build(particles: &[Particle], bbox: BoundingBox) -> Self {
        Self::build_with(particles, bbox, QuadTreeConfig::default())
    }

    /// Builds a tree over `particles` inside `bbox`.
    ///
    /// Each particle is routed to the quadrant containing its position; the result only
    /// depends on the order of `particles`, `bbox` and `config`.
    pub fn build_with(particles: &[Particle], bbox: BoundingBox, config: QuadTreeConfig) -> Self {
        let root = build_node(particles.to_vec(), bbox, 0, &config);
        Self {
            root,
            bbox,
            len: particles.len(),
        }
    }

    /// Builds a tree over the tightest box enclosing `particles` (the unit box if empty).
    pub fn from_particles(particles: &[Particle]) -> Self {
        Self::build(particles, BoundingBox::enclosing(particles.iter().map(|p| p.position)))
    }

    pub fn root(&self) -> &QuadTreeNode {
        &self.root
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    /// Number of particles stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Depth of the deepest leaf; a tree that is a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn depth_of(node: &QuadTreeNode) -> usize {
            match node {
                QuadTreeNode::Leaf(_) => 0,
                QuadTreeNode::Internal(children) => 1 + children.iter().map(depth_of).max().unwrap_or(0),
            }
        }
        depth_of(&self.root)
    }

    /// Every leaf together with its box, in depth-first child order.
    pub fn leaves(&self) -> Vec<(BoundingBox, &[Particle])> {
        fn collect<'a>(node: &'a QuadTreeNode, bbox: BoundingBox, out: &mut Vec<(BoundingBox, &'a [Particle])>) {
            match node {
                QuadTreeNode::Leaf(particles) => out.push((bbox, particles.as_slice())),
                QuadTreeNode::Internal(children) => {
                    for (i, child) in children.iter().enumerate() {
                        collect(child, bbox.quadrant(i), out);
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, self.bbox, &mut out);
        out
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Replaces the contents of `out` with every particle strictly closer than `radius` to
    /// `center`. The order of the result is unspecified.
    ///
    /// Subtrees whose box is farther than `radius` from `center` are skipped, so nothing
    /// within range is missed. A particle located at `center` is part of the result.
    pub fn query(&self, center: Vec2, radius: f32, out: &mut Vec<Particle>) {
        out.clear();
        query_node(&self.root, self.bbox, center, radius, out);
    }

    /// Allocating variant of [`QuadTree::query`].
    pub fn query_vec(&self, center: Vec2, radius: f32) -> Vec<Particle> {
        let mut out = Vec::new();
        self.query(center, radius, &mut out);
        out
    }
}

fn build_node(particles: Vec<Particle>, bbox: BoundingBox, depth: usize, config: &QuadTreeConfig) -> QuadTreeNode {
    if particles.len() <= config.leaf_capacity || depth >= config.max_depth || bbox.is_point() {
        return QuadTreeNode::Leaf(particles);
    }

    let mut buckets: [Vec<Particle>; 4] = Default::default();
    for p in particles {
        buckets[bbox.quadrant_of(p.position)].push(p);
    }

    let children = std::array::from_fn(|i| {
        build_node(std::mem::take(&mut buckets[i]), bbox.quadrant(i), depth + 1, config)
    });
    QuadTreeNode::Internal(Box::new(children))
}

fn query_node(node: &QuadTreeNode, bbox: BoundingBox, center: Vec2, radius: f32, out: &mut Vec<Particle>) {
    match node {
        QuadTreeNode::Leaf(particles) => {
            out.extend(
                particles
                    .iter()
                    .filter(|p| (center - p.position).length() < radius)
                    .copied(),
            );
        }
        QuadTreeNode::Internal(children) => {
            for (i, child) in children.iter().enumerate() {
                let child_box = bbox.quadrant(i);
                if child_box.distance_to_point(center) <= radius {
                    query_node(child, child_box, center, radius, out);
                }
            }
        }
    }
}
