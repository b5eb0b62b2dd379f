//! Octree over the environment's triangle soup.
//!
//! Built once when the environment mesh finishes loading, queried every
//! frame with the character's capsule.  Triangles whose boxes straddle a
//! split land in every child they touch, so a query only ever needs to
//! descend boxes that overlap the capsule.

use glam::Vec3;
use smallvec::SmallVec;

use super::geometry::{Aabb, Capsule, Contact, Triangle, triangle_capsule_contact};

/// Leaves stop splitting at this many triangles…
const LEAF_BUDGET: usize = 8;
/// …or at this depth, whichever comes first.
const MAX_DEPTH: usize = 8;

type Candidates<'a> = SmallVec<[&'a Triangle; 64]>;

pub struct Octree {
    root: Option<Node>,
}

struct Node {
    bounds: Aabb,
    children: Vec<Node>,
    /// Non-empty only for leaves.
    triangles: Vec<Triangle>,
}

impl Octree {
    /// Partition `triangles` into a tree.  An empty soup yields a tree that
    /// never reports contact.
    pub fn from_triangles(triangles: Vec<Triangle>) -> Octree {
        if triangles.is_empty() {
            return Octree { root: None };
        }
        let mut bounds = Aabb::EMPTY;
        for t in &triangles {
            bounds.expand(t.a);
            bounds.expand(t.b);
            bounds.expand(t.c);
        }
        log::debug!("octree: {} triangles, bounds {:?}", triangles.len(), bounds);
        Octree {
            root: Some(Node::build(bounds, triangles, 0)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// World bounds of the partitioned geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|n| n.bounds)
    }

    /// Capsule-vs-world penetration query.
    ///
    /// Every candidate triangle that penetrates pushes a working copy of the
    /// capsule out along its own contact normal; the returned [`Contact`] is
    /// the net displacement of the capsule centre.  `None` means no triangle
    /// touched the capsule.
    pub fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let root = self.root.as_ref()?;

        let mut candidates = Candidates::new();
        root.gather(&capsule.aabb(), &mut candidates);

        let mut probe = *capsule;
        let mut hit = false;
        for tri in candidates {
            if let Some(c) = triangle_capsule_contact(tri, &probe) {
                hit = true;
                probe.translate(c.normal * c.depth);
            }
        }
        if !hit {
            return None;
        }

        let shift = probe.center() - capsule.center();
        let depth = shift.length();
        if depth > 1e-6 {
            Some(Contact {
                normal: shift / depth,
                depth,
            })
        } else {
            // touching but fully resolved in place; report a grounding
            // contact with no correction rather than a NaN normal
            Some(Contact {
                normal: Vec3::Y,
                depth: 0.0,
            })
        }
    }
}

impl Node {
    fn build(bounds: Aabb, triangles: Vec<Triangle>, depth: usize) -> Node {
        if triangles.len() <= LEAF_BUDGET || depth >= MAX_DEPTH {
            return Node {
                bounds,
                children: Vec::new(),
                triangles,
            };
        }

        let mut children = Vec::new();
        for octant in bounds.octants() {
            let subset: Vec<Triangle> = triangles
                .iter()
                .filter(|t| t.aabb().overlaps(&octant))
                .copied()
                .collect();
            if !subset.is_empty() {
                children.push(Node::build(octant, subset, depth + 1));
            }
        }
        Node {
            bounds,
            children,
            triangles: Vec::new(),
        }
    }

    fn gather<'a>(&'a self, query: &Aabb, out: &mut Candidates<'a>) {
        if !self.bounds.overlaps(query) {
            return;
        }
        for t in &self.triangles {
            if t.aabb().overlaps(query) {
                out.push(t);
            }
        }
        for child in &self.children {
            child.gather(query, out);
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
