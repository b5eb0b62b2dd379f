//! World-space collision math: axis-aligned boxes, triangles and the
//! swept-sphere capsule used as the character's collision proxy.

use glam::Vec3;

/// Distances below this are treated as zero when normalising contact normals.
const DEGENERATE_EPS: f32 = 1e-6;

/*=======================================================================*/
/*                           Axis-aligned box                            */
/*=======================================================================*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box; growing it with [`Aabb::expand`] yields the bounds of
    /// whatever points were fed in.
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    #[inline]
    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Aabb {
        let mut bb = Aabb::EMPTY;
        for p in points {
            bb.expand(p);
        }
        bb
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// The eight child boxes obtained by splitting at the centre.
    pub fn octants(&self) -> [Aabb; 8] {
        let c = self.center();
        let mut out = [*self; 8];
        for (i, bb) in out.iter_mut().enumerate() {
            bb.min.x = if i & 1 == 0 { self.min.x } else { c.x };
            bb.max.x = if i & 1 == 0 { c.x } else { self.max.x };
            bb.min.y = if i & 2 == 0 { self.min.y } else { c.y };
            bb.max.y = if i & 2 == 0 { c.y } else { self.max.y };
            bb.min.z = if i & 4 == 0 { self.min.z } else { c.z };
            bb.max.z = if i & 4 == 0 { c.z } else { self.max.z };
        }
        out
    }
}

/*=======================================================================*/
/*                               Triangle                                */
/*=======================================================================*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Triangle {
        Triangle { a, b, c }
    }

    /// Unit normal; zero for a degenerate (sliver) triangle.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_points([self.a, self.b, self.c])
    }

    /// Barycentric containment test for a point already on the triangle's
    /// plane.
    pub fn contains_point(&self, p: Vec3) -> bool {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = p - self.a;

        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < DEGENERATE_EPS {
            return false;
        }
        let inv = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv;
        let v = (dot00 * dot12 - dot01 * dot02) * inv;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }
}

/*=======================================================================*/
/*                                Capsule                                */
/*=======================================================================*/

/// Swept sphere between `start` (bottom sphere centre) and `end` (top sphere
/// centre).  Translated every frame, never re-created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

impl Capsule {
    /// Upright capsule sized from a model's bounding extents: the radius is
    /// half the model diameter and the sphere centres sit `radius` in from
    /// the feet (y = 0) and the crown (y = `height`).
    pub fn upright(height: f32, diameter: f32) -> Capsule {
        let radius = diameter * 0.5;
        Capsule {
            start: Vec3::new(0.0, radius, 0.0),
            end: Vec3::new(0.0, height - radius, 0.0),
            radius,
        }
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Full height including both end caps.
    #[inline]
    pub fn height(&self) -> f32 {
        self.end.y - self.start.y + self.radius * 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.start.min(self.end) - Vec3::splat(self.radius),
            max: self.start.max(self.end) + Vec3::splat(self.radius),
        }
    }
}

/*=======================================================================*/
/*                                Contact                                */
/*=======================================================================*/

/// Result of a capsule-vs-geometry query: the direction to push the capsule
/// and how far it has penetrated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub normal: Vec3,
    pub depth: f32,
}

/*=======================================================================*/
/*                         Closest-point helpers                         */
/*=======================================================================*/

/// Closest point to `p` on segment `ab`.
pub fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < DEGENERATE_EPS {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1q1` and `p2q2`.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t);
    if a < DEGENERATE_EPS && e < DEGENERATE_EPS {
        return (p1, p2);
    }
    if a < DEGENERATE_EPS {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e < DEGENERATE_EPS {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s_ = if denom > DEGENERATE_EPS {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t_ = (b * s_ + f) / e;
            if t_ < 0.0 {
                t_ = 0.0;
                s_ = (-c / a).clamp(0.0, 1.0);
            } else if t_ > 1.0 {
                t_ = 1.0;
                s_ = ((b - c) / a).clamp(0.0, 1.0);
            }
            s = s_;
            t = t_;
        }
    }
    (p1 + d1 * s, p2 + d2 * t)
}

/*=======================================================================*/
/*                       Triangle-vs-capsule test                        */
/*=======================================================================*/

/// Penetration test between one triangle and a capsule.
///
/// Two phases, axis-vs-face first:
/// 1. If the capsule axis crosses the triangle's slab and the crossing point
///    projects inside the face, the contact is along the face normal.
/// 2. Otherwise the capsule can only touch an edge: take the closest point
///    pair between the axis and each edge and compare against the radius.
pub fn triangle_capsule_contact(tri: &Triangle, cap: &Capsule) -> Option<Contact> {
    let normal = tri.normal();
    if normal == Vec3::ZERO {
        return None; // sliver triangle, nothing to collide with
    }

    let plane_d = normal.dot(tri.a);
    let d1 = normal.dot(cap.start) - plane_d - cap.radius;
    let d2 = normal.dot(cap.end) - plane_d - cap.radius;

    if (d1 > 0.0 && d2 > 0.0) || (d1 < -cap.radius && d2 < -cap.radius) {
        return None; // entirely above, or entirely beyond the back side
    }

    let delta = (d1 / (d1.abs() + d2.abs())).abs();
    let crossing = cap.start.lerp(cap.end, delta);
    if tri.contains_point(crossing) {
        return Some(Contact {
            normal,
            depth: d1.min(d2).abs(),
        });
    }

    let r_sq = cap.radius * cap.radius;
    for (ea, eb) in [(tri.a, tri.b), (tri.b, tri.c), (tri.c, tri.a)] {
        let (on_axis, on_edge) = closest_points_between_segments(cap.start, cap.end, ea, eb);
        let dist_sq = on_axis.distance_squared(on_edge);
        if dist_sq < r_sq {
            let dist = dist_sq.sqrt();
            let push = if dist > DEGENERATE_EPS {
                (on_axis - on_edge) / dist
            } else {
                normal // axis touches the edge exactly; fall back to the face
            };
            return Some(Contact {
                normal: push,
                depth: cap.radius - dist,
            });
        }
    }
    None
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn floor_tri() -> Triangle {
        // counter-clockwise seen from above → normal +Y
        Triangle::new(
            Vec3::new(-100.0, 0.0, -100.0),
            Vec3::new(-100.0, 0.0, 100.0),
            Vec3::new(100.0, 0.0, 0.0),
        )
    }

    #[test]
    fn aabb_expand_and_overlap() {
        let bb = Aabb::from_points([Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, -5.0)]);
        assert_eq!(bb.min, Vec3::new(-1.0, 0.0, -5.0));
        assert_eq!(bb.max, Vec3::new(3.0, 4.0, 2.0));

        let apart = Aabb {
            min: Vec3::new(4.0, 5.0, 3.0),
            max: Vec3::new(9.0, 9.0, 9.0),
        };
        assert!(!bb.overlaps(&apart));
        let touching = Aabb {
            min: Vec3::new(3.0, 4.0, 2.0),
            max: Vec3::new(9.0, 9.0, 9.0),
        };
        assert!(bb.overlaps(&touching));
    }

    #[test]
    fn octants_tile_the_parent() {
        let bb = Aabb {
            min: Vec3::ZERO,
            max: Vec3::splat(8.0),
        };
        let kids = bb.octants();
        for k in &kids {
            assert_eq!(k.size(), Vec3::splat(4.0));
        }
        assert_eq!(kids[0].min, Vec3::ZERO);
        assert_eq!(kids[7].max, Vec3::splat(8.0));
    }

    #[test]
    fn triangle_normal_points_up() {
        let n = floor_tri().normal();
        assert_abs_diff_eq!(n.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn segment_closest_point_clamps_to_ends() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(-5.0, 3.0, 0.0)), a);
        assert_eq!(closest_point_on_segment(a, b, Vec3::new(15.0, 3.0, 0.0)), b);
        assert_eq!(
            closest_point_on_segment(a, b, Vec3::new(4.0, 3.0, 0.0)),
            Vec3::new(4.0, 0.0, 0.0)
        );
    }

    #[test]
    fn capsule_sunk_into_floor_reports_face_contact() {
        // bottom sphere centre 2 units above the floor with radius 5 → depth 3
        let cap = Capsule {
            start: Vec3::new(0.0, 2.0, 0.0),
            end: Vec3::new(0.0, 20.0, 0.0),
            radius: 5.0,
        };
        let hit = triangle_capsule_contact(&floor_tri(), &cap).expect("contact");
        assert_abs_diff_eq!(hit.normal.y, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.depth, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn capsule_above_floor_misses() {
        let cap = Capsule {
            start: Vec3::new(0.0, 6.0, 0.0),
            end: Vec3::new(0.0, 20.0, 0.0),
            radius: 5.0,
        };
        assert!(triangle_capsule_contact(&floor_tri(), &cap).is_none());
    }

    #[test]
    fn capsule_grazing_edge_pushes_sideways() {
        // vertical wall triangle, normal +x, lower edge running along z at y=0
        let wall = Triangle::new(
            Vec3::new(0.0, 0.0, -50.0),
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(0.0, 0.0, 50.0),
        );
        // axis below the face, 3 on +x and 2 under the lower edge: the
        // closest feature is the edge point (0, 0, 0), distance √13 < 5
        let cap = Capsule {
            start: Vec3::new(3.0, -4.0, 0.0),
            end: Vec3::new(3.0, -2.0, 0.0),
            radius: 5.0,
        };
        let hit = triangle_capsule_contact(&wall, &cap).expect("contact");
        assert_abs_diff_eq!(hit.depth, 5.0 - 13.0_f32.sqrt(), epsilon = 1e-4);
        assert!(hit.normal.x > 0.0); // pushed away on +x, where the capsule is
    }

    #[test]
    fn capsule_crossing_wall_face_reports_face_normal() {
        let wall = Triangle::new(
            Vec3::new(0.0, 0.0, -50.0),
            Vec3::new(0.0, 100.0, 0.0),
            Vec3::new(0.0, 0.0, 50.0),
        );
        // axis straddles the face interior at x = 3 with radius 5
        let cap = Capsule {
            start: Vec3::new(3.0, 5.0, 0.0),
            end: Vec3::new(3.0, 20.0, 0.0),
            radius: 5.0,
        };
        let hit = triangle_capsule_contact(&wall, &cap).expect("contact");
        assert_abs_diff_eq!(hit.normal.x, 1.0, epsilon = 1e-5);
        assert_abs_diff_eq!(hit.depth, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn capsule_height_counts_both_caps() {
        let cap = Capsule::upright(180.0, 60.0);
        assert_abs_diff_eq!(cap.radius, 30.0);
        assert_abs_diff_eq!(cap.start.y, 30.0);
        assert_abs_diff_eq!(cap.end.y, 150.0);
        assert_abs_diff_eq!(cap.height(), 180.0);
    }
}
