//! Exact overlap tests and contact generation between pairs of world shapes.

use super::shape::WorldShape;
use crate::math::{Aabb, Unit, Vec2};

/// An intersection between two shapes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// The normal, facing away from the first shape towards the second.
    pub normal: Unit<Vec2>,
    /// How far the shapes overlap along the normal.
    pub depth: f64,
}

impl Contact {
    fn flipped(self) -> Self {
        Contact {
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// Checks two shapes for overlap. Touching counts as overlapping.
pub fn intersects(a: &WorldShape, b: &WorldShape) -> bool {
    use WorldShape::*;
    match (*a, *b) {
        (Rect(a), Rect(b)) => a.overlaps(&b),
        (
            Circle {
                center: c1,
                radius: r1,
            },
            Circle {
                center: c2,
                radius: r2,
            },
        ) => {
            let r_sum = r1 + r2;
            (c2 - c1).mag_sq() <= r_sum * r_sum
        }
        (Rect(aabb), Circle { center, radius }) | (Circle { center, radius }, Rect(aabb)) => {
            (center - aabb.closest_point(center)).mag_sq() <= radius * radius
        }
    }
}

/// Computes the contact between two shapes, if they overlap.
pub fn contact(a: &WorldShape, b: &WorldShape) -> Option<Contact> {
    use WorldShape::*;
    match (*a, *b) {
        (Rect(a), Rect(b)) => rect_rect(&a, &b),
        (
            Circle {
                center: c1,
                radius: r1,
            },
            Circle {
                center: c2,
                radius: r2,
            },
        ) => circle_circle(c1, r1, c2, r2),
        (Rect(aabb), Circle { center, radius }) => rect_circle(&aabb, center, radius),
        (Circle { center, radius }, Rect(aabb)) => {
            rect_circle(&aabb, center, radius).map(Contact::flipped)
        }
    }
}

//
// RECT <-> RECT
//

fn rect_rect(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if !a.overlaps(b) {
        return None;
    }
    let overlap_x = (a.right - b.left).min(b.right - a.left);
    let overlap_y = (a.bottom - b.top).min(b.bottom - a.top);
    let dist = b.center() - a.center();

    // separate along whichever axis needs the least movement
    let sign = |d: f64| if d < 0.0 { -1.0 } else { 1.0 };
    let (normal, depth) = if overlap_x <= overlap_y {
        (Vec2::new(sign(dist.x), 0.0), overlap_x)
    } else {
        (Vec2::new(0.0, sign(dist.y)), overlap_y)
    };

    Some(Contact {
        normal: Unit::new_unchecked(normal),
        depth,
    })
}

//
// CIRCLE <-> CIRCLE
//

fn circle_circle(c1: Vec2, r1: f64, c2: Vec2, r2: f64) -> Option<Contact> {
    let dist = c2 - c1;
    let dist_sq = dist.mag_sq();
    let r_sum = r1 + r2;
    if dist_sq > r_sum * r_sum {
        return None;
    }

    let dist_mag = dist_sq.sqrt();
    let normal = if dist_mag > 0.0 {
        Unit::new_unchecked(dist / dist_mag)
    } else {
        // same position, consider penetration to be on x axis
        Unit::unit_x()
    };

    Some(Contact {
        normal,
        depth: r_sum - dist_mag,
    })
}

//
// RECT <-> CIRCLE
//

fn rect_circle(aabb: &Aabb, center: Vec2, radius: f64) -> Option<Contact> {
    if aabb.contains(center) {
        // no meaningful closest point, push out from the box center instead
        return Some(Contact {
            normal: Unit::new_normalize(center - aabb.center()),
            depth: radius,
        });
    }

    let closest = aabb.closest_point(center);
    let dist = center - closest;
    let dist_sq = dist.mag_sq();
    if dist_sq > radius * radius {
        return None;
    }

    let dist_mag = dist_sq.sqrt();
    let normal = if dist_mag > 0.0 {
        Unit::new_unchecked(dist / dist_mag)
    } else {
        Unit::unit_x()
    };
    Some(Contact {
        normal,
        depth: radius - dist_mag,
    })
}
