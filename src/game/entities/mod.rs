// src/game/entities/mod.rs
pub mod enemy;
pub mod player;

use nalgebra as na;

use crate::engine::graphics::FrameBatch;

// An axis-aligned rectangle in screen space. The origin is the top-left
// corner of the window; x grows to the right and y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub position: na::Vector2<f32>,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self {
            position: na::Vector2::new(x, y),
            width,
            height,
        }
    }

    // Two rectangles overlap when they are not separated on either axis.
    // The comparisons are deliberately strict: rectangles whose edges touch
    // exactly still count as overlapping.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.position.y > other.position.y + other.height {
            return false;
        }
        if self.position.y + self.height < other.position.y {
            return false;
        }
        if self.position.x > other.position.x + other.width {
            return false;
        }
        if self.position.x + self.width < other.position.x {
            return false;
        }
        true
    }
}

// A drawable, positioned rectangle in the scene. The texture itself lives in
// the renderer's texture table; the entity only carries the key, so entities
// can be built and moved around without a GPU device (the tests rely on
// this).
#[derive(Debug, Clone)]
pub struct Entity {
    pub rect: Rect,
    pub texture_id: &'static str,
}

impl Entity {
    pub fn new(texture_id: &'static str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            texture_id,
        }
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        self.rect.overlaps(&other.rect)
    }

    // Queue this entity's sprite for the current frame.
    pub fn push_sprite(&self, batch: &mut FrameBatch) {
        batch.push_sprite(
            self.texture_id,
            self.rect.position.x,
            self.rect.position.y,
            self.rect.width,
            self.rect.height,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn separated_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right_of = Rect::new(30.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 25.0, 10.0, 10.0);
        assert!(!a.overlaps(&right_of));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn overlapping_rects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    // The comparisons are strict, so rectangles that touch exactly on an
    // edge are NOT separated and the test reports a collision. This matches
    // the shipped behavior of the movement/collision loop.
    #[test]
    fn edge_touching_rects_count_as_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));

        let just_apart = Rect::new(10.001, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&just_apart));
    }

    #[test]
    fn contained_rect_overlaps() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            0.1f32..500.0,
            0.1f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn horizontally_disjoint_rects_never_overlap(
            a in arb_rect(),
            gap in 0.001f32..100.0,
            h in 0.1f32..500.0,
        ) {
            let b = Rect::new(a.position.x + a.width + gap, a.position.y, 10.0, h);
            prop_assert!(!a.overlaps(&b));
        }

        #[test]
        fn vertically_disjoint_rects_never_overlap(
            a in arb_rect(),
            gap in 0.001f32..100.0,
            w in 0.1f32..500.0,
        ) {
            let b = Rect::new(a.position.x, a.position.y + a.height + gap, w, 10.0);
            prop_assert!(!a.overlaps(&b));
        }

        #[test]
        fn rect_overlaps_itself(a in arb_rect()) {
            prop_assert!(a.overlaps(&a));
        }
    }
}
