use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in arena pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Same rectangle moved to a new left edge.
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    /// True only for a strictly positive overlap area. Rectangles that merely
    /// share an edge do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Strict interior test, boundary points are outside.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        self.x < px && px < self.right() && self.y < py && py < self.bottom()
    }

    pub fn fits_within(&self, width: f32, height: f32) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER: Aabb = Aabb::new(200.0, 260.0, 50.0, 80.0);

    #[test]
    fn shared_edge_is_not_an_overlap() {
        let touching = PLAYER.with_x(250.0);
        assert!(!PLAYER.overlaps(&touching));
        assert!(!touching.overlaps(&PLAYER));
    }

    #[test]
    fn one_pixel_of_penetration_overlaps() {
        let inside = PLAYER.with_x(249.0);
        assert!(PLAYER.overlaps(&inside));
        assert!(inside.overlaps(&PLAYER));
    }

    #[test]
    fn vertical_separation_prevents_overlap() {
        let above = Aabb::new(210.0, 180.0, 50.0, 80.0);
        assert!(!PLAYER.overlaps(&above));
        let lower = Aabb { y: 181.0, ..above };
        assert!(PLAYER.overlaps(&lower));
    }

    #[test]
    fn contains_excludes_the_border() {
        let button = Aabb::new(300.0, 300.0, 200.0, 50.0);
        assert!(button.contains(400.0, 325.0));
        assert!(!button.contains(300.0, 325.0));
        assert!(!button.contains(500.0, 325.0));
        assert!(!button.contains(400.0, 350.0));
    }

    #[test]
    fn fits_within_arena() {
        assert!(PLAYER.fits_within(800.0, 600.0));
        assert!(!PLAYER.with_x(780.0).fits_within(800.0, 600.0));
    }
}
