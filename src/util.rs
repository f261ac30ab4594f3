use fxhash::FxHashMap;
use glam::Vec2;

/**
 * Hash map with a fast non-cryptographically secure hash function.
 */
pub type HashMap<K, V> = FxHashMap<K, V>;

/**
 * Hash map whose hash function is only suitable for small int types.
 * Outputs the original integer when used.
 */
pub type IntMap<K, V> = identity_hash::IntMap<K, V>;


/// Basic rectangle primitive.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Smallest rectangle containing every point.
    /// Zero-sized at the origin when points is empty.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let mut min = *first;
        let mut max = *first;
        for point in &points[1..] {
            min = min.min(*point);
            max = max.max(*point);
        }
        Self {
            origin: min,
            size: max - min,
        }
    }
}
