use crate::geometry::Point;

/// One completed pointer-down to pointer-up gesture.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    points: Vec<Point>,
    color: String,
}

impl Stroke {
    pub fn new(points: Vec<Point>, color: impl Into<String>) -> Self {
        Self {
            points,
            color: color.into(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// A stroke needs two points to lay down a segment.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// Completed strokes in the order they were drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StrokeHistory {
    strokes: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn pop(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn last(&self) -> Option<&Stroke> {
        self.strokes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    /// Total point count across all strokes; the cost of one replay.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }
}

impl<'a> IntoIterator for &'a StrokeHistory {
    type Item = &'a Stroke;
    type IntoIter = std::slice::Iter<'a, Stroke>;

    fn into_iter(self) -> Self::IntoIter {
        self.strokes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(n: usize, color: &str) -> Stroke {
        let points = (0..n).map(|i| Point::new(i as f64, i as f64)).collect();
        Stroke::new(points, color)
    }

    #[test]
    fn history_keeps_insertion_order() {
        let mut h = StrokeHistory::new();
        h.push(stroke(2, "#000000"));
        h.push(stroke(3, "#ffffff"));
        let colors: Vec<_> = h.iter().map(|s| s.color()).collect();
        assert_eq!(colors, ["#000000", "#ffffff"]);
        assert_eq!(h.point_count(), 5);
        assert_eq!(h.last().map(|s| s.points().len()), Some(3));
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut h = StrokeHistory::new();
        assert!(h.pop().is_none());
        h.push(stroke(2, "#000"));
        assert!(h.pop().is_some());
        assert!(h.is_empty());
    }

    #[test]
    fn single_point_is_not_drawable() {
        assert!(!stroke(1, "#000").is_drawable());
        assert!(stroke(2, "#000").is_drawable());
    }
}
