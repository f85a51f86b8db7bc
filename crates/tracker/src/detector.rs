//! Face/eye geometry on top of an external feature locator.
//!
//! Locating faces and eyes is left to a [`FeatureLocator`] (a cascade
//! classifier, a neural model, ...). [`FeatureDetector`] turns the located
//! regions into a single normalized offset:
//!
//! 1. take the largest face (first one wins ties);
//! 2. with two or more eyes, use the midpoint of the two leftmost eye
//!    centers, otherwise the face center;
//! 3. normalize by half the frame width/height.
//!
//! All halving is integer (floor) division on pixel coordinates.

use gazetrack_common::error::GazeResult;
use gazetrack_gaze_model::{Direction, Frame};

use crate::Detector;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// Center with integer half-sizes.
    pub fn center(&self) -> (i64, i64) {
        (
            i64::from(self.x) + i64::from(self.width).div_euclid(2),
            i64::from(self.y) + i64::from(self.height).div_euclid(2),
        )
    }
}

/// Locates face and eye regions in a frame.
pub trait FeatureLocator: Send {
    /// Face rectangles in frame coordinates.
    fn locate_faces(&mut self, frame: &Frame) -> GazeResult<Vec<Rect>>;

    /// Eye rectangles relative to the face's top-left corner.
    fn locate_eyes(&mut self, frame: &Frame, face: &Rect) -> GazeResult<Vec<Rect>>;

    fn name(&self) -> &str;
}

/// [`Detector`] that derives the target offset from located features.
pub struct FeatureDetector<L> {
    locator: L,
}

impl<L: FeatureLocator> FeatureDetector<L> {
    pub fn new(locator: L) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }
}

impl<L: FeatureLocator> Detector for FeatureDetector<L> {
    fn detect(&mut self, frame: &Frame) -> GazeResult<Option<Direction>> {
        let faces = self.locator.locate_faces(frame)?;
        let Some(face) = largest(faces) else {
            return Ok(None);
        };

        let eyes = self.locator.locate_eyes(frame, &face)?;
        let (cx, cy) = eye_midpoint(&face, eyes).unwrap_or_else(|| face.center());

        Ok(Direction::from_pixel_offset(
            cx,
            cy,
            frame.width(),
            frame.height(),
        ))
    }

    fn name(&self) -> &str {
        self.locator.name()
    }
}

fn largest(faces: Vec<Rect>) -> Option<Rect> {
    faces
        .into_iter()
        .reduce(|best, face| if face.area() > best.area() { face } else { best })
}

/// Midpoint of the two leftmost eye centers, in frame coordinates.
fn eye_midpoint(face: &Rect, mut eyes: Vec<Rect>) -> Option<(i64, i64)> {
    if eyes.len() < 2 {
        return None;
    }
    eyes.sort_by_key(|eye| eye.x);
    let (lx, ly) = eyes[0].center();
    let (rx, ry) = eyes[1].center();
    Some((
        i64::from(face.x) + (lx + rx).div_euclid(2),
        i64::from(face.y) + (ly + ry).div_euclid(2),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLocator {
        faces: Vec<Rect>,
        eyes: Vec<Rect>,
        eye_queries: Vec<Rect>,
    }

    impl FixedLocator {
        fn new(faces: Vec<Rect>, eyes: Vec<Rect>) -> Self {
            Self {
                faces,
                eyes,
                eye_queries: Vec::new(),
            }
        }
    }

    impl FeatureLocator for FixedLocator {
        fn locate_faces(&mut self, _frame: &Frame) -> GazeResult<Vec<Rect>> {
            Ok(self.faces.clone())
        }

        fn locate_eyes(&mut self, _frame: &Frame, face: &Rect) -> GazeResult<Vec<Rect>> {
            self.eye_queries.push(*face);
            Ok(self.eyes.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn frame() -> Frame {
        Frame::blank(640, 480, 1)
    }

    #[test]
    fn test_no_face_is_no_target() {
        let mut detector = FeatureDetector::new(FixedLocator::new(vec![], vec![]));
        assert_eq!(detector.detect(&frame()).unwrap(), None);
        assert!(detector.locator().eye_queries.is_empty());
    }

    #[test]
    fn test_face_center_without_eyes() {
        // Face centered at (480, 120).
        let face = Rect::new(430, 70, 100, 100);
        let mut detector = FeatureDetector::new(FixedLocator::new(vec![face], vec![]));
        let d = detector.detect(&frame()).unwrap().unwrap();
        assert!((d.dx - 0.5).abs() < 1e-12);
        assert!((d.dy + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_single_eye_falls_back_to_face_center() {
        let face = Rect::new(270, 190, 100, 100);
        let eye = Rect::new(0, 0, 10, 10);
        let mut detector = FeatureDetector::new(FixedLocator::new(vec![face], vec![eye]));
        assert_eq!(
            detector.detect(&frame()).unwrap(),
            Some(Direction::CENTER)
        );
    }

    #[test]
    fn test_eye_pair_midpoint() {
        let face = Rect::new(100, 100, 200, 200);
        // Listed right-to-left; the two leftmost are used.
        let eyes = vec![
            Rect::new(150, 40, 20, 20),
            Rect::new(40, 40, 20, 20),
            Rect::new(120, 60, 20, 20),
        ];
        let mut detector = FeatureDetector::new(FixedLocator::new(vec![face], eyes));
        let d = detector.detect(&frame()).unwrap().unwrap();

        // Eye centers (50, 50) and (130, 70) → face-relative (90, 60) → frame (190, 160).
        let expected = Direction::from_pixel_offset(190, 160, 640, 480).unwrap();
        assert_eq!(d, expected);
    }

    #[test]
    fn test_largest_face_wins_first_on_ties() {
        let small = Rect::new(0, 0, 50, 50);
        let big_a = Rect::new(10, 10, 100, 100);
        let big_b = Rect::new(300, 300, 100, 100);
        let mut detector =
            FeatureDetector::new(FixedLocator::new(vec![small, big_a, big_b], vec![]));
        detector.detect(&frame()).unwrap();
        assert_eq!(detector.locator().eye_queries, vec![big_a]);
    }

    #[test]
    fn test_odd_sizes_floor() {
        assert_eq!(Rect::new(0, 0, 5, 7).center(), (2, 3));
        assert_eq!(Rect::new(-3, 0, 5, 1).center(), (-1, 0));
    }
}
