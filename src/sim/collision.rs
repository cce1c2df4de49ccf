//! Collision detection between the ball and axis-aligned rectangles
//!
//! The resolver answers one question: which side(s) of a rectangle is the
//! ball striking right now? Each side is a half-plane test gated by the
//! direction of travel, so a ball that already bounced (and is still
//! overlapping) is never resolved twice.

use glam::Vec2;
use std::fmt;

/// A side of an axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Top,
    Right,
    Bottom,
    Left,
}

impl Face {
    pub const ALL: [Face; 4] = [Face::Top, Face::Right, Face::Bottom, Face::Left];

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Face::Top => 1,
            Face::Right => 1 << 1,
            Face::Bottom => 1 << 2,
            Face::Left => 1 << 3,
        }
    }
}

/// Set of struck faces (zero, one or two members in practice)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceSet(u8);

impl FaceSet {
    pub const EMPTY: FaceSet = FaceSet(0);

    pub fn insert(&mut self, face: Face) {
        self.0 |= face.bit();
    }

    pub fn with(mut self, face: Face) -> Self {
        self.insert(face);
        self
    }

    pub fn contains(self, face: Face) -> bool {
        self.0 & face.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Left or Right struck
    pub fn hits_horizontal(self) -> bool {
        self.contains(Face::Left) || self.contains(Face::Right)
    }

    /// Top or Bottom struck
    pub fn hits_vertical(self) -> bool {
        self.contains(Face::Top) || self.contains(Face::Bottom)
    }

    pub fn iter(self) -> impl Iterator<Item = Face> {
        Face::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl From<Face> for FaceSet {
    fn from(face: Face) -> Self {
        FaceSet::EMPTY.with(face)
    }
}

impl FromIterator<Face> for FaceSet {
    fn from_iter<I: IntoIterator<Item = Face>>(iter: I) -> Self {
        iter.into_iter().fold(FaceSet::EMPTY, FaceSet::with)
    }
}

impl fmt::Debug for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Determine which faces of `rect` a moving ball strikes
///
/// A face is only reportable when the ball travels toward it: Left needs
/// `vel.x > 0`, Right needs `vel.x < 0`, Top needs `vel.y > 0`, Bottom needs
/// `vel.y < 0`. The rectangle's extent along the other axis is inflated by
/// `radius / sqrt(2)` so diagonal approaches near a corner still register on
/// the nearer face(s).
///
/// Left/Right is an either/or pair tested left first, Top/Bottom likewise
/// tested top first. One face from each pair may fire together (corner hit).
/// All comparisons are strict: a ball exactly touching an edge is not a hit.
pub fn ball_rect_faces(pos: Vec2, vel: Vec2, radius: f32, rect: &Rect) -> FaceSet {
    let mut faces = FaceSet::EMPTY;
    let margin = radius / std::f32::consts::SQRT_2;

    let in_vertical_band = pos.y > rect.y - margin && pos.y < rect.bottom() + margin;
    let in_horizontal_band = pos.x > rect.x - margin && pos.x < rect.right() + margin;

    if vel.x > 0.0 && pos.x + radius > rect.x && pos.x < rect.x && in_vertical_band {
        faces.insert(Face::Left);
    } else if vel.x < 0.0
        && pos.x > rect.right()
        && pos.x < rect.right() + radius
        && in_vertical_band
    {
        faces.insert(Face::Right);
    }

    if vel.y > 0.0 && pos.y + radius > rect.y && pos.y < rect.y && in_horizontal_band {
        faces.insert(Face::Top);
    } else if vel.y < 0.0
        && pos.y > rect.bottom()
        && pos.y < rect.bottom() + radius
        && in_horizontal_band
    {
        faces.insert(Face::Bottom);
    }

    faces
}
