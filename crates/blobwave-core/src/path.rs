//! Renderer-facing path description.
//!
//! Oscillators emit their outline as an ordered list of commands in surface
//! coordinates. The host strokes or fills it with whatever paint it binds for
//! the current pass; nothing here depends on a particular canvas API.

use glam::{Affine2, Vec2};
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    CubicTo { c1: Vec2, c2: Vec2, to: Vec2 },
}

impl PathCommand {
    /// Point the pen rests on after this command.
    pub fn end_point(&self) -> Vec2 {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p,
            PathCommand::CubicTo { to, .. } => to,
        }
    }

    fn transformed(&self, m: &Affine2) -> Self {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(m.transform_point2(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(m.transform_point2(p)),
            PathCommand::CubicTo { c1, c2, to } => PathCommand::CubicTo {
                c1: m.transform_point2(c1),
                c2: m.transform_point2(c2),
                to: m.transform_point2(to),
            },
        }
    }
}

/// Ordered command list for one shape. Valid only for the frame it was built in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Clear commands while keeping the allocation for the next frame.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    pub fn move_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    pub fn line_to(&mut self, p: Vec2) {
        self.commands.push(PathCommand::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: Vec2, c2: Vec2, to: Vec2) {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn first_point(&self) -> Option<Vec2> {
        self.commands.first().map(PathCommand::end_point)
    }

    pub fn last_point(&self) -> Option<Vec2> {
        self.commands.last().map(PathCommand::end_point)
    }

    /// True when the pen ends where it started (within `tolerance`).
    pub fn is_closed(&self, tolerance: f32) -> bool {
        match (self.first_point(), self.last_point()) {
            (Some(a), Some(b)) if self.commands.len() > 1 => a.distance(b) <= tolerance,
            _ => false,
        }
    }

    pub fn cubic_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::CubicTo { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::LineTo(_)))
            .count()
    }

    /// Copy of this path with every coordinate mapped through `m`, for hosts
    /// that cannot apply a canvas transform themselves.
    pub fn transformed(&self, m: &Affine2) -> Path {
        Path {
            commands: self.commands.iter().map(|c| c.transformed(m)).collect(),
        }
    }

    /// SVG `d` attribute for this path.
    pub fn to_svg_data(&self) -> String {
        let mut out = String::with_capacity(self.commands.len() * 24);
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = match *cmd {
                PathCommand::MoveTo(p) => write!(out, "M{:.2},{:.2}", p.x, p.y),
                PathCommand::LineTo(p) => write!(out, "L{:.2},{:.2}", p.x, p.y),
                PathCommand::CubicTo { c1, c2, to } => write!(
                    out,
                    "C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
                    c1.x, c1.y, c2.x, c2.y, to.x, to.y
                ),
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_data_lists_commands_in_order() {
        let mut p = Path::new();
        p.move_to(Vec2::new(0.0, 0.0));
        p.line_to(Vec2::new(10.0, 0.0));
        p.cubic_to(Vec2::new(12.0, 1.0), Vec2::new(13.0, 2.0), Vec2::new(14.0, 3.0));
        assert_eq!(
            p.to_svg_data(),
            "M0.00,0.00 L10.00,0.00 C12.00,1.00 13.00,2.00 14.00,3.00"
        );
        assert_eq!(p.cubic_count(), 1);
        assert_eq!(p.line_count(), 1);
    }

    #[test]
    fn single_command_is_not_closed() {
        let mut p = Path::new();
        p.move_to(Vec2::ZERO);
        assert!(!p.is_closed(1e-3));
    }

    #[test]
    fn transform_scales_about_a_pivot() {
        let mut p = Path::new();
        p.move_to(Vec2::new(110.0, 100.0));
        let pivot = Vec2::new(100.0, 100.0);
        let m = Affine2::from_translation(pivot)
            * Affine2::from_scale(Vec2::splat(2.0))
            * Affine2::from_translation(-pivot);
        let q = p.transformed(&m);
        assert!(q.first_point().unwrap().distance(Vec2::new(120.0, 100.0)) < 1e-4);
    }
}
