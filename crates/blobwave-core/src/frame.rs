//! Per-frame output handed to the renderer.
//!
//! Everything here is a snapshot: valid for the frame it was produced in and
//! meant to be consumed immediately.

use crate::path::Path;
use crate::state::{Color, Gradient, VisualState};
use glam::{Affine2, Vec2};
use smallvec::SmallVec;

/// Which layer of the composite a pass draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    Previous,
    Current,
    Removal,
}

/// Fill source for one pass: a gradient placed by `transform`, optionally
/// tinted by a flat color for hosts that draw the removal pass without a shader.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub gradient: Option<Gradient>,
    pub transform: Affine2,
    pub color: Option<Color>,
}

impl Paint {
    /// Paint for a state that has produced its gradient, `None` otherwise.
    pub fn from_state(state: &VisualState) -> Option<Self> {
        state.gradient().map(|g| Paint {
            gradient: Some(g.clone()),
            transform: state.matrix(),
            color: None,
        })
    }

    pub fn uniforms(&self, alpha: f32) -> GradientUniforms {
        GradientUniforms::new(&self.transform, alpha)
    }
}

/// GPU-ready record for binding a pass's gradient transform.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GradientUniforms {
    /// Column-major 2x3 affine: x axis, y axis, translation.
    pub matrix: [f32; 6],
    pub alpha: f32,
    pub _pad: f32,
}

impl GradientUniforms {
    pub fn new(transform: &Affine2, alpha: f32) -> Self {
        Self {
            matrix: transform.to_cols_array(),
            alpha: alpha.clamp(0.0, 1.0),
            _pad: 0.0,
        }
    }
}

/// One ring outline plus the scale it is drawn at.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveShape {
    pub path: Path,
    pub scale: f32,
    /// Scale about the surface center, ready to concatenate onto the canvas.
    pub transform: Affine2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleDraw {
    pub center: Vec2,
    pub radius: f32,
    pub scale: f32,
    pub alpha: f32,
}

/// A blob surface pass: bind `paint`, draw every wave at `wave_alpha`, then
/// the center circle if present.
#[derive(Clone, Debug, PartialEq)]
pub struct BlobPass {
    pub kind: PassKind,
    pub paint: Paint,
    pub wave_alpha: f32,
    pub circle: Option<CircleDraw>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlobFrame {
    pub dt: f32,
    pub amplitude: f32,
    pub center: Vec2,
    /// Empty while waves are hidden.
    pub waves: Vec<WaveShape>,
    pub passes: SmallVec<[BlobPass; 3]>,
    /// The host should schedule another frame.
    pub needs_redraw: bool,
}

impl BlobFrame {
    pub fn pass(&self, kind: PassKind) -> Option<&BlobPass> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}

/// A line surface pass: bind `paint`, draw the background waves at
/// `wave_alpha` and the main wave at `main_wave_alpha`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePass {
    pub kind: PassKind,
    pub paint: Paint,
    pub wave_alpha: f32,
    pub main_wave_alpha: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineFrame {
    pub dt: f32,
    pub amplitude: f32,
    pub waves: Vec<Path>,
    pub main_wave: Option<Path>,
    pub passes: SmallVec<[LinePass; 2]>,
    pub needs_redraw: bool,
}

impl LineFrame {
    pub fn pass(&self, kind: PassKind) -> Option<&LinePass> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}
