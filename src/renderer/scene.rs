//! Retained draw list in logical world units
//!
//! Games paint into a `Scene`; a backend (the canvas executor on the web)
//! replays it after scaling logical units to device pixels. Keeping the
//! list as plain data lets tests assert on what a frame would draw.

use glam::Vec2;

/// 8-bit RGB with float alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    /// Opaque color from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a.max(0.0))
        }
    }
}

/// Fill style
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear {
        from: Vec2,
        to: Vec2,
        stops: Vec<(f32, Color)>,
    },
    Radial {
        inner: Vec2,
        inner_radius: f32,
        outer: Vec2,
        outer_radius: f32,
        stops: Vec<(f32, Color)>,
    },
}

impl Paint {
    /// Two-stop linear gradient
    pub fn linear(from: Vec2, to: Vec2, start: Color, end: Color) -> Self {
        Paint::Linear {
            from,
            to,
            stops: vec![(0.0, start), (1.0, end)],
        }
    }

    /// Top-to-bottom gradient over `[top, bottom]`
    pub fn vertical(top: f32, bottom: f32, start: Color, end: Color) -> Self {
        Self::linear(Vec2::new(0.0, top), Vec2::new(0.0, bottom), start, end)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

/// Single drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        paint: Paint,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        line_width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        paint: Paint,
    },
    FillEllipse {
        center: Vec2,
        radii: Vec2,
        paint: Paint,
    },
    /// Elliptical arc outline, angles in radians
    StrokeArc {
        center: Vec2,
        radii: Vec2,
        start: f32,
        end: f32,
        anticlockwise: bool,
        color: Color,
        line_width: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        line_width: f32,
    },
    /// Save state, then translate and rotate (radians)
    PushTransform { translate: Vec2, rotate: f32 },
    PopTransform,
}

/// Ordered draw list for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Logical width of the world being drawn
    pub width: f32,
    /// Logical height of the world being drawn
    pub height: f32,
    pub cmds: Vec<DrawCmd>,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            cmds: Vec::with_capacity(128),
        }
    }

    /// Drop all commands, keeping the allocation
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    /// Fill the whole world
    pub fn background(&mut self, paint: impl Into<Paint>) {
        self.fill_rect(0.0, 0.0, self.width, self.height, paint);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: impl Into<Paint>) {
        self.cmds.push(DrawCmd::FillRect {
            x,
            y,
            width,
            height,
            paint: paint.into(),
        });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color, line_width: f32) {
        self.cmds.push(DrawCmd::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        });
    }

    pub fn circle(&mut self, center: Vec2, radius: f32, paint: impl Into<Paint>) {
        self.cmds.push(DrawCmd::FillCircle {
            center,
            radius,
            paint: paint.into(),
        });
    }

    pub fn ellipse(&mut self, center: Vec2, radii: Vec2, paint: impl Into<Paint>) {
        self.cmds.push(DrawCmd::FillEllipse {
            center,
            radii,
            paint: paint.into(),
        });
    }

    pub fn arc(
        &mut self,
        center: Vec2,
        radii: Vec2,
        (start, end): (f32, f32),
        anticlockwise: bool,
        color: Color,
        line_width: f32,
    ) {
        self.cmds.push(DrawCmd::StrokeArc {
            center,
            radii,
            start,
            end,
            anticlockwise,
            color,
            line_width,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.cmds.push(DrawCmd::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    /// Draw `body` in a frame translated to `translate` and rotated by `rotate`
    pub fn with_transform(&mut self, translate: Vec2, rotate: f32, body: impl FnOnce(&mut Scene)) {
        self.cmds.push(DrawCmd::PushTransform { translate, rotate });
        body(self);
        self.cmds.push(DrawCmd::PopTransform);
    }
}
