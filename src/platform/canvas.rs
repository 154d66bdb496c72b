//! Canvas 2D backend for `Scene` draw lists

use wasm_bindgen::JsCast;
use web_sys::{CanvasGradient, CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::ArcadeError;
use crate::renderer::{Color, DrawCmd, Paint, Scene, Viewport};

/// A canvas, its 2D context and the viewport it was last fitted to
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
    max_ratio: f64,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, max_ratio: f64) -> Result<Self, ArcadeError> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(ArcadeError::MissingElement("2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ArcadeError::MissingElement("2d context"))?;
        let viewport = Viewport::fit(
            canvas.width() as f64,
            canvas.height() as f64,
            1.0,
            max_ratio,
        );
        Ok(Self {
            canvas,
            ctx,
            viewport,
            max_ratio,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Refit the backing store to the canvas's CSS box. Returns true if the
    /// backing store changed size.
    pub fn resize(&mut self, device_ratio: f64) -> bool {
        let rect = self.canvas.get_bounding_client_rect();
        let viewport = Viewport::fit(rect.width(), rect.height(), device_ratio, self.max_ratio);
        let changed = viewport.differs_from(self.canvas.width(), self.canvas.height());
        if changed {
            self.canvas.set_width(viewport.backing_width);
            self.canvas.set_height(viewport.backing_height);
            log::debug!(
                "Canvas resized to {}x{} (ratio {})",
                viewport.backing_width,
                viewport.backing_height,
                viewport.pixel_ratio
            );
        }
        self.viewport = viewport;
        changed
    }

    /// World x under a pointer at `client_x`
    pub fn world_x(&self, client_x: f64, world_width: f32) -> f32 {
        let rect = self.canvas.get_bounding_client_rect();
        self.viewport.to_world_x(client_x - rect.left(), world_width)
    }

    /// Reset, clear and replay `scene` scaled onto the backing store
    pub fn draw(&self, scene: &Scene) -> Result<(), ArcadeError> {
        let ctx = &self.ctx;
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        ctx.clear_rect(
            0.0,
            0.0,
            self.viewport.backing_width as f64,
            self.viewport.backing_height as f64,
        );
        let (sx, sy) = self.viewport.scale(scene.width, scene.height);
        ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0)?;
        ctx.set_line_cap("round");

        for cmd in &scene.cmds {
            self.exec(cmd)?;
        }
        Ok(())
    }

    fn gradient(&self, paint: &Paint) -> Result<Option<CanvasGradient>, ArcadeError> {
        let (gradient, stops) = match paint {
            Paint::Solid(_) => return Ok(None),
            Paint::Linear { from, to, stops } => (
                self.ctx.create_linear_gradient(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                ),
                stops,
            ),
            Paint::Radial {
                inner,
                inner_radius,
                outer,
                outer_radius,
                stops,
            } => (
                self.ctx.create_radial_gradient(
                    inner.x as f64,
                    inner.y as f64,
                    inner_radius.max(0.0) as f64,
                    outer.x as f64,
                    outer.y as f64,
                    outer_radius.max(0.0) as f64,
                )?,
                stops,
            ),
        };
        for (offset, color) in stops {
            gradient.add_color_stop(offset.clamp(0.0, 1.0), &color.to_css())?;
        }
        Ok(Some(gradient))
    }

    fn set_fill(&self, paint: &Paint) -> Result<(), ArcadeError> {
        match (paint, self.gradient(paint)?) {
            (_, Some(gradient)) => self.ctx.set_fill_style_canvas_gradient(&gradient),
            (Paint::Solid(color), None) => self.ctx.set_fill_style_str(&color.to_css()),
            _ => {}
        }
        Ok(())
    }

    fn set_stroke(&self, color: &Color, line_width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
    }

    fn exec(&self, cmd: &DrawCmd) -> Result<(), ArcadeError> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::FillRect {
                x,
                y,
                width,
                height,
                paint,
            } => {
                self.set_fill(paint)?;
                ctx.fill_rect(*x as f64, *y as f64, *width as f64, *height as f64);
            }
            DrawCmd::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                self.set_stroke(color, *line_width);
                ctx.stroke_rect(*x as f64, *y as f64, *width as f64, *height as f64);
            }
            DrawCmd::FillCircle {
                center,
                radius,
                paint,
            } => {
                self.set_fill(paint)?;
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
            }
            DrawCmd::FillEllipse {
                center,
                radii,
                paint,
            } => {
                self.set_fill(paint)?;
                ctx.begin_path();
                ctx.ellipse(
                    center.x as f64,
                    center.y as f64,
                    radii.x.max(0.0) as f64,
                    radii.y.max(0.0) as f64,
                    0.0,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
            }
            DrawCmd::StrokeArc {
                center,
                radii,
                start,
                end,
                anticlockwise,
                color,
                line_width,
            } => {
                self.set_stroke(color, *line_width);
                ctx.begin_path();
                ctx.ellipse_with_anticlockwise(
                    center.x as f64,
                    center.y as f64,
                    radii.x.max(0.0) as f64,
                    radii.y.max(0.0) as f64,
                    0.0,
                    *start as f64,
                    *end as f64,
                    *anticlockwise,
                )?;
                ctx.stroke();
            }
            DrawCmd::Line {
                from,
                to,
                color,
                line_width,
            } => {
                self.set_stroke(color, *line_width);
                ctx.begin_path();
                ctx.move_to(from.x as f64, from.y as f64);
                ctx.line_to(to.x as f64, to.y as f64);
                ctx.stroke();
            }
            DrawCmd::PushTransform { translate, rotate } => {
                ctx.save();
                ctx.translate(translate.x as f64, translate.y as f64)?;
                ctx.rotate(*rotate as f64)?;
            }
            DrawCmd::PopTransform => ctx.restore(),
        }
        Ok(())
    }
}
