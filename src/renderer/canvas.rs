//! Canvas2D drawing of the raw cord (points and constraints)

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::layout::Viewport;
use crate::sim::Chain;

const CONSTRAINT_COLOR: &str = "#fe3a65";
const POINT_COLOR: &str = "#000000";

/// Full-viewport canvas the cord is drawn on
pub struct CordCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CordCanvas {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    pub fn resize(&self, viewport: Viewport) {
        self.canvas.set_width(viewport.width.max(1.0) as u32);
        self.canvas.set_height(viewport.height.max(1.0) as u32);
    }

    pub fn draw(&self, chain: &Chain) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, w, h);
        if !chain.is_visible() {
            return;
        }

        let points = chain.points();

        self.ctx.set_stroke_style_str(CONSTRAINT_COLOR);
        self.ctx.set_line_width(1.0);
        self.ctx.begin_path();
        for c in chain.constraints() {
            let (a, b) = (points[c.a].pos, points[c.b].pos);
            self.ctx.move_to(a.x as f64, a.y as f64);
            self.ctx.line_to(b.x as f64, b.y as f64);
        }
        self.ctx.stroke();

        self.ctx.set_fill_style_str(POINT_COLOR);
        for p in points {
            self.ctx.begin_path();
            let _ = self.ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                p.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            self.ctx.fill();
        }
    }
}
