//! 2D canvas frontend and DOM HUD
//!
//! Draws a [`FrameView`] with `CanvasRenderingContext2d` and mirrors the
//! HUD scalars into the page's elements.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::fps::FpsCounter;
use crate::driver::{FrameView, Frontend};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase};

const BACKGROUND: &str = "#070b1a";
const BALL_COLOR: &str = "#f5f7ff";
const PULSE_COLOR: &str = "#ff375f";

fn css(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

pub struct CanvasFrontend {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    document: Document,
    settings: Settings,
    dpr: f64,
    /// Frames rendered, drives the invulnerability flicker
    frames: u64,
    fps: FpsCounter,
}

impl CanvasFrontend {
    pub fn new(canvas: HtmlCanvasElement, document: Document, settings: Settings) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            ctx,
            document,
            settings,
            dpr: 1.0,
            frames: 0,
            fps: FpsCounter::new(),
        })
    }

    /// Size the backing store for the canvas's CSS size; returns the CSS size
    pub fn fit(&mut self, device_pixel_ratio: f64) -> (f32, f32) {
        self.dpr = device_pixel_ratio.max(1.0);
        let width = self.canvas.client_width().max(1) as f64;
        let height = self.canvas.client_height().max(1) as f64;
        self.canvas.set_width((width * self.dpr) as u32);
        self.canvas.set_height((height * self.dpr) as u32);
        let _ = self.ctx.set_transform(self.dpr, 0.0, 0.0, self.dpr, 0.0, 0.0);
        (width as f32, height as f32)
    }

    /// Show or hide the FPS readout and remember the choice
    pub fn toggle_fps(&mut self) {
        let on = self.settings.toggle_fps();
        self.settings.save();
        self.fps.reset();
        self.set_class("fpsDisplay", "hidden", !on);
        log::info!("FPS readout {}", if on { "on" } else { "off" });
    }

    fn set_text(&self, id: &str, text: &str) {
        if let Some(el) = self.document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(&self, id: &str, class: &str, on: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let list = el.class_list();
            let _ = if on { list.add_1(class) } else { list.remove_1(class) };
        }
    }

    fn circle(&self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(x as f64, y as f64, radius.max(0.0) as f64, 0.0, TAU);
        self.ctx.fill();
    }

    fn draw_world(&self, view: &FrameView<'_>) {
        let ctx = &self.ctx;
        let w = view.field.width as f64;
        let h = view.field.height as f64;

        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        ctx.set_fill_style_str("#ffffff");
        for star in view.stars {
            ctx.set_global_alpha(star.alpha as f64);
            ctx.fill_rect(star.pos.x as f64, star.pos.y as f64, star.size as f64, star.size as f64);
        }
        ctx.set_global_alpha(1.0);

        for obstacle in view.obstacles {
            ctx.set_fill_style_str(&css(obstacle.color));
            let x = obstacle.x as f64;
            let width = obstacle.width as f64;
            ctx.fill_rect(x, 0.0, width, obstacle.gap_top().max(0.0) as f64);
            let bottom = obstacle.gap_bottom() as f64;
            ctx.fill_rect(x, bottom, width, (h - bottom).max(0.0));

            if let Some(pulse) = &obstacle.pulse {
                ctx.set_fill_style_str(PULSE_COLOR);
                self.circle(pulse.pos.x, pulse.pos.y, pulse.radius);
            }
        }

        for shard in view.shards {
            ctx.save();
            let _ = ctx.translate(shard.pos.x as f64, shard.pos.y as f64);
            let _ = ctx.rotate(shard.rotation as f64);
            ctx.set_fill_style_str(&css(shard.color));
            let s = shard.size as f64;
            ctx.fill_rect(-s, -s, s * 2.0, s * 2.0);
            ctx.restore();
        }

        for particle in view.particles {
            ctx.set_global_alpha(particle.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(&css(particle.color));
            self.circle(particle.pos.x, particle.pos.y, particle.size);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_ball(&self, view: &FrameView<'_>) {
        let ball = view.ball;
        let ctx = &self.ctx;

        let available = ball.trail.len();
        let shown = self.settings.trail_points(available);
        ctx.set_fill_style_str(BALL_COLOR);
        for (i, point) in ball.trail.iter().enumerate().skip(available - shown) {
            let t = (i + 1) as f32 / (available + 1) as f32;
            ctx.set_global_alpha((t * 0.4) as f64);
            self.circle(point.x, point.y, ball.radius * t);
        }
        ctx.set_global_alpha(1.0);

        let flicker = view.invulnerable && self.settings.effective_flicker() && (self.frames / 4) % 2 == 1;
        if view.phase != GamePhase::GameOver && !flicker {
            self.circle(ball.pos.x, ball.pos.y, ball.radius);
        }
    }

    fn update_hud(&self, view: &FrameView<'_>) {
        self.set_text("scoreValue", &view.score.to_string());
        self.set_text("comboValue", &format!("x{}", view.combo));
        self.set_text("bestScoreValue", &view.best_score.to_string());
        self.set_text("speedValue", &format!("{:.1}x", view.speed_multiplier));
        self.set_text(
            "stabilityValue",
            &format!("{}/{}", view.stability, view.max_stability),
        );
        self.set_class("fpsDisplay", "hidden", !self.settings.show_fps);
        self.set_class("startScreen", "hidden", view.phase != GamePhase::Start);
        self.set_class("gameOverScreen", "hidden", view.phase != GamePhase::GameOver);
    }
}

impl Frontend for CanvasFrontend {
    fn render(&mut self, view: &FrameView<'_>) {
        self.frames = self.frames.wrapping_add(1);
        if self.settings.show_fps {
            if let Some(fps) = self.fps.record(view.now_ms) {
                self.set_text("fpsValue", &fps.to_string());
            }
        }
        self.draw_world(view);
        self.draw_ball(view);
        self.update_hud(view);
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::StreakBanner { text, .. } => {
                self.set_text("streakBanner", text);
                self.set_class("streakBanner", "show", true);
            }
            GameEvent::BannerCleared => self.set_class("streakBanner", "show", false),
            GameEvent::PhaseChanged(GamePhase::Playing) => {
                // The loop was idle before this round
                self.fps.reset();
                self.set_class("gameContainer", "shake", false);
                self.set_class("streakBanner", "show", false);
            }
            GameEvent::PhaseChanged(GamePhase::Ending) => {
                if self.settings.effective_screen_shake() {
                    self.set_class("gameContainer", "shake", true);
                }
            }
            GameEvent::GameOver {
                final_score,
                best_score,
            } => {
                self.set_class("gameContainer", "shake", false);
                self.set_text("finalScore", &final_score.to_string());
                self.set_text("finalBestScore", &best_score.to_string());
            }
            _ => {}
        }
    }
}
