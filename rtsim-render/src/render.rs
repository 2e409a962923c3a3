use ab_glyph::FontVec;
use anyhow::{Result, bail};
use rtsim_cache::intern_label;
use rtsim_core::{Aabb, Outcome, Screen};
use rtsim_timing::{HighPrecisionTimer, Timer};
use std::time::Duration;
use std::sync::Arc;
use tiny_skia::{Color, Paint, Pixmap, PixmapPaint, Rect, Transform};

use crate::text::TextCache;
use crate::widgets::Button;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];
const GRAY: [u8; 4] = [200, 200, 200, 255];
const GRAY_HOVER: [u8; 4] = [150, 150, 150, 255];

const TITLE_PX: f32 = 40.0;
const BODY_PX: f32 = 30.0;
const HINT_PX: f32 = 22.0;
const BUTTON_PX: f32 = 20.0;

const TITLE: &str = "Reaction Time Simulation";
const HINT: &str = "Press SPACE as soon as you see the opponent car drifting toward you!";
const MISSED: &str = "Collision happened! You did not react in time.";
const NO_RESULT: &str = "No valid reaction time recorded.";

/// Everything the renderer needs to know about one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub screen: Screen,
    pub player: Aabb,
    pub opponent: Aabb,
    pub outcome: Outcome,
    pub buttons: &'a [Button],
    /// Cursor in arena pixels, if it is over the window.
    pub cursor: Option<(f32, f32)>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub draw: Duration,
    pub copy: Duration,
    pub total: Duration,
}

pub struct SkiaRenderer {
    width: u32,
    height: u32,
    canvas: Pixmap,
    text: Option<TextCache>,
    /// Latest reaction-time line. It differs every trial, so it stays out of
    /// the label table and the text cache.
    measurement: Option<(Duration, Arc<Pixmap>)>,
    clock: HighPrecisionTimer,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32, font: Option<FontVec>) -> Result<Self> {
        let Some(canvas) = Pixmap::new(width, height) else {
            bail!("cannot create a {width}x{height} canvas");
        };
        Ok(Self {
            width,
            height,
            canvas,
            text: font.map(TextCache::new),
            measurement: None,
            clock: HighPrecisionTimer::new(),
        })
    }

    /// Draws `scene` and copies the result into an RGBA frame of the same size.
    pub fn render_frame(&mut self, scene: &Scene<'_>, frame: &mut [u8]) -> Result<FrameStats> {
        let expected = self.canvas.data().len();
        if frame.len() != expected {
            bail!(
                "frame buffer holds {} bytes, canvas needs {}",
                frame.len(),
                expected
            );
        }

        let start = self.clock.now();
        self.canvas.fill(color(WHITE));
        match scene.screen {
            Screen::Menu => self.draw_menu(scene),
            Screen::Simulation => self.draw_simulation(scene),
            Screen::Result => self.draw_result(scene),
        }
        let draw = self.clock.elapsed(start);

        let copy_start = self.clock.now();
        // opaque background, so premultiplied RGBA equals straight RGBA
        frame.copy_from_slice(self.canvas.data());
        let copy = self.clock.elapsed(copy_start);

        Ok(FrameStats {
            draw,
            copy,
            total: self.clock.elapsed(start),
        })
    }

    fn draw_menu(&mut self, scene: &Scene<'_>) {
        let (cx, cy) = self.center();
        self.draw_text_centered(TITLE, TITLE_PX, BLACK, cx, cy - 50.0);
        self.draw_buttons(scene);
    }

    fn draw_simulation(&mut self, scene: &Scene<'_>) {
        self.fill_rect(&scene.player, GREEN);
        self.fill_rect(&scene.opponent, RED);
        self.draw_text_at(HINT, HINT_PX, BLACK, 20.0, 20.0);
    }

    fn draw_result(&mut self, scene: &Scene<'_>) {
        let (cx, cy) = self.center();
        match scene.outcome {
            Outcome::Measured(rt) => self.draw_measurement(rt, cx, cy - 40.0),
            Outcome::MissedCollision => {
                self.draw_text_centered(MISSED, BODY_PX, RED, cx, cy - 40.0);
            }
            Outcome::Pending => {
                self.draw_text_centered(NO_RESULT, BODY_PX, RED, cx, cy - 40.0);
            }
        }
        self.draw_buttons(scene);
    }

    fn draw_measurement(&mut self, rt: Duration, x: f32, y: f32) {
        let Some(cache) = self.text.as_ref() else {
            return;
        };
        if self.measurement.as_ref().is_none_or(|(held, _)| *held != rt) {
            let msg = format!("Your reaction time: {:.3} seconds", rt.as_secs_f64());
            self.measurement = cache
                .render_uncached(&msg, BODY_PX, BLACK)
                .map(|pm| (rt, Arc::new(pm)));
        }
        if let Some((_, pm)) = self.measurement.clone() {
            let (w, h) = (pm.width() as f32, pm.height() as f32);
            self.blit(&pm, x - w / 2.0, y - h / 2.0);
        }
    }

    fn draw_buttons(&mut self, scene: &Scene<'_>) {
        for button in scene.buttons {
            let hovered = scene
                .cursor
                .is_some_and(|(x, y)| button.contains(x, y));
            self.fill_rect(&button.rect, if hovered { GRAY_HOVER } else { GRAY });
            let (bx, by) = button.rect.center();
            self.draw_label_centered(button.label_id, BUTTON_PX, BLACK, bx, by);
        }
    }

    fn fill_rect(&mut self, rect: &Aabb, rgba: [u8; 4]) {
        let Some(r) = Rect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.anti_alias = false;
        paint.set_color(color(rgba));
        self.canvas.fill_rect(r, &paint, Transform::identity(), None);
    }

    fn draw_text_centered(&mut self, text: &str, size_px: f32, rgba: [u8; 4], x: f32, y: f32) {
        if self.text.is_some() {
            self.draw_label_centered(intern_label(text), size_px, rgba, x, y);
        }
    }

    fn draw_text_at(&mut self, text: &str, size_px: f32, rgba: [u8; 4], x: f32, y: f32) {
        let Some(cache) = self.text.as_mut() else {
            return;
        };
        if let Some(pm) = cache.get_or_render(intern_label(text), size_px, rgba) {
            self.blit(&pm, x, y);
        }
    }

    fn draw_label_centered(&mut self, label_id: usize, size_px: f32, rgba: [u8; 4], x: f32, y: f32) {
        let Some(cache) = self.text.as_mut() else {
            return;
        };
        if let Some(pm) = cache.get_or_render(label_id, size_px, rgba) {
            let (w, h) = (pm.width() as f32, pm.height() as f32);
            self.blit(&pm, x - w / 2.0, y - h / 2.0);
        }
    }

    fn blit(&mut self, pm: &Pixmap, x: f32, y: f32) {
        self.canvas.draw_pixmap(
            x.round() as i32,
            y.round() as i32,
            pm.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    fn center(&self) -> (f32, f32) {
        ((self.width / 2) as f32, (self.height / 2) as f32)
    }
}

fn color(rgba: [u8; 4]) -> Color {
    Color::from_rgba8(rgba[0], rgba[1], rgba[2], rgba[3])
}
