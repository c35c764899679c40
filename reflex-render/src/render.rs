use anyhow::{Result, anyhow, bail};
use reflex_timing::Clock;
use std::time::Duration;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

use crate::scene::{
    BUTTON, BUTTON_DIM, DESTRUCTIVE, MAX_TALLY, PANEL, READOUT, Scene,
};

const BUTTON_HEIGHT: f32 = 56.0;
const BUTTON_GAP: f32 = 24.0;
const TALLY_SIZE: f32 = 8.0;
const TALLY_GAP: f32 = 4.0;
const PANEL_HEIGHT: f32 = 160.0;
const PANEL_INSET: f32 = 24.0;

pub struct RenderStats {
    pub draw: Duration,
    pub copy: Duration,
    /// False when the scene was unchanged and the canvas was reused.
    pub redrawn: bool,
}

/// Rasterizes [`Scene`]s into an RGBA8 frame buffer
pub struct SkiaRenderer {
    width: u32,
    height: u32,
    center: (f32, f32),
    canvas: Pixmap,
    last_scene: Option<Scene>,
}

impl SkiaRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let canvas = Pixmap::new(width, height)
            .ok_or_else(|| anyhow!("Failed to create {width}x{height} canvas"))?;
        Ok(Self {
            width,
            height,
            center: (width as f32 / 2.0, height as f32 / 2.0),
            canvas,
            last_scene: None,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) -> Result<()> {
        *self = Self::new(new_width, new_height)?;
        Ok(())
    }

    /// Draws `scene` and copies it into `frame_buffer`, which must be
    /// `width * height * 4` bytes.
    pub fn render_frame<C: Clock>(
        &mut self,
        scene: &Scene,
        frame_buffer: &mut [u8],
        clock: &C,
    ) -> Result<RenderStats> {
        if frame_buffer.len() != self.canvas.data().len() {
            bail!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                frame_buffer.len(),
                self.canvas.data().len(),
                self.width,
                self.height
            );
        }

        let redrawn = self.last_scene.as_ref() != Some(scene);
        let t = clock.now();
        if redrawn {
            self.draw(scene);
            self.last_scene = Some(scene.clone());
        }
        let draw = clock.elapsed(t);

        let t = clock.now();
        frame_buffer.copy_from_slice(self.canvas.data());
        let copy = clock.elapsed(t);

        Ok(RenderStats {
            draw,
            copy,
            redrawn,
        })
    }

    /// Rectangles drawn over the background, back to front.
    pub fn layout(&self, scene: &Scene) -> Vec<(Rect, [u8; 4])> {
        match scene {
            Scene::Menu {
                recorded,
                can_export,
            } => self.menu_layout(*recorded, *can_export),
            Scene::Waiting | Scene::Stimulus(_) => Vec::new(),
            Scene::Result {
                reaction_ms,
                can_ignore,
                confirming_ignore,
                ..
            } => self.result_layout(*reaction_ms, *can_ignore, *confirming_ignore),
        }
    }

    fn draw(&mut self, scene: &Scene) {
        let [r, g, b, a] = scene.background();
        self.canvas.fill(Color::from_rgba8(r, g, b, a));

        let mut paint = Paint::default();
        for (rect, [r, g, b, a]) in self.layout(scene) {
            paint.set_color_rgba8(r, g, b, a);
            self.canvas
                .fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    fn menu_layout(&self, recorded: usize, can_export: bool) -> Vec<(Rect, [u8; 4])> {
        let (cx, cy) = self.center;
        let bw = (self.width as f32 * 0.5).min(360.0);
        let top = cy - (3.0 * BUTTON_HEIGHT + 2.0 * BUTTON_GAP) / 2.0;
        let row = |i: f32| top + i * (BUTTON_HEIGHT + BUTTON_GAP);

        let mut out = Vec::with_capacity(3 + recorded.min(MAX_TALLY));
        push_rect(&mut out, cx - bw / 2.0, row(0.0), bw, BUTTON_HEIGHT, BUTTON);
        push_rect(&mut out, cx - bw / 2.0, row(1.0), bw, BUTTON_HEIGHT, BUTTON_DIM);
        if can_export {
            push_rect(&mut out, cx - bw / 2.0, row(2.0), bw, BUTTON_HEIGHT, BUTTON);
        }

        let y = self.height as f32 - 3.0 * TALLY_SIZE;
        for i in 0..recorded.min(MAX_TALLY) {
            let x = 2.0 * TALLY_SIZE + i as f32 * (TALLY_SIZE + TALLY_GAP);
            push_rect(&mut out, x, y, TALLY_SIZE, TALLY_SIZE, BUTTON_DIM);
        }
        out
    }

    fn result_layout(
        &self,
        reaction_ms: f64,
        can_ignore: bool,
        confirming_ignore: bool,
    ) -> Vec<(Rect, [u8; 4])> {
        let (cx, cy) = self.center;
        let pw = (self.width as f32 * 0.6).min(480.0);
        let px = cx - pw / 2.0;
        let py = cy - PANEL_HEIGHT / 2.0;
        let inner = pw - 2.0 * PANEL_INSET;

        let mut out = Vec::with_capacity(4);
        push_rect(&mut out, px, py, pw, PANEL_HEIGHT, PANEL);

        let filled = inner * Scene::readout_fraction(reaction_ms);
        push_rect(&mut out, px + PANEL_INSET, py + 32.0, filled, 24.0, READOUT);

        let button_w = (inner - PANEL_INSET) / 2.0;
        let button_y = py + PANEL_HEIGHT - PANEL_INSET - 40.0;
        push_rect(&mut out, px + PANEL_INSET, button_y, button_w, 40.0, BUTTON);
        if can_ignore {
            let color = if confirming_ignore { DESTRUCTIVE } else { BUTTON_DIM };
            let x = px + 2.0 * PANEL_INSET + button_w;
            push_rect(&mut out, x, button_y, button_w, 40.0, color);
        }
        out
    }
}

/// Degenerate rectangles (zero width, tiny windows) are skipped.
fn push_rect(out: &mut Vec<(Rect, [u8; 4])>, x: f32, y: f32, w: f32, h: f32, color: [u8; 4]) {
    if let Some(rect) = Rect::from_xywh(x, y, w, h) {
        out.push((rect, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{MENU_BACKGROUND, WAITING_BACKGROUND};
    use reflex_core::StimulusVariant;
    use reflex_timing::ManualClock;

    const W: u32 = 640;
    const H: u32 = 480;

    fn render(scene: &Scene) -> Vec<u8> {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        let mut fb = vec![0u8; (W * H * 4) as usize];
        r.render_frame(scene, &mut fb, &ManualClock::default()).unwrap();
        fb
    }

    fn pixel(fb: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * W + x) * 4) as usize;
        [fb[i], fb[i + 1], fb[i + 2], fb[i + 3]]
    }

    #[test]
    fn stimulus_fills_screen() {
        for s in reflex_core::STIMULI {
            let fb = render(&Scene::Stimulus(s));
            assert_eq!(pixel(&fb, 0, 0), s.color());
            assert_eq!(pixel(&fb, W / 2, H / 2), s.color());
            assert_eq!(pixel(&fb, W - 1, H - 1), s.color());
        }
    }

    #[test]
    fn waiting_is_white() {
        let fb = render(&Scene::Waiting);
        assert_eq!(pixel(&fb, W / 3, H / 3), WAITING_BACKGROUND);
    }

    #[test]
    fn result_panel_over_stimulus() {
        let scene = Scene::Result {
            stimulus: StimulusVariant::Green,
            reaction_ms: 500.0,
            can_ignore: true,
            confirming_ignore: false,
        };
        let fb = render(&scene);
        assert_eq!(pixel(&fb, 2, 2), StimulusVariant::Green.color());
        assert_eq!(pixel(&fb, W / 2, H / 2 + 10), PANEL);
    }

    #[test]
    fn readout_bar_scales_with_reaction_time() {
        let r = SkiaRenderer::new(W, H).unwrap();
        let bar_width = |ms: f64| {
            let scene = Scene::Result {
                stimulus: StimulusVariant::Red,
                reaction_ms: ms,
                can_ignore: false,
                confirming_ignore: false,
            };
            r.layout(&scene)
                .into_iter()
                .find(|(_, c)| *c == READOUT)
                .map(|(rect, _)| rect.width())
        };
        let full = bar_width(1000.0).unwrap();
        assert!((bar_width(250.0).unwrap() - full / 4.0).abs() < 0.01);
        assert_eq!(bar_width(2500.0).unwrap(), full);
        assert_eq!(bar_width(0.0), None);
    }

    #[test]
    fn ignore_button_only_when_allowed() {
        let r = SkiaRenderer::new(W, H).unwrap();
        let scene = |can_ignore, confirming_ignore| Scene::Result {
            stimulus: StimulusVariant::Blue,
            reaction_ms: 300.0,
            can_ignore,
            confirming_ignore,
        };
        let has = |s: &Scene, color| r.layout(s).iter().any(|(_, c)| *c == color);

        assert!(!has(&scene(false, false), BUTTON_DIM));
        assert!(has(&scene(true, false), BUTTON_DIM));
        assert!(has(&scene(true, true), DESTRUCTIVE));
    }

    #[test]
    fn menu_export_and_tally() {
        let r = SkiaRenderer::new(W, H).unwrap();
        let without = r.layout(&Scene::Menu {
            recorded: 0,
            can_export: false,
        });
        let with = r.layout(&Scene::Menu {
            recorded: 80,
            can_export: true,
        });
        assert_eq!(without.len(), 2);
        assert_eq!(with.len(), 3 + MAX_TALLY);

        let fb = render(&Scene::Menu {
            recorded: 0,
            can_export: false,
        });
        assert_eq!(pixel(&fb, 0, 0), MENU_BACKGROUND);
    }

    #[test]
    fn unchanged_scene_is_not_redrawn() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        let clock = ManualClock::default();
        let mut fb = vec![0u8; (W * H * 4) as usize];

        assert!(r.render_frame(&Scene::Waiting, &mut fb, &clock).unwrap().redrawn);
        assert!(!r.render_frame(&Scene::Waiting, &mut fb, &clock).unwrap().redrawn);
        let s = Scene::Stimulus(StimulusVariant::Red);
        assert!(r.render_frame(&s, &mut fb, &clock).unwrap().redrawn);
    }

    #[test]
    fn wrong_frame_size_is_an_error() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        let mut fb = vec![0u8; 16];
        assert!(r
            .render_frame(&Scene::Waiting, &mut fb, &ManualClock::default())
            .is_err());
    }

    #[test]
    fn resize_changes_expected_buffer() {
        let mut r = SkiaRenderer::new(W, H).unwrap();
        r.resize(4, 4).unwrap();
        let mut old = vec![0u8; (W * H * 4) as usize];
        assert!(r
            .render_frame(&Scene::Waiting, &mut old, &ManualClock::default())
            .is_err());
        let mut fb = vec![0u8; 64];
        assert!(r.render_frame(&Scene::Waiting, &mut fb, &ManualClock::default()).is_ok());
    }
}
