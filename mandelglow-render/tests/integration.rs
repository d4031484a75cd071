use std::time::{Duration, Instant};

use mandelglow_core::{AccuracyLevel, FrameState, Navigator, PointerSample, ViewEvent};
use mandelglow_render::{Palette, Renderer, ShadingStage, Uniform};

/// Stand-in stage that keeps the uniform values it was last given, like a
/// GL program object does, and snapshots them at every draw.
#[derive(Default)]
struct SnapshotStage {
    center: Option<[f32; 2]>,
    scale: Option<f32>,
    ratio: Option<f32>,
    accuracy: Option<i32>,
    palette_uploads: usize,
    draws: Vec<(f32, f32, i32)>,
}

impl ShadingStage for SnapshotStage {
    type Context = ();

    fn bind(&mut self, _: &()) {}

    fn upload_palette(&mut self, _: &(), _: &Palette) {
        self.palette_uploads += 1;
    }

    fn set_uniform(&mut self, _: &(), value: Uniform) {
        match value {
            Uniform::Center(c) => self.center = Some(c),
            Uniform::Scale(s) => self.scale = Some(s),
            Uniform::Ratio(r) => self.ratio = Some(r),
            Uniform::Accuracy(a) => self.accuracy = Some(a),
        }
    }

    fn clear(&mut self, _: &()) {}

    fn draw_quad(&mut self, _: &()) {
        assert!(self.center.is_some(), "drew before center was set");
        let scale = self.scale.expect("drew before scale was set");
        let ratio = self.ratio.expect("drew before ratio was set");
        let accuracy = self.accuracy.expect("drew before accuracy was set");
        self.draws.push((scale, ratio, accuracy));
    }
}

/// Minimal host loop: apply events, tick, draw when asked. Redraw requests
/// inside one step coalesce into a single frame.
struct Host {
    nav: Navigator,
    renderer: Renderer<SnapshotStage>,
}

impl Host {
    fn new() -> Self {
        Self {
            nav: Navigator::default(),
            renderer: Renderer::new(&(), SnapshotStage::default(), &Palette::spectral()),
        }
    }

    fn step(&mut self, events: &[ViewEvent], now: Instant) {
        let mut redraw = self.nav.tick(now);
        for &event in events {
            redraw = redraw.or(self.nav.handle(event, now));
        }
        if redraw.is_requested() {
            let frame: FrameState = self.nav.frame();
            self.renderer.draw(&(), &frame);
        }
    }

    fn draws(&self) -> &[(f32, f32, i32)] {
        &self.renderer.stage().draws
    }
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn fresh_viewport_refines_after_resize_interval() {
    let t0 = Instant::now();
    let mut host = Host::new();

    host.step(&[ViewEvent::Resize { width: 500, height: 500 }], t0);
    assert_eq!(host.draws(), &[(1.0, 1.0, 0)]);

    host.step(&[], t0 + ms(999));
    assert_eq!(host.draws().len(), 1, "refined too early");

    host.step(&[], t0 + ms(1000));
    assert_eq!(host.draws(), &[(1.0, 1.0, 0), (1.0, 1.0, 4)]);

    // Nothing else happens afterwards.
    host.step(&[], t0 + ms(5000));
    assert_eq!(host.draws().len(), 2);
    assert_eq!(host.renderer.stage().palette_uploads, 1);
}

#[test]
fn wheel_notch_zooms_and_restarts_short_countdown() {
    let t0 = Instant::now();
    let mut host = Host::new();
    host.step(&[ViewEvent::Resize { width: 500, height: 500 }], t0);
    host.step(&[], t0 + ms(2000));
    assert_eq!(host.nav.accuracy(), AccuracyLevel::HIGH);

    let t1 = t0 + ms(3000);
    host.step(&[ViewEvent::Wheel { delta: 120.0 }], t1);
    let &(scale, _, accuracy) = host.draws().last().unwrap();
    assert!((f64::from(scale) - 0.9999f64.powi(120)).abs() < 1e-6);
    assert_eq!(accuracy, 0);
    assert_eq!(host.nav.time_until_refine(t1), Some(ms(300)));

    host.step(&[], t1 + ms(299));
    assert_eq!(host.draws().last().unwrap().2, 0);
    host.step(&[], t1 + ms(301));
    assert_eq!(host.draws().last().unwrap().2, 4);
}

#[test]
fn coalesced_inputs_draw_one_frame() {
    let t0 = Instant::now();
    let mut host = Host::new();
    host.step(
        &[
            ViewEvent::Resize { width: 800, height: 600 },
            ViewEvent::Wheel { delta: 120.0 },
            ViewEvent::Wheel { delta: 120.0 },
        ],
        t0,
    );
    assert_eq!(host.draws().len(), 1);
    let &(_, ratio, _) = host.draws().last().unwrap();
    assert!((ratio - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn drag_frames_stay_cheap_until_released() {
    let t0 = Instant::now();
    let mut host = Host::new();
    host.step(&[ViewEvent::Resize { width: 400, height: 300 }], t0);
    host.step(
        &[ViewEvent::PointerPress {
            pos: PointerSample::new(200.0, 150.0),
        }],
        t0 + ms(1200),
    );
    // The resize countdown fired in the step above.
    assert_eq!(host.draws().last().unwrap().2, 4);

    for i in 1..=10u64 {
        host.step(
            &[ViewEvent::PointerMove {
                pos: PointerSample::new(200.0 + 5.0 * i as f64, 150.0),
                primary_down: true,
            }],
            t0 + ms(1200 + 50 * i),
        );
        assert_eq!(host.draws().last().unwrap().2, 0);
    }
    let drawn = host.draws().len();

    // Button released: hover moves do not redraw.
    host.step(
        &[ViewEvent::PointerMove {
            pos: PointerSample::new(300.0, 100.0),
            primary_down: false,
        }],
        t0 + ms(1800),
    );
    assert_eq!(host.draws().len(), drawn);

    host.step(&[], t0 + ms(1700 + 500));
    assert_eq!(host.draws().len(), drawn + 1);
    assert_eq!(host.draws().last().unwrap().2, 4);

    // 50 px right in a 300 px tall view at scale 1.
    let c = host.nav.view().center;
    assert!((c.re + 50.0 * 2.0 / 300.0).abs() < 1e-12);
}
