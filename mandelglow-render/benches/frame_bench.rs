use std::time::Instant;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mandelglow_core::{Navigator, PointerSample, ViewEvent};
use mandelglow_render::{Palette, Renderer, ShadingStage, Uniform};

/// Stage that only counts calls, so the bench measures orchestration.
#[derive(Default)]
struct NullStage {
    calls: u64,
}

impl ShadingStage for NullStage {
    type Context = ();

    fn bind(&mut self, _: &()) {
        self.calls += 1;
    }
    fn upload_palette(&mut self, _: &(), _: &Palette) {
        self.calls += 1;
    }
    fn set_uniform(&mut self, _: &(), value: Uniform) {
        black_box(value);
        self.calls += 1;
    }
    fn clear(&mut self, _: &()) {
        self.calls += 1;
    }
    fn draw_quad(&mut self, _: &()) {
        self.calls += 1;
    }
}

fn bench_palette(c: &mut Criterion) {
    c.bench_function("spectral_palette_256", |b| {
        b.iter(|| black_box(Palette::spectral()));
    });
}

fn bench_drag_frame(c: &mut Criterion) {
    let mut nav = Navigator::default();
    let now = Instant::now();
    let _ = nav.handle(ViewEvent::Resize { width: 1280, height: 720 }, now);
    let _ = nav.handle(
        ViewEvent::PointerPress {
            pos: PointerSample::new(640.0, 360.0),
        },
        now,
    );
    let mut renderer = Renderer::new(&(), NullStage::default(), &Palette::spectral());
    let mut x = 640.0;

    c.bench_function("drag_event_and_frame", |b| {
        b.iter(|| {
            x += 1.0;
            let redraw = nav.handle(
                ViewEvent::PointerMove {
                    pos: PointerSample::new(x, 360.0),
                    primary_down: true,
                },
                now,
            );
            if redraw.is_requested() {
                renderer.draw(&(), &nav.frame());
            }
        });
    });
    black_box(renderer.stage().calls);
}

criterion_group!(benches, bench_palette, bench_drag_frame);
criterion_main!(benches);
