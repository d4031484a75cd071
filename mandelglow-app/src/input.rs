use eframe::egui;

use mandelglow_core::{PointerSample, ViewEvent};

/// Wheel units per notch, in the convention the zoom law is tuned for.
pub(crate) const WHEEL_UNITS_PER_NOTCH: f64 = 120.0;
/// egui's default scroll distance per wheel line, in points.
const POINTS_PER_LINE: f64 = 40.0;
const LINES_PER_PAGE: f64 = 10.0;

/// Convert an egui wheel delta (positive = away from the user) to 1/120-notch
/// units.
pub(crate) fn wheel_delta(unit: egui::MouseWheelUnit, dy: f32) -> f64 {
    let lines = match unit {
        egui::MouseWheelUnit::Point => dy as f64 / POINTS_PER_LINE,
        egui::MouseWheelUnit::Line => dy as f64,
        egui::MouseWheelUnit::Page => dy as f64 * LINES_PER_PAGE,
    };
    lines * WHEEL_UNITS_PER_NOTCH
}

/// Turns the egui event stream into viewport events.
///
/// The primary-button state is tracked across the stream rather than read
/// once per frame, so a press, drag, and release delivered in the same
/// frame still pan only while the button was actually down.
#[derive(Debug, Default)]
pub(crate) struct InputTranslator {
    primary_held: bool,
}

impl InputTranslator {
    /// Translate one event; `origin` is the canvas top-left in screen points.
    pub(crate) fn translate(&mut self, event: &egui::Event, origin: egui::Pos2) -> Option<ViewEvent> {
        let local = |pos: egui::Pos2| {
            let v = pos - origin;
            PointerSample::new(v.x as f64, v.y as f64)
        };
        match event {
            egui::Event::PointerButton {
                pos,
                button: egui::PointerButton::Primary,
                pressed,
                ..
            } => {
                self.primary_held = *pressed;
                pressed.then(|| ViewEvent::PointerPress { pos: local(*pos) })
            }
            egui::Event::PointerMoved(pos) => Some(ViewEvent::PointerMove {
                pos: local(*pos),
                primary_down: self.primary_held,
            }),
            egui::Event::PointerGone => {
                self.primary_held = false;
                None
            }
            egui::Event::MouseWheel { unit, delta, .. } => Some(ViewEvent::Wheel {
                delta: wheel_delta(*unit, delta.y),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(x: f32, y: f32, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos: egui::pos2(x, y),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn wheel_units() {
        assert_eq!(wheel_delta(egui::MouseWheelUnit::Line, 1.0), 120.0);
        assert_eq!(wheel_delta(egui::MouseWheelUnit::Line, -2.0), -240.0);
        assert_eq!(wheel_delta(egui::MouseWheelUnit::Point, 40.0), 120.0);
        assert_eq!(wheel_delta(egui::MouseWheelUnit::Page, 1.0), 1200.0);
    }

    #[test]
    fn positions_are_canvas_relative() {
        let mut t = InputTranslator::default();
        let origin = egui::pos2(10.0, 30.0);
        let ev = t.translate(&egui::Event::PointerMoved(egui::pos2(15.0, 32.0)), origin);
        assert_eq!(
            ev,
            Some(ViewEvent::PointerMove {
                pos: PointerSample::new(5.0, 2.0),
                primary_down: false,
            })
        );
    }

    #[test]
    fn button_state_follows_stream() {
        let mut t = InputTranslator::default();
        let origin = egui::Pos2::ZERO;
        let press = t.translate(&button(1.0, 1.0, true), origin);
        assert_eq!(
            press,
            Some(ViewEvent::PointerPress {
                pos: PointerSample::new(1.0, 1.0)
            })
        );
        let drag = t.translate(&egui::Event::PointerMoved(egui::pos2(4.0, 1.0)), origin);
        assert!(matches!(
            drag,
            Some(ViewEvent::PointerMove {
                primary_down: true,
                ..
            })
        ));
        assert_eq!(t.translate(&button(4.0, 1.0, false), origin), None);
        let hover = t.translate(&egui::Event::PointerMoved(egui::pos2(9.0, 1.0)), origin);
        assert!(matches!(
            hover,
            Some(ViewEvent::PointerMove {
                primary_down: false,
                ..
            })
        ));
    }

    #[test]
    fn pointer_gone_releases_button() {
        let mut t = InputTranslator::default();
        let origin = egui::Pos2::ZERO;
        let _ = t.translate(&button(1.0, 1.0, true), origin);
        assert_eq!(t.translate(&egui::Event::PointerGone, origin), None);
        let ev = t.translate(&egui::Event::PointerMoved(egui::pos2(2.0, 2.0)), origin);
        assert!(matches!(
            ev,
            Some(ViewEvent::PointerMove {
                primary_down: false,
                ..
            })
        ));
    }
}
