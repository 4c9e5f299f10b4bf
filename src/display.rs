use std::time::{Duration, Instant};

use eframe::egui;
use egui::plot::{Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints, VLine};
use egui::Color32;
use log::info;

use crate::config::DisplayConfig;
use crate::sequence::FrameSequence;
use crate::spectrum::Frame;

/// Open a window and play the frames back at one chunk per chunk duration.
/// Returns once the window is closed.
pub fn animate(frames: FrameSequence, display: DisplayConfig) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(display.window_size[0], display.window_size[1])),
        ..Default::default()
    };
    let title = display.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Box::new(SpectrumApp::new(frames, display))),
    )
}

/// Advances on a fixed period, independent of how often egui repaints.
pub struct FrameClock {
    interval: Duration,
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// True when a new frame is due at `now`. The first call is always due.
    ///
    /// Frames are scheduled on a fixed grid, so a late repaint does not push
    /// back the frames after it. Falling more than a whole interval behind
    /// restarts the grid at `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(last) = self.last else {
            self.last = Some(now);
            return true;
        };
        let due = last + self.interval;
        if now < due {
            return false;
        }
        self.last = Some(if now.duration_since(due) >= self.interval {
            now
        } else {
            due
        });
        true
    }

    /// Time until the next frame is due.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => (last + self.interval).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }
}

struct SpectrumApp {
    frames: FrameSequence,
    display: DisplayConfig,
    clock: FrameClock,
    current: Option<Frame>,
    finished: bool,
}

impl SpectrumApp {
    fn new(frames: FrameSequence, display: DisplayConfig) -> Self {
        let clock = FrameClock::new(frames.interval());
        Self {
            frames,
            display,
            clock,
            current: None,
            finished: false,
        }
    }

    fn advance(&mut self, now: Instant) {
        if self.finished || !self.clock.tick(now) {
            return;
        }
        match self.frames.next() {
            Some(frame) => self.current = Some(frame),
            None => {
                info!("played {} frames", self.frames.position());
                self.finished = true;
            }
        }
    }

    fn waveform(&self, ui: &mut egui::Ui, height: f32) {
        let [x_min, x_max] = self.display.waveform_x;
        let [y_min, y_max] = self.display.waveform_y;
        let points = self
            .current
            .as_ref()
            .map(Frame::waveform_points)
            .unwrap_or_default();
        Plot::new("waveform")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
                plot_ui.line(Line::new(PlotPoints::new(points)).width(2.0).name("amplitude"));
            });
    }

    fn spectrum(&self, ui: &mut egui::Ui, height: f32) {
        let [x_min, x_max] = self.display.spectrum_x;
        let [y_min, y_max] = self.display.spectrum_y;
        let pitch = self.display.reference_pitch_hz;
        let points = self
            .current
            .as_ref()
            .map(Frame::spectrum_points)
            .unwrap_or_default();
        Plot::new("spectrum")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max([x_min, y_min], [x_max, y_max]));
                plot_ui.line(Line::new(PlotPoints::new(points)).width(2.0).name("magnitude"));
                plot_ui.vline(
                    VLine::new(pitch)
                        .color(Color32::RED)
                        .style(LineStyle::dashed_loose())
                        .name(format!("C note frequency ({pitch} Hz)")),
                );
            });
    }
}

impl eframe::App for SpectrumApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.advance(now);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(&self.display.title);
            ui.label(format!(
                "frame {} / {} at {} Hz",
                self.frames.position(),
                self.frames.len(),
                self.frames.sample_rate()
            ));
            let height = (ui.available_height() - 2.0 * ui.spacing().item_spacing.y) / 2.0;
            ui.label("Time (s) / Amplitude");
            self.waveform(ui, height - 20.0);
            ui.label("Frequency (Hz) / Amplitude");
            self.spectrum(ui, height - 20.0);
        });

        if !self.finished {
            ctx.request_repaint_after(self.clock.remaining(Instant::now()));
        }
    }
}
