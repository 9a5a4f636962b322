//! Control panel (feature `egui`).
//!
//! Sliders for intensity, complexity and flow speed, the auto-mode toggle, a
//! pulse button and live statistics. Values are written straight through the
//! engine setters, so the clamping there applies to the panel too.

use crate::engine::Nexus;

/// Host state shown alongside the engine statistics.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostStatus<'a> {
    pub input_mode: &'a str,
    pub audio_enabled: bool,
}

#[derive(Debug)]
pub struct ControlPanel {
    open: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self { open: true }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn show(&mut self, ctx: &egui::Context, nexus: &mut Nexus, status: HostStatus<'_>) {
        egui::Window::new("Quantum Nexus")
            .open(&mut self.open)
            .default_pos([10.0, 10.0])
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Controls");

                let mut intensity = nexus.intensity();
                if ui
                    .add(egui::Slider::new(&mut intensity, 0.0..=1.0).text("Intensity"))
                    .changed()
                {
                    nexus.set_intensity(intensity);
                }

                let mut complexity = nexus.complexity();
                if ui
                    .add(egui::Slider::new(&mut complexity, 0.0..=10.0).text("Complexity"))
                    .changed()
                {
                    nexus.set_complexity(complexity);
                }

                let mut flow_speed = nexus.flow_speed();
                if ui
                    .add(egui::Slider::new(&mut flow_speed, 0.0..=1.0).text("Flow Speed"))
                    .changed()
                {
                    nexus.set_flow_speed(flow_speed);
                }

                let mut auto_mode = nexus.auto_mode();
                if ui.checkbox(&mut auto_mode, "Auto mode").changed() {
                    nexus.set_auto_mode(auto_mode);
                }

                if ui.button("Pulse").clicked() {
                    nexus.pulse();
                }

                ui.separator();
                ui.heading("Stats");
                ui.label(format!("FPS: {:.0}", nexus.fps()));
                ui.label(format!(
                    "Particles: {} / {}",
                    nexus.particles().len(),
                    nexus.target_particles()
                ));
                ui.label(format!("Attractors: {}", nexus.attractors().len()));
                ui.label(format!("Input: {}", status.input_mode));
                ui.label(format!(
                    "Audio: {}",
                    if status.audio_enabled { "on" } else { "silent" }
                ));

                ui.separator();
                ui.label("Space: pulse, A: auto mode");
                ui.label("Arrows: intensity / flow, [ ]: complexity");
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NexusConfig;

    #[test]
    fn test_idle_panel_leaves_controls_alone() {
        let mut nexus = Nexus::new(NexusConfig::default(), 400.0, 300.0);
        let mut panel = ControlPanel::new();
        let ctx = egui::Context::default();

        let before = (nexus.intensity(), nexus.complexity(), nexus.flow_speed(), nexus.auto_mode());
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            panel.show(ctx, &mut nexus, HostStatus { input_mode: "pointer", audio_enabled: false });
        });
        let after = (nexus.intensity(), nexus.complexity(), nexus.flow_speed(), nexus.auto_mode());
        assert_eq!(before, after);
        assert_eq!(nexus.pending_rings(), 0);
    }

    #[test]
    fn test_toggle() {
        let mut panel = ControlPanel::new();
        assert!(panel.is_open());
        panel.toggle();
        assert!(!panel.is_open());
    }
}
