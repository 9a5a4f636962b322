//! Windowed host.
//!
//! [`App`] wires the engine to a real window: winit events become pointer,
//! keyboard and visibility calls on the engine, every redraw runs one
//! [`Nexus::frame`] into a [`Raster`], and the [`Presenter`] shows it.
//!
//! The lifecycle is explicit: [`run`] builds the event loop, `resumed`
//! constructs everything, and dropping the app releases the GPU surface and
//! the audio stream.

use std::sync::Arc;

use glam::Vec2;
use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::audio::AudioFeedback;
use crate::config::{AudioConfig, NexusConfig};
use crate::engine::{FrameOutcome, Nexus};
use crate::error::{AppError, AudioError};
use crate::gpu::Presenter;
use crate::input::{Command, GestureSource, InputBridge, Keyboard};
use crate::raster::Raster;
use crate::time::Clock;

#[cfg(feature = "egui")]
use crate::gpu::egui_integration::EguiIntegration;
#[cfg(feature = "egui")]
use crate::ui::{ControlPanel, HostStatus};

/// Run the windowed application until the window closes.
pub fn run(config: NexusConfig, gestures: Option<Box<dyn GestureSource>>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, gestures);
    event_loop.run_app(&mut app)?;
    app.finish()
}

/// Audio feedback for `config`: the output device when built with the
/// `audio` feature, otherwise an offline synth that still drives the level.
pub fn open_audio(config: &AudioConfig, seed: Option<u64>) -> AudioFeedback {
    if !config.enabled {
        return AudioFeedback::from_result(Err(AudioError::Disabled), seed);
    }
    open_backend(config, seed)
}

#[cfg(feature = "audio")]
fn open_backend(config: &AudioConfig, seed: Option<u64>) -> AudioFeedback {
    let backend = crate::synth::DeviceSynth::open(config.volume_db)
        .map(|synth| Box::new(synth) as Box<dyn crate::audio::AudioBackend>);
    AudioFeedback::from_result(backend, seed)
}

#[cfg(not(feature = "audio"))]
fn open_backend(config: &AudioConfig, seed: Option<u64>) -> AudioFeedback {
    info!("audio: offline synth (build with --features audio for sound)");
    let synth = crate::synth::OfflineSynth::new(44_100, config.volume_db);
    AudioFeedback::new(Box::new(synth), seed)
}

/// Everything that exists while the window is open.
struct Running {
    window: Arc<Window>,
    presenter: Presenter,
    raster: Raster,
    nexus: Nexus,
    input: InputBridge,
    audio: AudioFeedback,
    occluded: bool,
    minimized: bool,
    #[cfg(feature = "egui")]
    egui: EguiIntegration,
    #[cfg(feature = "egui")]
    panel: ControlPanel,
}

impl Running {
    fn sync_visibility(&mut self) {
        self.nexus.set_visible(!self.occluded && !self.minimized);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.minimized = width == 0 || height == 0;
        self.sync_visibility();
        if self.minimized {
            return;
        }
        self.presenter.resize(width, height);
        self.raster.resize(width, height);
        self.nexus.resize(width as f32, height as f32);
    }

    fn input_mode(&self) -> &'static str {
        if self.input.is_gesture() {
            "gestures"
        } else {
            "pointer"
        }
    }
}

pub struct App {
    config: NexusConfig,
    gestures: Option<Box<dyn GestureSource>>,
    state: Option<Running>,
    clock: Clock,
    keyboard: Keyboard,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: NexusConfig, gestures: Option<Box<dyn GestureSource>>) -> Self {
        Self {
            config,
            gestures,
            state: None,
            clock: Clock::new(),
            keyboard: Keyboard::new(),
            error: None,
        }
    }

    /// Bootstrap error that ended the event loop, if any.
    pub fn finish(self) -> Result<(), AppError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let presenter = pollster::block_on(Presenter::new(window.clone()))?;
        let (width, height) = presenter.size();
        info!("window {width}x{height}");

        let mut nexus = Nexus::new(self.config.clone(), width as f32, height as f32);
        let seeded = nexus.seed_particles();
        info!("seeded {seeded} particles");

        let audio = open_audio(&self.config.audio, self.config.simulation.seed);
        let input = InputBridge::new(self.gestures.take());

        #[cfg(feature = "egui")]
        let egui = EguiIntegration::new(presenter.device(), presenter.surface_format(), &window);

        Ok(Running {
            window,
            presenter,
            raster: Raster::new(width, height),
            nexus,
            input,
            audio,
            occluded: false,
            minimized: false,
            #[cfg(feature = "egui")]
            egui,
            #[cfg(feature = "egui")]
            panel: ControlPanel::new(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let now_ms = self.clock.now_ms();

        for interaction in state.input.poll(state.nexus.size()) {
            state.nexus.interact(interaction, now_ms, &mut state.audio);
        }

        let outcome = state.nexus.frame(now_ms, &mut state.raster, &mut state.audio);
        if outcome != FrameOutcome::Hidden {
            let result = present(state);
            match result {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    state.presenter.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(err) => warn!("render error: {err:?}"),
            }
        }

        state.window.request_redraw();
    }
}

#[cfg(not(feature = "egui"))]
fn present(state: &mut Running) -> Result<(), wgpu::SurfaceError> {
    state.presenter.present(&state.raster)
}

#[cfg(feature = "egui")]
fn present(state: &mut Running) -> Result<(), wgpu::SurfaceError> {
    let status = HostStatus {
        input_mode: state.input_mode(),
        audio_enabled: state.audio.is_enabled(),
    };
    let Running {
        window,
        presenter,
        raster,
        nexus,
        egui,
        panel,
        ..
    } = state;

    let output = egui.run(window, |ctx| panel.show(ctx, nexus, status));
    let (width, height) = presenter.size();
    presenter.present_with(raster, |device, queue, encoder, view| {
        egui.paint(device, queue, encoder, view, [width, height], &output);
    })
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(state) => {
                info!("input: {}", state.input_mode());
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                error!("startup failed: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        #[cfg(feature = "egui")]
        let consumed = state.egui.on_window_event(&state.window, &event);
        #[cfg(not(feature = "egui"))]
        let consumed = false;

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.resize(size.width, size.height);
            }
            WindowEvent::Occluded(occluded) => {
                state.occluded = occluded;
                state.sync_visibility();
            }
            WindowEvent::CursorMoved { position, .. } if !consumed => {
                state
                    .input
                    .on_pointer_move(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                state.input.on_pointer_leave();
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } if !consumed => {
                state.input.on_pointer_press();
            }
            WindowEvent::KeyboardInput { .. } if !consumed => match self.keyboard.handle_event(&event) {
                Some(Command::Quit) => event_loop.exit(),
                Some(command) => command.apply(&mut state.nexus),
                None => {}
            },
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}
