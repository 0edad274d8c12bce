use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::color::Color;
use crate::driver::{DiagnosticsSink, FrameDriver, FrameStats, LogSink};
use crate::error::BackendError;
use crate::geometry::{DEFAULT_CYLINDER_SEGMENTS, MIN_CYLINDER_SEGMENTS, Solids};
use crate::gpu::GpuContext;
use crate::input::InputTranslator;
use crate::rig::Rig;
use crate::solid_pass::SolidPass;

/// Environment variable that disables vsync when set to any value.
pub const NO_VSYNC_ENV: &str = "BLOCKY_NO_VSYNC";

/// Shortest interval between window title refreshes.
const TITLE_REFRESH: Duration = Duration::from_millis(250);

/// Configuration for the app window.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub cylinder_segments: u32,
    pub vsync: bool,
    pub background: Color,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Blocky Animal".to_string(),
            width: 600,
            height: 600,
            cylinder_segments: DEFAULT_CYLINDER_SEGMENTS,
            vsync: true,
            background: Color::BLACK,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `--no-vsync` on the command line or `BLOCKY_NO_VSYNC`.
    pub fn from_env() -> Self {
        Self::from_sources(
            std::env::args().skip(1),
            std::env::var_os(NO_VSYNC_ENV).is_some(),
        )
    }

    fn from_sources(args: impl IntoIterator<Item = String>, no_vsync_env: bool) -> Self {
        let no_vsync_arg = args.into_iter().any(|a| a == "--no-vsync");
        Self::default().vsync(!(no_vsync_arg || no_vsync_env))
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Side count for cylinder parts. Values below the minimum are raised to it.
    pub fn cylinder_segments(mut self, segments: u32) -> Self {
        self.cylinder_segments = segments.max(MIN_CYLINDER_SEGMENTS);
        self
    }

    pub fn vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

/// Writes frame statistics into the window title.
struct TitleSink {
    window: Arc<Window>,
    base_title: String,
    last_update: Option<Instant>,
}

impl DiagnosticsSink for TitleSink {
    fn frame(&mut self, stats: &FrameStats) {
        LogSink.frame(stats);
        let now = Instant::now();
        if self
            .last_update
            .is_some_and(|last| now.duration_since(last) < TITLE_REFRESH)
        {
            return;
        }
        self.last_update = Some(now);
        self.window
            .set_title(&format!("{} - {stats}", self.base_title));
    }

    fn backend_failed(&mut self, error: &BackendError) {
        LogSink.backend_failed(error);
    }
}

/// Opens the window and runs the figure until it is closed.
///
/// Returns an error if the rendering backend could not be initialized. The error
/// has already been reported through the log by then.
pub fn run(config: AppConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BlockyApp::Pending { config };
    event_loop.run_app(&mut app).context("event loop failed")?;

    match app {
        BlockyApp::Failed(error) => Err(anyhow::anyhow!("rendering backend unavailable: {error}")),
        _ => Ok(()),
    }
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    pass: SolidPass,
    driver: FrameDriver,
    input: InputTranslator,
    sink: TitleSink,
    background: Color,
    start_time: Instant,
}

enum BlockyApp {
    Pending { config: AppConfig },
    Running(Box<Running>),
    Failed(BackendError),
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self, BackendError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone(), config.vsync)?;
        let solids = Solids::new(config.cylinder_segments);
        let pass = SolidPass::new(&gpu, &solids);
        let driver = FrameDriver::new(Rig::blocky_animal(), solids);
        log::info!(
            "rig ready: {} parts, {}-sided cylinders",
            driver.rig().len(),
            config.cylinder_segments
        );

        window.request_redraw();
        Ok(Self {
            sink: TitleSink {
                window: window.clone(),
                base_title: config.title.clone(),
                last_update: None,
            },
            window,
            gpu,
            pass,
            driver,
            input: InputTranslator::new(),
            background: config.background,
            start_time: Instant::now(),
        })
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        let stats = self.driver.frame(elapsed, &mut self.pass);

        match self.gpu.surface.get_current_texture() {
            Ok(output) => {
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                self.pass.submit(&self.gpu, &view, self.background);
                output.present();
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.gpu.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory");
                event_loop.exit();
                return;
            }
            Err(error) => log::warn!("skipping frame: {error}"),
        }

        self.sink.frame(&stats);
        self.window.request_redraw();
    }
}

impl ApplicationHandler for BlockyApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let BlockyApp::Pending { config } = self else {
            return;
        };

        match Running::start(event_loop, config) {
            Ok(running) => *self = BlockyApp::Running(Box::new(running)),
            Err(error) => {
                LogSink.backend_failed(&error);
                event_loop.exit();
                *self = BlockyApp::Failed(error);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let BlockyApp::Running(app) = self else {
            return;
        };

        if let Some(input) = app.input.translate(&event, &app.driver.controls) {
            log::trace!("{input:?}");
            app.driver.controls.apply_input(input);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                app.redraw(event_loop);
            }
            _ => {}
        }
    }
}
