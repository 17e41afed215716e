//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use nightdrive::Viewer;
//! Viewer::builder()
//!     .with_assets_dir("assets/models")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    engine::DriveEngine, error::NightdriveError, input::InputEvent,
    input::InputProcessor, options::Options,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    assets_dir: PathBuf,
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "Nightdrive",
    /// assets under `assets/models`, default options).
    fn new() -> Self {
        Self {
            assets_dir: PathBuf::from("assets/models"),
            options: None,
            title: "Nightdrive".into(),
        }
    }

    /// Set the directory holding `city/`, `car/`, and `sphere/` assets.
    #[must_use]
    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            assets_dir: self.assets_dir,
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays the scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    assets_dir: PathBuf,
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop until the user closes it.
    ///
    /// # Errors
    ///
    /// Returns [`NightdriveError::Viewer`] when the event loop cannot
    /// be created or exits abnormally, and any fatal engine or import
    /// error raised during startup.
    pub fn run(self) -> Result<(), NightdriveError> {
        let event_loop = EventLoop::new()
            .map_err(|e| NightdriveError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            processor: InputProcessor::with_key_bindings(
                self.options.keybindings.clone(),
            ),
            last_frame: Instant::now(),
            assets_dir: self.assets_dir,
            options: self.options,
            title: self.title,
            startup_error: None,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| NightdriveError::Viewer(e.to_string()))?;

        app.startup_error.map_or(Ok(()), Err)
    }
}

// ── Event loop ───────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<DriveEngine>,
    processor: InputProcessor,
    last_frame: Instant,
    assets_dir: PathBuf,
    options: Options,
    title: String,
    startup_error: Option<NightdriveError>,
}

impl ViewerApp {
    fn init(
        &mut self,
        event_loop: &ActiveEventLoop,
    ) -> Result<(), NightdriveError> {
        let attrs = Window::default_attributes().with_title(&self.title);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| NightdriveError::Viewer(e.to_string()))?,
        );

        let size = window.inner_size();
        let mut engine = pollster::block_on(DriveEngine::new(
            window.clone(),
            (size.width.max(1), size.height.max(1)),
            &self.options,
        ))?;
        engine.load_demo_scene(&self.assets_dir)?;

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn forward(&mut self, event: &InputEvent) {
        if let Some(engine) = &mut self.engine {
            if let Some(command) = self.processor.handle_event(event) {
                engine.execute(command);
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("startup failed: {e}");
                self.startup_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                {
                    let now = Instant::now();
                    let dt =
                        now.duration_since(self.last_frame).as_secs_f32();
                    self.last_frame = now;

                    for command in self.processor.frame_commands(dt) {
                        engine.execute(command);
                    }
                    engine.update(dt);

                    match engine.render() {
                        Ok(()) => {}
                        Err(
                            wgpu::SurfaceError::Outdated
                            | wgpu::SurfaceError::Lost,
                        ) => {
                            let inner = window.inner_size();
                            engine.resize(inner.width, inner.height);
                        }
                        Err(e) => {
                            log::error!("render error: {e:?}");
                        }
                    }
                    window.request_redraw();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.forward(&InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::CursorLeft { .. } => {
                self.processor.reset_cursor();
            }

            WindowEvent::Focused(false) => {
                self.processor.reset_cursor();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.forward(&InputEvent::Scroll { delta: scroll });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = InputEvent::from_key_event(&event) {
                    self.forward(&input);
                }
            }

            _ => (),
        }
    }
}
