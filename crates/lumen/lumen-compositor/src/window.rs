//! Isolated window management layer
//!
//! Based on softbuffer pattern: https://github.com/rust-windowing/softbuffer
//! Follows "isolate the madness" principle - all platform-specific code here.
//!
//! The event loop is pumped, not run: the frame loop calls
//! [`PlatformWindow::poll`] once per tick and gets a [`PlatformInput`]
//! snapshot back, then hands the compositor's backbuffer to
//! [`PlatformWindow::present`].

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use lumen_scale::{PhysicalPoint, PhysicalResolution, PointerState};
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use crate::framebuffer::Framebuffer;

/// Errors from the platform window layer
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    /// Event loop could not be created or pumped
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The OS refused to create the window
    #[error("failed to create window: {0}")]
    Os(#[from] winit::error::OsError),
    /// Softbuffer context, surface or buffer failure
    #[error("softbuffer error: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),
    /// The event loop never resumed, so no window exists
    #[error("window was not created")]
    NotCreated,
    /// The event loop exited while the window was being created
    #[error("event loop exited during window setup (code {0})")]
    ExitedDuringSetup(i32),
}

/// Input gathered since the previous poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformInput {
    /// Pointer position and primary button state
    pub pointer: PointerState,
    /// Latest inner size, if the window was resized
    pub resized: Option<(u32, u32)>,
    /// Keys pressed (repeats excluded)
    pub keys: Vec<KeyCode>,
    /// User asked to close the window
    pub close_requested: bool,
}

type WindowSurface = Surface<Arc<WinitWindow>, Arc<WinitWindow>>;

/// Internal handler for the event loop
struct WindowState {
    attributes: Option<WindowAttributes>,
    window: Option<Arc<WinitWindow>>,
    surface: Option<WindowSurface>,
    error: Option<WindowError>,
    pointer: PointerState,
    input: PlatformInput,
}

impl WindowState {
    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<(), WindowError> {
        let Some(attributes) = self.attributes.take() else {
            return Ok(());
        };
        let window = Arc::new(event_loop.create_window(attributes)?);
        let context = Context::new(window.clone())?;
        let surface = Surface::new(&context, window.clone())?;
        self.window = Some(window);
        self.surface = Some(surface);
        Ok(())
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(error) = self.create(event_loop) {
                tracing::error!(%error, "window creation failed");
                self.error = Some(error);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.input.close_requested = true;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.input.resized = Some((size.width, size.height));
            }
            // Window coordinates fit f32 exactly.
            #[allow(clippy::cast_possible_truncation)]
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.position = PhysicalPoint::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pointer.primary_down = state == ElementState::Pressed;
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        self.input.keys.push(code);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Resizable desktop window presenting a [`Framebuffer`]
pub struct PlatformWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
    surface_size: Option<(NonZeroU32, NonZeroU32)>,
}

impl PlatformWindow {
    /// Create and show a window with the given inner size
    pub fn new(title: &str, size: PhysicalResolution) -> Result<Self, WindowError> {
        let mut event_loop = EventLoop::new()?;

        let attributes = WinitWindow::default_attributes()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(size.width(), size.height()))
            .with_resizable(true);

        let mut state = WindowState {
            attributes: Some(attributes),
            window: None,
            surface: None,
            error: None,
            pointer: PointerState::default(),
            input: PlatformInput::default(),
        };

        // Pump the event loop once to create the window
        let status = event_loop.pump_app_events(Some(Duration::from_millis(1)), &mut state);

        if let Some(error) = state.error.take() {
            return Err(error);
        }
        check_setup_status(status)?;
        if state.window.is_none() {
            return Err(WindowError::NotCreated);
        }

        tracing::info!(width = size.width(), height = size.height(), "window created");

        Ok(Self {
            event_loop,
            state,
            surface_size: None,
        })
    }

    /// Drain pending platform events without blocking
    pub fn poll(&mut self) -> PlatformInput {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);

        let mut input = std::mem::take(&mut self.state.input);
        input.pointer = self.state.pointer;
        if matches!(status, PumpStatus::Exit(_)) {
            input.close_requested = true;
        }
        input
    }

    /// Current inner size in device pixels
    pub fn inner_size(&self) -> Option<PhysicalResolution> {
        let size = self.state.window.as_ref()?.inner_size();
        PhysicalResolution::new(size.width, size.height).ok()
    }

    /// Replace the window title
    pub fn set_title(&self, title: &str) {
        if let Some(window) = &self.state.window {
            window.set_title(title);
        }
    }

    /// Copy `frame` to the window surface
    ///
    /// The surface follows the framebuffer size; a zero-sized framebuffer
    /// (minimized window) is skipped.
    pub fn present(&mut self, frame: &Framebuffer) -> Result<(), WindowError> {
        let (Some(width), Some(height)) = (NonZeroU32::new(frame.width()), NonZeroU32::new(frame.height()))
        else {
            return Ok(());
        };
        let Some(surface) = self.state.surface.as_mut() else {
            return Err(WindowError::NotCreated);
        };

        if self.surface_size != Some((width, height)) {
            surface.resize(width, height)?;
            self.surface_size = Some((width, height));
        }

        let mut buffer = surface.buffer_mut()?;
        let len = buffer.len().min(frame.pixels().len());
        if let (Some(dst), Some(src)) = (buffer.get_mut(..len), frame.pixels().get(..len)) {
            dst.copy_from_slice(src);
        }
        buffer.present()?;
        Ok(())
    }
}

/// An exit during the setup pump leaves no usable loop to poll
fn check_setup_status(status: PumpStatus) -> Result<(), WindowError> {
    match status {
        PumpStatus::Continue => Ok(()),
        PumpStatus::Exit(code) => Err(WindowError::ExitedDuringSetup(code)),
    }
}
