// src/engine/state.rs
use wgpu::{Adapter, Device, Queue, Surface, SurfaceConfiguration};
use winit::event::WindowEvent;
use winit::window::Window;

use super::graphics::Renderer;

// GameState trait defines what all game states must implement
pub trait GameState {
    // Process window events like key presses. Returning true asks the event
    // loop to exit without an outcome (the quit/abort path).
    fn handle_event(&mut self, event: &WindowEvent) -> bool;

    // Advance game logic. Returning true means the session is over and the
    // event loop should exit.
    fn update(&mut self, dt: f32) -> bool;

    // Render the current state
    fn render(
        &mut self,
        renderer: &mut Renderer,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        config: &SurfaceConfiguration,
    ) -> Result<(), wgpu::SurfaceError>;
}

// StateManager is the one context object for a session: it owns the window,
// the graphics resources and the current game state, so there are no
// process-wide singletons and teardown happens on every exit path when the
// manager drops.
pub struct StateManager {
    pub window: Window,
    pub surface: Surface,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    renderer: Renderer,
    current_state: Box<dyn GameState>,
}

impl StateManager {
    pub fn new(
        window: Window,
        surface: Surface,
        adapter: &Adapter,
        device: Device,
        queue: Queue,
        initial_state: Box<dyn GameState>,
    ) -> Self {
        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let renderer = Renderer::new(&device, surface_format);

        Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            renderer,
            current_state: initial_state,
        }
    }

    // Handle window events and pass them to the current state. Returns true
    // when the session should end.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(physical_size) => {
                self.resize(*physical_size);
                false
            }
            WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                self.resize(**new_inner_size);
                false
            }
            _ => self.current_state.handle_event(event),
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    pub fn update(&mut self, dt: f32) -> bool {
        self.current_state.update(dt)
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.current_state.render(
            &mut self.renderer,
            &self.device,
            &self.queue,
            &self.surface,
            &self.config,
        )
    }
}
