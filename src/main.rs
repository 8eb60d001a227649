mod engine;
mod game;

use anyhow::Context;
use winit::{
    event::Event,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use engine::graphics::Timer;
use engine::state::StateManager;
use game::config::load_config;
use game::states::playing::PlayingState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = load_config().context("failed to load game config")?;

    // Initialize the event loop and a fixed-size window
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(config.window_title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window_width,
            config.window_height,
        ))
        .with_resizable(false)
        .build(&event_loop)
        .context("failed to create window")?;

    // Acquire the graphics stack; any failure here aborts the process
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        dx12_shader_compiler: Default::default(),
    });

    let surface =
        unsafe { instance.create_surface(&window) }.context("failed to create surface")?;

    let adapter = futures::executor::block_on(instance.request_adapter(
        &wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        },
    ))
    .context("no suitable GPU adapter found")?;

    let (device, queue) = futures::executor::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            features: wgpu::Features::empty(),
            limits: wgpu::Limits::default(),
            label: None,
        },
        None,
    ))
    .context("failed to create device")?;

    let playing_state = Box::new(PlayingState::new(config));
    let mut state_manager =
        StateManager::new(window, surface, &adapter, device, queue, playing_state);

    // Timer for calculating delta time between frames
    let mut timer = Timer::new();

    log::info!("session starting");

    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, window_id } if window_id == state_manager.window.id() => {
                if state_manager.handle_window_event(&event) {
                    log::info!("session closed");
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                let dt = timer.delta();
                if state_manager.update(dt) {
                    log::info!("session over");
                    *control_flow = ControlFlow::Exit;
                } else {
                    state_manager.window.request_redraw();
                }
            }
            Event::RedrawRequested(window_id) if window_id == state_manager.window.id() => {
                match state_manager.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => state_manager.resize(state_manager.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, exiting");
                        *control_flow = ControlFlow::Exit;
                    }
                    Err(err) => log::warn!("surface error: {:?}", err),
                }
            }
            _ => {}
        }
    });
}
