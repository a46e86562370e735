use std::error::Error;
use std::time::Instant;

use pixels::{PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::view_tree::{PointerInput, ViewTree, draw_view, hit_test_actions};
use crate::{FrameClock, FrameTime};

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

/// Everything the event loop collected since the previous frame.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub pointer: PointerInput,
    pub keys_pressed: Vec<VirtualKeyCode>,
}

impl InputFrame {
    pub fn pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn end_frame(&mut self) {
        self.pointer.mouse_down = false;
        self.pointer.mouse_up = false;
        self.keys_pressed.clear();
    }
}

/// An application driven once per redraw by [`run_scene`].
pub trait SceneApp {
    type Action: Clone;

    fn build_view(&self, surface: SurfaceSize) -> ViewTree<Self::Action>;

    /// Handles this frame's input and advances the animation. Returning `false` exits the loop.
    fn update(&mut self, input: &InputFrame, actions: &[Self::Action], time: FrameTime) -> bool;

    fn render(&mut self, gfx: &mut dyn Renderer2d);
}

pub fn run_scene<A: SceneApp + 'static>(config: AppConfig, mut app: A) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let initial_size = match event_loop.primary_monitor().filter(|_| config.clamp_to_monitor) {
        Some(monitor) => {
            let m = monitor.size();
            PhysicalSize::new(
                config.desired_size.width.min(m.width),
                config.desired_size.height.min(m.height),
            )
        }
        None => config.desired_size,
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));
    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut builder = PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
    if let Some(vsync) = config.vsync {
        builder = builder.enable_vsync(vsync);
    }
    let mut renderer = PixelsRenderer2d::new(builder.build()?, surface_size)?;
    tracing::info!(
        width = surface_size.width,
        height = surface_size.height,
        "window created"
    );

    let mut input = InputFrame::default();
    let mut clock = FrameClock::new();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) = renderer.resize(SurfaceSize::new(size.width, size.height)) {
                        tracing::warn!(%err, "resize failed");
                    }
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    input.pointer.mouse_pos =
                        Some((position.x.max(0.0) as u32, position.y.max(0.0) as u32));
                }
                WindowEvent::CursorLeft { .. } => {
                    input.pointer.mouse_pos = None;
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => input.pointer.mouse_down = true,
                    ElementState::Released => input.pointer.mouse_up = true,
                },
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    input.keys_pressed.push(*key);
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let time = clock.tick(now.saturating_duration_since(last_frame).as_secs_f32());
                last_frame = now;

                let size = renderer.size();
                let view_for_input = app.build_view(size);
                let actions = hit_test_actions(&view_for_input, input.pointer);
                if !app.update(&input, &actions, time) {
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                let view = app.build_view(size);
                let hover = input.pointer.mouse_pos;
                renderer.draw_frame(|gfx| {
                    app.render(gfx);
                    draw_view(&view, hover, gfx);
                });
                if let Err(err) = renderer.present() {
                    tracing::warn!(%err, "present failed");
                }
                input.end_frame();
            }
            Event::MainEventsCleared => {
                window.request_redraw();
            }
            _ => {}
        }
    });
}
