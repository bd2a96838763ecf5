use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use skyflight_input::{PointerEvent, Viewport};
use skyflight_kernel::{AngleMode, AnimatorConfig};
use skyflight_render::{AppState, FrameLoop, FrameOutcome, FrameScheduler, LoopState};
use skyflight_render_wgpu::WgpuRenderer;
use skyflight_tools::{AppInspector, AppSummary, FrameTimer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

#[derive(Parser)]
#[command(name = "skyflight-desktop", about = "Fly the airplane with the mouse")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Animator configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for cloud placement
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Keep angles within [0, 2π)
    #[arg(long)]
    wrap_angles: bool,
}

/// Schedules the next tick as a window redraw.
struct RedrawScheduler<'a>(&'a Window);

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_next_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Window, surface and GPU handles, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Skyflight")
            .with_inner_size(PhysicalSize::new(WIDTH, HEIGHT));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skyflight_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }
}

struct GpuApp {
    app: AppState,
    frame_loop: FrameLoop,
    timer: FrameTimer,
    show_hud: bool,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
}

impl GpuApp {
    fn new(app: AppState) -> Self {
        Self {
            app,
            frame_loop: FrameLoop::new(),
            timer: FrameTimer::new(120),
            show_hud: true,
            egui_ctx: EguiContext::default(),
            gpu: None,
        }
    }

    fn toggle_pause(&mut self) {
        match self.frame_loop.state() {
            LoopState::Running => self.frame_loop.stop(),
            LoopState::Stopped => {
                self.frame_loop.resume();
                // The stopped loop left no frame pending.
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Space => self.toggle_pause(),
            KeyCode::Escape => {
                self.frame_loop.token().cancel();
                tracing::info!(frames = self.frame_loop.frames(), "exiting");
                event_loop.exit();
            }
            KeyCode::F1 => {
                self.show_hud = !self.show_hud;
                if let Some(gpu) = &self.gpu {
                    gpu.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(size);
        }
        match Viewport::new(size.width as f32, size.height as f32) {
            Ok(viewport) => self.app.resize(viewport),
            // Minimized windows report a zero size.
            Err(e) => tracing::debug!("keeping previous viewport: {e}"),
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                gpu.window.request_redraw();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let outcome = {
            let mut frame = gpu.renderer.frame(&gpu.device, &gpu.queue, &view);
            let mut scheduler = RedrawScheduler(gpu.window.as_ref());
            self.frame_loop
                .tick(&mut self.app, &mut frame, &mut scheduler)
        };
        match outcome {
            FrameOutcome::Rendered(()) => self.timer.mark(Instant::now()),
            // The OS still wants pixels while paused: show the last pose.
            FrameOutcome::Stopped => gpu.renderer.draw(
                &gpu.device,
                &gpu.queue,
                &view,
                self.app.scene(),
                self.app.camera(),
            ),
        }

        let mut toggle = false;
        if self.show_hud {
            let summary = AppInspector::summary(&self.app, &self.frame_loop);
            let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                toggle = draw_hud(ctx, &summary, &self.timer);
            });
            gpu.egui_winit
                .handle_platform_output(&gpu.window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [gpu.config.width, gpu.config.height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                gpu.egui_renderer
                    .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("egui_encoder"),
                });
            gpu.egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                gpu.egui_renderer
                    .render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            gpu.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                gpu.egui_renderer.free_texture(id);
            }
        }

        output.present();
        if toggle {
            self.toggle_pause();
        }
    }
}

/// Returns true when the pause button was clicked.
fn draw_hud(ctx: &EguiContext, summary: &AppSummary, timer: &FrameTimer) -> bool {
    let mut clicked = false;
    egui::Window::new("Skyflight")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!(
                "Pointer: ({:+.3}, {:+.3})",
                summary.pointer[0], summary.pointer[1]
            ));
            ui.label(format!(
                "Airplane: ({:.1}, {:.1})",
                summary.plane_position[0], summary.plane_position[1]
            ));
            ui.label(format!("Propeller: {:.2} rad", summary.propeller_angle));
            ui.label(format!(
                "Sea: {:.3} rad  Sky: {:.3} rad",
                summary.sea_angle, summary.sky_angle
            ));
            ui.separator();
            ui.label(format!("Frames: {}", summary.frames));
            ui.label(format!(
                "Frame time: {:.2} ms ({:.0} fps)",
                timer.average().as_secs_f64() * 1000.0,
                timer.fps()
            ));
            ui.label(format!(
                "Scene: {} nodes, {} meshes",
                summary.node_count, summary.mesh_count
            ));
            ui.separator();
            let label = if summary.running {
                "Pause (Space)"
            } else {
                "Resume (Space)"
            };
            clicked = ui.button(label).clicked();
            ui.small("F1: Toggle HUD | Esc: Quit");
        });
    clicked
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => {
                let size = gpu.window.inner_size();
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
                self.resize(size);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.frame_loop.token().cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => self.resize(new_size),
            WindowEvent::CursorMoved { position, .. } => {
                let event = PointerEvent::new(position.x as f32, position.y as f32);
                if let Err(e) = self.app.on_pointer_move(event) {
                    tracing::warn!("dropped pointer event: {e}");
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, key),
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("skyflight-desktop starting");

    let mut config = match &cli.config {
        Some(path) => AnimatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnimatorConfig::default(),
    };
    if cli.wrap_angles {
        config.angle_mode = AngleMode::Wrapped;
    }
    let viewport = Viewport::new(WIDTH as f32, HEIGHT as f32)?;
    let app = AppState::new(viewport, config, cli.seed)?;

    let event_loop = EventLoop::new()?;
    // Frames are driven by redraw requests from the frame loop.
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(app);
    event_loop.run_app(&mut app)?;

    Ok(())
}
