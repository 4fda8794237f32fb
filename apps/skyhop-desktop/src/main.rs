use anyhow::{Context, Result};
use clap::Parser;
use skyhop_game::{Game, SkyhopConfig, GROUND_TEXTURE, HERO_TEXTURE, PROGRAMS};
use skyhop_input::{Action, Key, KeyEvent};
use skyhop_render::{compile_and_link, GlyphTable, ProgramId, ProgramSource};
use skyhop_render_wgpu::{GpuProgram, GpuTexture, WgpuRenderer, WgslFrontend};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent as WinitKeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "skyhop-desktop", about = "Jump the sphere over the oncoming box")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML configuration file; defaults apply to anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding shaders/, fonts/ and textures/
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

/// Assets read before the window opens. Missing files here are fatal.
struct Preloaded {
    programs: Vec<(ProgramId, ProgramSource)>,
    glyphs: GlyphTable,
}

impl Preloaded {
    fn read(config: &SkyhopConfig) -> Result<Self> {
        let assets = &config.assets;
        let programs = PROGRAMS
            .iter()
            .map(|(id, name)| Ok((*id, ProgramSource::from_dir(&assets.shader_dir, name)?)))
            .collect::<Result<Vec<_>>>()?;
        let glyphs = GlyphTable::load(&assets.font, assets.font_pixel_size)
            .with_context(|| format!("loading font {}", assets.font.display()))?;
        Ok(Self { programs, glyphs })
    }
}

struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
}

struct GameApp {
    config: SkyhopConfig,
    game: Game,
    preloaded: Option<Preloaded>,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    last_frame: Instant,
    fatal: Option<anyhow::Error>,
}

impl GameApp {
    fn new(config: SkyhopConfig, preloaded: Preloaded) -> Result<Self> {
        let game = Game::new(&config)?;
        Ok(Self {
            config,
            game,
            preloaded: Some(preloaded),
            window: None,
            gpu: None,
            last_frame: Instant::now(),
            fatal: None,
        })
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let win = &self.config.window;
        let attrs = Window::default_attributes()
            .with_title(win.title.clone())
            .with_inner_size(PhysicalSize::new(win.width, win.height))
            .with_resizable(false);
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
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("skyhop_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        self.game.camera_mut().set_viewport(config.width, config.height);

        let mut renderer =
            WgpuRenderer::new(&device, &queue, surface_format, config.width, config.height)?;
        let preloaded = self
            .preloaded
            .take()
            .context("GPU initialized twice")?;
        for (id, source) in &preloaded.programs {
            // Compile and link failures are already logged; drawables using
            // the program are simply not drawn.
            if let Ok(linked) = compile_and_link(&WgslFrontend, source) {
                renderer.add_program(*id, GpuProgram::upload(&device, &linked)?);
            }
        }
        let assets = &self.config.assets;
        renderer.add_texture(
            HERO_TEXTURE,
            GpuTexture::load(&device, &queue, &assets.hero_texture)?,
        );
        renderer.add_texture(
            GROUND_TEXTURE,
            GpuTexture::load(&device, &queue, &assets.ground_texture)?,
        );
        renderer.set_glyphs(&device, &queue, preloaded.glyphs)?;
        renderer.prepare(&device, self.game.scene())?;

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.window = Some(window);
        self.gpu = Some(Gpu {
            surface,
            device,
            queue,
            config,
            renderer,
        });
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) -> Result<()> {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.game.advance(dt);
        for event in self.game.session_mut().drain_events() {
            tracing::debug!(?event, "game event");
        }

        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        gpu.renderer.prepare(&gpu.device, self.game.scene())?;

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        gpu.renderer.render(
            &gpu.device,
            &gpu.queue,
            &view,
            self.game.scene(),
            self.game.camera(),
        );
        output.present();
        Ok(())
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

impl ApplicationHandler for GameApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_gpu(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.config.width = new_size.width.max(1);
                    gpu.config.height = new_size.height.max(1);
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    gpu.renderer
                        .resize(&gpu.device, gpu.config.width, gpu.config.height);
                    self.game
                        .camera_mut()
                        .set_viewport(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    WinitKeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                let event = KeyEvent {
                    key: map_key(code),
                    pressed: state == ElementState::Pressed,
                    repeat,
                };
                if self.game.handle_key(event) == Action::Quit {
                    tracing::info!("quit requested");
                    event_loop.exit();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                    return;
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("skyhop-desktop starting");

    let config = match &cli.config {
        Some(path) => SkyhopConfig::load(path)?,
        None => SkyhopConfig::default(),
    }
    .with_asset_root(&cli.assets);
    let preloaded = Preloaded::read(&config)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GameApp::new(config, preloaded)?;
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
