use anyhow::Context;
use clap::{Parser, Subcommand};
use skyhop_game::{Game, SkyhopConfig, PROGRAMS};
use skyhop_kernel::GameEvent;
use skyhop_render::{compile_and_link, DebugTextRenderer, ProgramSource, Renderer};
use skyhop_render_wgpu::WgslFrontend;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "skyhop-cli", about = "Headless skyhop tools")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info {
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Run a game without a window and report how it went
    Simulate {
        /// Simulated wall-clock time
        #[arg(short, long, default_value = "10")]
        seconds: f32,
        /// Frames per second fed to the game loop
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Press jump every N frames; the first press starts the round
        #[arg(short, long)]
        jump_every: Option<u32>,
        /// Print a text dump of the final frame
        #[arg(long)]
        dump: bool,
        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compile and link every shader program in a directory
    CheckShaders {
        #[arg(short, long, default_value = "assets/shaders")]
        dir: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SkyhopConfig> {
    Ok(match path {
        Some(path) => SkyhopConfig::load(path)?,
        None => SkyhopConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info { config } => {
            let config = load_config(config.as_ref())?;
            println!("skyhop-cli v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "window: {:?} {}x{}",
                config.window.title, config.window.width, config.window.height
            );
            println!(
                "rules: enemy speed={} spawn={} boundary x={} jump impulse={}",
                config.rules.enemy_speed,
                config.rules.enemy_spawn,
                config.rules.boundary_x,
                config.rules.jump_impulse
            );
            println!(
                "physics: gravity={} fixed step={} max substeps={}",
                config.physics.gravity, config.physics.fixed_step, config.physics.max_substeps
            );
            let names: Vec<&str> = PROGRAMS.iter().map(|(_, name)| *name).collect();
            println!("programs: {}", names.join(", "));
        }
        Commands::Simulate {
            seconds,
            fps,
            jump_every,
            dump,
            config,
        } => {
            let config = load_config(config.as_ref())?;
            let mut game = Game::new(&config)?;
            let fps = fps.max(1);
            let frames = (seconds.max(0.0) * fps as f32).round() as u32;
            let dt = 1.0 / fps as f32;
            println!("Simulating {frames} frames at {fps} fps");

            let mut steps = 0;
            let mut rounds_lost = 0;
            for frame in 0..frames {
                if let Some(every) = jump_every.filter(|n| *n > 0) {
                    if frame % every == 0 {
                        game.press_jump();
                    }
                }
                let report = game.advance(dt);
                steps += report.steps;
                for event in game.session_mut().drain_events() {
                    match event {
                        GameEvent::Collision { .. } => tracing::trace!(?event),
                        _ => tracing::info!(frame, ?event),
                    }
                    if matches!(event, GameEvent::RoundLost { .. }) {
                        rounds_lost += 1;
                    }
                }
            }

            let state = game.session().state();
            println!(
                "steps={steps} score={} game_over={} rounds_lost={rounds_lost}",
                state.score, state.game_over
            );
            if dump {
                print!("{}", DebugTextRenderer::new().render(game.scene(), game.camera()));
            }
        }
        Commands::CheckShaders { dir } => {
            let names = ProgramSource::names_in(&dir)
                .with_context(|| format!("listing {}", dir.display()))?;
            anyhow::ensure!(!names.is_empty(), "no programs in {}", dir.display());
            for name in &names {
                let source = ProgramSource::from_dir(&dir, name)?;
                compile_and_link(&WgslFrontend, &source)
                    .with_context(|| format!("program {name}"))?;
                println!("{name}: ok");
            }
            println!("{} programs checked", names.len());
        }
    }

    Ok(())
}
