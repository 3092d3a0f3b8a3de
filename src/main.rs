// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]

//! Status panel daemon.
//!
//! Drives a small display attached to a multi-GPU machine. While the machine
//! is idle the panel shows a bouncing logo (or text pushed by local tools);
//! while the GPUs are busy it shows a live utilization and power dashboard.
//!
//! # Threads
//!
//! | Thread | Work |
//! |--------|------|
//! | `main` | Tokio runtime: control socket accept loop and signal handling |
//! | runtime workers | One task per control connection (decode and enqueue) |
//! | `render` | Frame loop: drain commands, poll sensors, draw, flip |
//!
//! The command queue is the only state shared between them.
//!
//! # Shutdown
//!
//! SIGINT, SIGTERM or a fatal render error ends the accept loop. The render
//! thread is then told to stop (it blanks the panel on the way out), the
//! socket file is removed and in-flight connections are abandoned.

mod cli;

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use cli::{Args, PanelKind};
use status_panel::command::{CommandReceiver, queue};
use status_panel::control::ControlServer;
use status_panel::error::{PanelError, ServiceError};
#[cfg(feature = "window")]
use status_panel::panel::PreviewWindow;
use status_panel::panel::{BufferedPanel, Framebuffer, Headless, Panel};
use status_panel::render::{RenderLoop, RenderSettings};
use status_panel::screens::IdleScreen;
use status_panel::sensors::SysfsSensors;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Log filter used when neither `RUST_LOG` nor `--log-level` is given.
const DEFAULT_LOG_FILTER: &str = "status_panel=info";

/// How long in-flight control connections get to finish on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

fn main() -> ExitCode {
    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    info!("status-panel v{} starting", env!("CARGO_PKG_VERSION"));
    match run(&args) {
        Ok(()) => {
            info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_thread_names(true).init();
}

fn run(args: &Args) -> Result<(), ServiceError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("control")
        .build()
        .map_err(ServiceError::Runtime)?;

    // Socket and signal handlers need the runtime's reactor
    let (server, mut sigint, mut sigterm) = {
        let _guard = runtime.enter();
        let server = ControlServer::bind(&args.socket)?;
        let sigint = signal(SignalKind::interrupt()).map_err(ServiceError::Signals)?;
        let sigterm = signal(SignalKind::terminate()).map_err(ServiceError::Signals)?;
        (server, sigint, sigterm)
    };

    let shutdown = Arc::new(AtomicBool::new(false));
    let (commands, receiver) = queue();
    let (stopped_tx, stopped_rx) = oneshot::channel::<()>();

    let render_thread = {
        let args = args.clone();
        let shutdown = Arc::clone(&shutdown);
        thread::Builder::new()
            .name("render".into())
            .spawn(move || {
                let result = render_main(&args, receiver, &shutdown);
                stopped_tx.send(()).ok();
                result
            })
            .map_err(ServiceError::Spawn)?
    };

    runtime.block_on(async {
        tokio::select! {
            () = server.serve(commands) => {}
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            _ = stopped_rx => info!("Render loop exited"),
        }
    });

    shutdown.store(true, Ordering::Relaxed);
    drop(server);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    render_thread.join().map_err(|_| ServiceError::RenderPanicked)?
}

/// Body of the render thread: load assets, open the panel, run the loop.
fn render_main(args: &Args, commands: CommandReceiver, shutdown: &AtomicBool) -> Result<(), ServiceError> {
    let idle = IdleScreen::load(&args.logo)?;
    let sensors = args.sensors();
    let settings = args.render_settings();

    match args.panel {
        PanelKind::Fbdev => {
            let panel = BufferedPanel::new(Framebuffer::open(&args.device)?);
            drive(panel, sensors, commands, idle, settings, shutdown)
        }
        PanelKind::Headless => {
            info!("Running without a physical panel");
            drive(BufferedPanel::new(Headless), sensors, commands, idle, settings, shutdown)
        }
        #[cfg(feature = "window")]
        PanelKind::Window => {
            let panel = BufferedPanel::new(PreviewWindow::new("status-panel"));
            drive(panel, sensors, commands, idle, settings, shutdown)
        }
        #[cfg(not(feature = "window"))]
        PanelKind::Window => Err(ServiceError::WindowUnavailable),
    }
}

fn drive<P: Panel>(
    panel: P,
    sensors: SysfsSensors,
    commands: CommandReceiver,
    idle: IdleScreen,
    settings: RenderSettings,
    shutdown: &AtomicBool,
) -> Result<(), ServiceError> {
    let mut render = RenderLoop::new(panel, sensors, commands, idle, settings);
    match render.run(shutdown) {
        Ok(()) => Ok(()),
        Err(PanelError::WindowClosed) => {
            info!("Preview window closed");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
