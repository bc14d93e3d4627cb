use {
    ink_base::{log, log_fatal},
    ink_display::{DisplayAdapter, DisplayDriver, PngDriver},
    ink_frame::{Config, DriverKind, Scheduler, UpdateCycle, config_path},
    ink_render::{ChromiumRenderer, FrameCapture},
    tokio_util::sync::CancellationToken,
};

#[tokio::main]
async fn main() {
    let path = config_path(std::env::args().skip(1));
    let loaded = Config::load(&path);

    let log_dir = loaded.as_ref().ok().and_then(|c| c.log_dir.clone());
    match log_dir {
        Some(dir) => {
            if let Err(e) = ink_base::init_file_logger(&dir) {
                ink_base::init_stdout_logger();
                log::warn!("cannot log to {}: {}, using stdout", dir.display(), e);
            }
        }
        None => ink_base::init_stdout_logger(),
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => log_fatal!("{}: {}", path.display(), e),
    };
    log::info!(
        "panel {}x{} with {} colors, refreshing every {:?}",
        config.display.width,
        config.display.height,
        config.display.colors,
        config.update_interval()
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    match config.display.driver {
        DriverKind::Png => {
            let palette = match config.palette() {
                Ok(palette) => palette,
                Err(e) => log_fatal!("{}", e),
            };
            log::info!("previewing to {}", config.display.png_path.display());
            serve(PngDriver::new(&config.display.png_path, palette), &config, shutdown).await;
        }
        DriverKind::Waveshare => serve_waveshare(&config, shutdown).await,
    }
}

#[cfg(feature = "waveshare")]
async fn serve_waveshare(config: &Config, shutdown: CancellationToken) {
    log::info!("opening panel on {}", config.display.spi_path.display());
    let driver = match ink_display::LinuxEpd4in01f::open(&config.waveshare_config()) {
        Ok(driver) => driver,
        Err(e) => log_fatal!("cannot open panel: {}", e),
    };
    serve(driver, config, shutdown).await;
}

#[cfg(not(feature = "waveshare"))]
async fn serve_waveshare(_config: &Config, _shutdown: CancellationToken) {
    log_fatal!("built without panel support, rebuild with --features waveshare or set display.driver to \"png\"");
}

async fn serve<D: DisplayDriver + 'static>(driver: D, config: &Config, shutdown: CancellationToken) {
    let mut adapter = DisplayAdapter::new(driver);
    if let Err(e) = adapter.init().await {
        log_fatal!("display init failed: {}", e);
    }

    let settings = match config.cycle_settings() {
        Ok(settings) => settings,
        Err(e) => log_fatal!("{}", e),
    };
    let capture = FrameCapture::new(ChromiumRenderer::new(config.chromium_config()));
    let cycle = UpdateCycle::new(capture, adapter, settings, shutdown.clone());

    let mut scheduler = Scheduler::new(cycle, config.update_interval());
    scheduler.run(&shutdown).await;

    let state = scheduler.state().clone();
    let mut adapter = scheduler.into_cycle().into_adapter();
    if let Err(e) = adapter.sleep().await {
        log::warn!("could not put display to sleep: {}", e);
    }
    log::info!(
        "exiting after {} refreshes ({} failed)",
        state.cycles(),
        state.failures()
    );
}

async fn watch_signals(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => log::info!("interrupted"),
                    _ = term.recv() => log::info!("terminated"),
                }
            }
            Err(e) => {
                log::warn!("cannot listen for SIGTERM: {}", e);
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("interrupted");
                }
            }
        }
    }
    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupted");
        }
    }
    log::info!("stopping after the current stage");
    shutdown.cancel();
}
