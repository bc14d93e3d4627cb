use crate::{DisplayDriver, DisplayError};
use ink_image::PanelFrame;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    Uninitialized,
    Ready,
    Asleep,
}

/// Owns a `DisplayDriver` for the life of the process.
///
/// `init` runs exactly once; every later `show` reuses the initialized
/// driver. Driver calls block, so they run on tokio's blocking thread pool.
/// The driver is closed when the adapter is dropped.
pub struct DisplayAdapter<D> {
    driver: Arc<Mutex<D>>,
    state: AdapterState,
    refreshes: u64,
}

impl<D: DisplayDriver + 'static> DisplayAdapter<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver: Arc::new(Mutex::new(driver)),
            state: AdapterState::Uninitialized,
            refreshes: 0,
        }
    }

    pub fn state(&self) -> AdapterState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state != AdapterState::Uninitialized
    }

    /// Number of successful `show` calls.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Inspect the driver, e.g. for diagnostics.
    pub fn with_driver<T>(&self, f: impl FnOnce(&D) -> T) -> T {
        let driver = self.driver.lock().unwrap_or_else(|e| e.into_inner());
        f(&driver)
    }

    async fn run_blocking<T: Send + 'static>(
        &self,
        op: impl FnOnce(&mut D) -> Result<T, DisplayError> + Send + 'static,
    ) -> Result<T, DisplayError> {
        let driver = Arc::clone(&self.driver);
        tokio::task::spawn_blocking(move || {
            let mut driver = driver.lock().unwrap_or_else(|e| e.into_inner());
            op(&mut driver)
        })
        .await
        .map_err(|e| DisplayError::Io(format!("display task failed: {e}")))?
    }

    /// Initialize the panel. A second call is refused, since re-initializing
    /// a running controller can leave it in an undefined state.
    pub async fn init(&mut self) -> Result<(), DisplayError> {
        if self.is_initialized() {
            return Err(DisplayError::AlreadyInitialized);
        }
        self.run_blocking(|driver| driver.init()).await?;
        self.state = AdapterState::Ready;
        log::info!("display initialized");
        Ok(())
    }

    /// Push `frame` to the panel and wait for the refresh to finish.
    pub async fn show(&mut self, frame: PanelFrame) -> Result<(), DisplayError> {
        if !self.is_initialized() {
            return Err(DisplayError::NotInitialized);
        }
        self.run_blocking(move |driver| driver.write(&frame)).await?;
        self.state = AdapterState::Ready;
        self.refreshes += 1;
        Ok(())
    }

    /// Put the panel into its low-power hold state until the next `show`.
    pub async fn sleep(&mut self) -> Result<(), DisplayError> {
        match self.state {
            AdapterState::Uninitialized => Err(DisplayError::NotInitialized),
            AdapterState::Asleep => Ok(()),
            AdapterState::Ready => {
                self.run_blocking(|driver| driver.power_down()).await?;
                self.state = AdapterState::Asleep;
                log::debug!("display asleep");
                Ok(())
            }
        }
    }
}
