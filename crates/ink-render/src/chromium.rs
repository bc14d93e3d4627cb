use crate::{ReadySelector, RenderError, RenderSession, Renderer};
use ink_base::ViewportSpec;
use ink_image::RawFrame;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::Instant;

// distinguishes scratch directories of sessions within one process
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Configuration for the headless Chromium renderer.
#[derive(Clone, Debug)]
pub struct ChromiumConfig {
    executable: PathBuf,
    args: Vec<String>,
    poll_interval: Duration,
    virtual_time_budget: Duration,
    scratch_dir: PathBuf,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("/usr/bin/chromium-browser"),
            args: vec!["--no-sandbox".to_string(), "--disable-setuid-sandbox".to_string()],
            poll_interval: Duration::from_millis(500),
            virtual_time_budget: Duration::from_millis(2000),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

impl ChromiumConfig {
    /// Set the browser binary.
    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Set extra command-line flags passed on every invocation.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Set the delay between readiness checks.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set how much page time scripts get before the DOM is read or painted.
    pub fn with_virtual_time_budget(mut self, budget: Duration) -> Self {
        self.virtual_time_budget = budget;
        self
    }

    /// Set where per-session profiles and screenshots are created.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn virtual_time_budget(&self) -> Duration {
        self.virtual_time_budget
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }
}

/// Renders pages with a headless Chromium binary.
///
/// Every session gets its own browser profile, so no cookies, cache or
/// storage carry over from one refresh to the next.
#[derive(Debug, Clone)]
pub struct ChromiumRenderer {
    config: ChromiumConfig,
}

impl ChromiumRenderer {
    pub fn new(config: ChromiumConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChromiumConfig {
        &self.config
    }
}

impl Renderer for ChromiumRenderer {
    type Session = ChromiumSession;

    async fn open_session(&self, viewport: ViewportSpec) -> Result<ChromiumSession, RenderError> {
        if !self.config.executable.exists() {
            return Err(RenderError::Failure(format!(
                "browser not found at {}",
                self.config.executable.display()
            )));
        }
        let id = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = self
            .config
            .scratch_dir
            .join(format!("ink-render-{}-{}", std::process::id(), id));
        tokio::fs::create_dir_all(dir.join("profile")).await?;
        log::debug!("opened render session in {}", dir.display());
        Ok(ChromiumSession {
            config: self.config.clone(),
            viewport,
            url: None,
            dir,
        })
    }
}

/// One Chromium session: a private profile directory plus the browser
/// processes started for it. Processes are killed if their future is
/// dropped, and the directory is removed when the session is.
#[derive(Debug)]
pub struct ChromiumSession {
    config: ChromiumConfig,
    viewport: ViewportSpec,
    url: Option<String>,
    dir: PathBuf,
}

impl ChromiumSession {
    fn url(&self) -> Result<&str, RenderError> {
        self.url
            .as_deref()
            .ok_or_else(|| RenderError::Failure("no page loaded, call navigate first".to_string()))
    }

    fn command(&self, extra: &[String]) -> Result<Command, RenderError> {
        let url = self.url()?;
        let mut cmd = Command::new(&self.config.executable);
        cmd.arg("--headless")
            .arg("--disable-gpu")
            .arg("--hide-scrollbars")
            .arg("--no-first-run")
            .arg(format!("--user-data-dir={}", self.dir.join("profile").display()))
            .arg(format!(
                "--window-size={},{}",
                self.viewport.width, self.viewport.height
            ))
            .arg(format!(
                "--virtual-time-budget={}",
                self.config.virtual_time_budget.as_millis()
            ))
            .args(&self.config.args)
            .args(extra)
            .arg(url)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        Ok(cmd)
    }

    async fn dump_dom(&self) -> Result<String, RenderError> {
        let output = self
            .command(&["--dump-dom".to_string()])?
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await?;
        if !output.status.success() {
            return Err(RenderError::Failure(format!(
                "browser exited with {} while loading {}",
                output.status,
                self.url()?
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Turn a file path or URL into something the browser can load.
pub fn resolve_source(source: &str) -> Result<String, RenderError> {
    if source.contains("://") || source.starts_with("about:") || source.starts_with("data:") {
        return Ok(source.to_string());
    }
    let path = std::fs::canonicalize(source)
        .map_err(|e| RenderError::Failure(format!("cannot open source {source}: {e}")))?;
    Ok(format!("file://{}", path.display()))
}

impl RenderSession for ChromiumSession {
    async fn navigate(&mut self, source: &str) -> Result<(), RenderError> {
        self.url = Some(resolve_source(source)?);
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), RenderError> {
        let selector = ReadySelector::parse(selector)?;
        let deadline = Instant::now() + timeout;
        loop {
            let dom = tokio::time::timeout_at(deadline, self.dump_dom())
                .await
                .map_err(|_| RenderError::Timeout(timeout))??;
            if selector.matches(&dom) {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(RenderError::Timeout(timeout));
            }
            tokio::time::sleep_until(deadline.min(now + self.config.poll_interval)).await;
        }
    }

    async fn snapshot(&mut self) -> Result<RawFrame, RenderError> {
        let path = self.dir.join("snapshot.png");
        let status = self
            .command(&[format!("--screenshot={}", path.display())])?
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !status.success() {
            return Err(RenderError::Failure(format!("screenshot exited with {status}")));
        }
        let encoded = tokio::fs::read(&path).await?;
        tokio::fs::remove_file(&path).await.ok();
        let frame = tokio::task::spawn_blocking(move || RawFrame::decode(&encoded))
            .await
            .map_err(|e| RenderError::Failure(format!("decode task failed: {e}")))??;
        Ok(frame)
    }

    async fn close(self) -> Result<(), RenderError> {
        tokio::fs::remove_dir_all(&self.dir).await?;
        Ok(())
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // no-op after a successful close
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir).ok();
        }
    }
}
