use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes log lines to stdout.
pub struct StdoutLogger;

/// Writes log lines to `<dir>/YYYY-MM-DD.log`, switching files at midnight UTC.
///
/// The frame service runs unattended for months, so a single ever-growing
/// file is not an option.
pub struct FileLogger {
    state: Mutex<FileLoggerState>,
}

struct FileLoggerState {
    dir: PathBuf,
    current_date: String,
    file: File,
}

fn open_day_file(dir: &Path, date: &str) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(format!("{date}.log")))
}

fn format_line(record: &Record) -> String {
    format!(
        "{} [{}] [thread:{:?}] {} {}:{} - {}",
        format_timestamp(),
        record.level(),
        std::thread::current().id(),
        record.target(),
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
        record.args()
    )
}

impl FileLogger {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let current_date = format_today();
        let file = open_day_file(&dir, &current_date)?;
        Ok(FileLogger {
            state: Mutex::new(FileLoggerState {
                dir,
                current_date,
                file,
            }),
        })
    }
}

impl Log for StdoutLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        println!("{}", format_line(record));
    }

    fn flush(&self) {
        std::io::stdout().flush().ok();
    }
}

impl Log for FileLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let today = format_today();
        if today != state.current_date {
            match open_day_file(&state.dir, &today) {
                Ok(file) => {
                    state.file = file;
                    state.current_date = today;
                }
                // keep writing to the old file rather than dropping lines
                Err(e) => eprintln!("Failed to open log file for {}: {}", today, e),
            }
        }

        let line = format_line(record);
        if let Err(e) = writeln!(state.file, "{line}") {
            eprintln!("Failed to write to log file: {}", e);
            eprintln!("{}", line);
        }
    }

    fn flush(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.file.flush().ok();
    }
}

fn unix_secs() -> u64 {
    // a clock before 1970 only happens on an RTC-less board before NTP sync
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Current UTC time as YYYY-MM-DDTHH:MM:SS.
pub fn format_timestamp() -> String {
    let secs = unix_secs();
    let (year, month, day) = civil_from_days((secs / 86400) as i64);
    let time_of_day = secs % 86400;
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

/// Current UTC date as YYYY-MM-DD.
pub fn format_today() -> String {
    let (year, month, day) = civil_from_days((unix_secs() / 86400) as i64);
    format!("{:04}-{:02}-{:02}", year, month, day)
}

/// Days since the Unix epoch to a civil (year, month, day).
/// Howard Hinnant's algorithm, http://howardhinnant.github.io/date_algorithms.html
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };
    (y, m, d)
}

fn max_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install `StdoutLogger` as the global logger. Later calls are no-ops.
pub fn init_stdout_logger() {
    static LOGGER: StdoutLogger = StdoutLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(max_level());
    }
}

/// Install a `FileLogger` writing into `dir` as the global logger.
///
/// Fails if the directory cannot be created or the day file cannot be opened.
/// If a global logger is already installed the new one is leaked and ignored.
pub fn init_file_logger(dir: impl Into<PathBuf>) -> std::io::Result<()> {
    let logger = FileLogger::new(dir)?;
    if log::set_logger(Box::leak(Box::new(logger))).is_ok() {
        log::set_max_level(max_level());
    }
    Ok(())
}

/// Log an error and terminate the process with status 1.
#[macro_export]
macro_rules! log_fatal {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
        $crate::log::logger().flush();
        {
            use std::io::Write;
            let _ = std::io::stdout().flush();
        }
        std::process::exit(1);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_civil_from_days_epoch() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
    }

    #[test]
    fn test_civil_from_days_leap_day() {
        assert_eq!(civil_from_days(11016), (2000, 2, 29));
    }

    #[test]
    fn test_format_timestamp_shape() {
        let ts = format_timestamp();
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[10..11], "T");
    }

    #[test]
    fn test_file_logger_rolls_over_to_new_day() {
        let dir = std::env::temp_dir().join(format!("ink-log-test-{}-rollover", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = FileLogger::new(&dir).unwrap();
        {
            let mut state = logger.state.lock().unwrap();
            state.current_date = "1999-01-01".to_string();
            state.file = open_day_file(&dir, "1999-01-01").unwrap();
        }

        let record = log::RecordBuilder::new()
            .level(log::Level::Info)
            .target("ink")
            .file(Some("cycle.rs"))
            .line(Some(7))
            .args(format_args!("after midnight"))
            .build();
        logger.log(&record);

        let today = format_today();
        let content = fs::read_to_string(dir.join(format!("{today}.log"))).unwrap();
        assert!(content.contains("after midnight"));
        assert!(fs::read_to_string(dir.join("1999-01-01.log")).unwrap().is_empty());
        assert_eq!(logger.state.lock().unwrap().current_date, today);

        fs::remove_dir_all(&dir).ok();
    }
}
