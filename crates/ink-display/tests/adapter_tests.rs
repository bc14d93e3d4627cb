use ink_display::{AdapterState, DisplayAdapter, DisplayDriver, DisplayError};
use ink_image::PanelFrame;

#[derive(Default)]
struct MockDriver {
    inits: usize,
    writes: Vec<usize>,
    power_downs: usize,
    fail_writes: bool,
}

impl DisplayDriver for MockDriver {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.inits += 1;
        Ok(())
    }

    fn write(&mut self, frame: &PanelFrame) -> Result<(), DisplayError> {
        if self.fail_writes {
            return Err(DisplayError::Io("bus fault".to_string()));
        }
        self.writes.push(frame.data().len());
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), DisplayError> {
        self.power_downs += 1;
        Ok(())
    }
}

struct NoSleepDriver;

impl DisplayDriver for NoSleepDriver {
    fn init(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }

    fn write(&mut self, _frame: &PanelFrame) -> Result<(), DisplayError> {
        Ok(())
    }
}

fn frame() -> PanelFrame {
    PanelFrame::filled(640, 400, 4, 1).unwrap()
}

#[tokio::test]
async fn test_show_before_init_is_refused() {
    let mut adapter = DisplayAdapter::new(MockDriver::default());
    assert!(matches!(adapter.show(frame()).await, Err(DisplayError::NotInitialized)));
    assert!(matches!(adapter.sleep().await, Err(DisplayError::NotInitialized)));
    adapter.with_driver(|d| assert!(d.writes.is_empty()));
}

#[tokio::test]
async fn test_init_runs_once() {
    let mut adapter = DisplayAdapter::new(MockDriver::default());
    adapter.init().await.unwrap();
    assert!(matches!(adapter.init().await, Err(DisplayError::AlreadyInitialized)));
    adapter.with_driver(|d| assert_eq!(d.inits, 1));
    assert_eq!(adapter.state(), AdapterState::Ready);
}

#[tokio::test]
async fn test_show_and_sleep_cycle() {
    let mut adapter = DisplayAdapter::new(MockDriver::default());
    adapter.init().await.unwrap();

    adapter.show(frame()).await.unwrap();
    adapter.sleep().await.unwrap();
    assert_eq!(adapter.state(), AdapterState::Asleep);
    // sleeping twice does not touch the panel again
    adapter.sleep().await.unwrap();

    adapter.show(frame()).await.unwrap();
    assert_eq!(adapter.state(), AdapterState::Ready);
    assert_eq!(adapter.refreshes(), 2);
    adapter.with_driver(|d| {
        assert_eq!(d.inits, 1);
        assert_eq!(d.writes, vec![128_000, 128_000]);
        assert_eq!(d.power_downs, 1);
    });
}

#[tokio::test]
async fn test_write_failure_is_reported_and_adapter_stays_usable() {
    let mut adapter = DisplayAdapter::new(MockDriver {
        fail_writes: true,
        ..Default::default()
    });
    adapter.init().await.unwrap();
    assert!(matches!(adapter.show(frame()).await, Err(DisplayError::Io(_))));
    assert_eq!(adapter.refreshes(), 0);
    assert!(adapter.is_initialized());
}

#[tokio::test]
async fn test_driver_without_sleep_support() {
    let mut adapter = DisplayAdapter::new(NoSleepDriver);
    adapter.init().await.unwrap();
    adapter.sleep().await.unwrap();
    adapter.show(frame()).await.unwrap();
}
