use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, Operation, SpiDevice};
use ink_display::{DisplayDriver, DisplayError, Epd4in01f};
use ink_image::PanelFrame;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Command(u8),
    Data(usize),
    Reset(bool),
}

#[derive(Default)]
struct Bus {
    events: Vec<Event>,
    dc_high: bool,
    busy_stuck: bool,
}

type Shared = Arc<Mutex<Bus>>;

struct FakeSpi(Shared);
struct FakeDc(Shared);
struct FakeRst(Shared);
struct FakeBusy(Shared);
struct FakeDelay;

impl SpiErrorType for FakeSpi {
    type Error = Infallible;
}

impl SpiDevice for FakeSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Infallible> {
        let mut bus = self.0.lock().unwrap();
        for op in operations {
            if let Operation::Write(bytes) = op {
                let event = if bus.dc_high {
                    Event::Data(bytes.len())
                } else {
                    Event::Command(bytes[0])
                };
                bus.events.push(event);
            }
        }
        Ok(())
    }
}

impl PinErrorType for FakeDc {
    type Error = Infallible;
}

impl OutputPin for FakeDc {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().dc_high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().dc_high = true;
        Ok(())
    }
}

impl PinErrorType for FakeRst {
    type Error = Infallible;
}

impl OutputPin for FakeRst {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().events.push(Event::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.lock().unwrap().events.push(Event::Reset(true));
        Ok(())
    }
}

impl PinErrorType for FakeBusy {
    type Error = Infallible;
}

impl InputPin for FakeBusy {
    // idle (high) except right after power-off, where the panel reports low
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let bus = self.0.lock().unwrap();
        if bus.busy_stuck {
            return Ok(false);
        }
        let last_command = bus.events.iter().rev().find_map(|e| match e {
            Event::Command(c) => Some(*c),
            _ => None,
        });
        Ok(last_command != Some(0x02))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fn driver(bus: &Shared) -> Epd4in01f<FakeSpi, FakeDc, FakeRst, FakeBusy, FakeDelay> {
    Epd4in01f::new(
        FakeSpi(Arc::clone(bus)),
        FakeDc(Arc::clone(bus)),
        FakeRst(Arc::clone(bus)),
        FakeBusy(Arc::clone(bus)),
        FakeDelay,
        Duration::from_secs(1),
    )
}

fn commands(bus: &Shared) -> Vec<u8> {
    bus.lock()
        .unwrap()
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Command(c) => Some(*c),
            _ => None,
        })
        .collect()
}

#[test]
fn test_init_resets_then_configures() {
    let bus = Shared::default();
    let mut epd = driver(&bus);
    epd.init().unwrap();

    let events = bus.lock().unwrap().events.clone();
    assert_eq!(&events[..3], &[Event::Reset(true), Event::Reset(false), Event::Reset(true)]);
    assert_eq!(
        commands(&bus),
        vec![0x00, 0x01, 0x03, 0x06, 0x41, 0x50, 0x60, 0x61, 0xE3, 0x50]
    );
}

#[test]
fn test_write_streams_frame_and_refreshes() {
    let bus = Shared::default();
    let mut epd = driver(&bus);
    epd.init().unwrap();
    bus.lock().unwrap().events.clear();

    epd.write(&PanelFrame::filled(640, 400, 4, 1).unwrap()).unwrap();

    assert_eq!(commands(&bus), vec![0x61, 0x10, 0x04, 0x12, 0x02]);
    let data: usize = bus
        .lock()
        .unwrap()
        .events
        .iter()
        .filter_map(|e| match e {
            Event::Data(n) => Some(*n),
            _ => None,
        })
        .sum();
    // resolution bytes plus the whole frame, sent in bus-sized chunks
    assert_eq!(data, 4 + 128_000);
    assert!(bus.lock().unwrap().events.iter().all(|e| match e {
        Event::Data(n) => *n <= 4096,
        _ => true,
    }));
}

#[test]
fn test_wrong_frame_shape_is_rejected_before_transfer() {
    let bus = Shared::default();
    let mut epd = driver(&bus);
    epd.init().unwrap();
    bus.lock().unwrap().events.clear();

    let result = epd.write(&PanelFrame::filled(320, 200, 4, 1).unwrap());
    assert!(matches!(result, Err(DisplayError::FrameMismatch { .. })));
    assert!(bus.lock().unwrap().events.is_empty());
}

#[test]
fn test_wakes_from_deep_sleep_with_reset() {
    let bus = Shared::default();
    let mut epd = driver(&bus);
    epd.init().unwrap();
    epd.power_down().unwrap();
    assert_eq!(commands(&bus).last(), Some(&0x07));
    bus.lock().unwrap().events.clear();

    epd.write(&PanelFrame::filled(640, 400, 4, 1).unwrap()).unwrap();
    let cmds = commands(&bus);
    assert_eq!(cmds[0], 0x00);
    assert_eq!(&cmds[cmds.len() - 5..], &[0x61, 0x10, 0x04, 0x12, 0x02]);
    assert_eq!(bus.lock().unwrap().events[0], Event::Reset(true));
}

#[test]
fn test_stuck_busy_line_times_out() {
    let bus = Shared::default();
    bus.lock().unwrap().busy_stuck = true;
    let mut epd = Epd4in01f::new(
        FakeSpi(Arc::clone(&bus)),
        FakeDc(Arc::clone(&bus)),
        FakeRst(Arc::clone(&bus)),
        FakeBusy(Arc::clone(&bus)),
        FakeDelay,
        Duration::ZERO,
    );
    assert!(matches!(epd.init(), Err(DisplayError::BusyTimeout(_))));
}
