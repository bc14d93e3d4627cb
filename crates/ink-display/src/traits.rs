use crate::DisplayError;
use ink_image::PanelFrame;

/// A panel controller reachable over some bus.
///
/// All calls block until the hardware is done; a full-color refresh takes
/// tens of seconds. Implementations bound every wait on the panel.
pub trait DisplayDriver: Send {
    /// Reset and configure the controller. Called once per process.
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Transfer `frame` and refresh the panel.
    fn write(&mut self, frame: &PanelFrame) -> Result<(), DisplayError>;

    /// Enter the low-power hold state. Panels without one do nothing.
    fn power_down(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
