//! Win notification.

/// Fire-and-forget hook invoked once per winning move.
///
/// The controller never inspects the result of a celebration, so an
/// implementation that fails should log and return.
pub trait Notifier {
    /// Celebrates a win.
    fn celebrate(&mut self);
}

impl<F: FnMut()> Notifier for F {
    fn celebrate(&mut self) {
        self()
    }
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn celebrate(&mut self) {}
}
