//! Asynchronous timer abstraction used by the control loop to back off while
//! the bus is idle.
use embassy_time::Duration;

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait PollTimer {
    /// Asynchronously wait for `duration`.
    fn delay<'a>(&'a mut self, duration: Duration) -> impl core::future::Future<Output = ()> + 'a;
}

/// [`PollTimer`] backed by the embassy time driver.
///
/// Only available with the `embassy-timer` feature since it needs a time
/// driver to be linked in.
#[cfg(feature = "embassy-timer")]
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbassyTimer;

#[cfg(feature = "embassy-timer")]
impl PollTimer for EmbassyTimer {
    async fn delay(&mut self, duration: Duration) {
        embassy_time::Timer::after(duration).await;
    }
}
