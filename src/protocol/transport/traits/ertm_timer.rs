//! Asynchronous time source used by the channel driver to sleep until the
//! controller's next deadline.
use embassy_time::Instant;

/// Timer trait abstraction. `now` and `wait_until` must share one clock.
pub trait ErtmTimer {
    /// Current instant on the timer's clock.
    fn now(&self) -> Instant;
    /// Asynchronously wait until `deadline` has passed. Returns immediately for
    /// deadlines in the past.
    fn wait_until<'a>(
        &'a mut self,
        deadline: Instant,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
