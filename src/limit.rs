//! Fixed-window admission control for outbound submissions.
//!
//! A [`RateLimiter`] admits at most [`Window::capacity`] callers per [`Window::duration`]. The
//! counter and window start live behind one lock, so the "roll the window, then admit" step is a
//! single critical section no matter how many tasks race at a boundary. Callers that find the
//! window saturated queue on an async gate and sleep until the boundary instead of polling.

mod limiter;
mod window;

pub use limiter::*;
pub use window::*;
