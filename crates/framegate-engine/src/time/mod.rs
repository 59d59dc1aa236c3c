//! Time subsystem.
//!
//! The render driver does not sleep; it asks a [`Ticker`] for the next
//! deadline and hands that to the event loop.

mod ticker;

pub use ticker::Ticker;
