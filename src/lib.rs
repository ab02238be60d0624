/*!
    uart host link for a cnc controller

    bytes received from the host either carry normal data (g-code lines) which is buffered for the main loop, or realtime commands (reset, feed hold, overrides, ...) which take effect immediately in the receive interrupt, however full the data buffer is. Replies and status reports are queued in a transmit buffer drained by the transmit interrupt.

    start with [Hmi]: create it in a `static`, [split](Hmi::split) it and give each handle to its execution context. On a microcontroller, build it [with_control](Hmi::with_control) so writing enables the transmit ready interrupt. The `io` and `host` features provide async loops driving the interrupt handles from an `embedded-io-async` bus or a tokio serial port.
*/
#![no_std]
#[cfg(feature = "std")]
extern crate std;

mod hmi;

pub mod command;
pub mod config;
pub mod flags;
pub mod machine;
pub mod report;
pub mod ring;
#[cfg(feature = "io")]
pub mod io;
#[cfg(feature = "host")]
pub mod host;

pub use hmi::{Hmi, Host, RxInterrupt, TxInterrupt, TransmitControl};
pub use config::{Config, ConfigError};
pub use machine::{Machine, MachineStatus};
