// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer and the `log` backend on the debug port.
//!
//! Every `log` record is written as `[LEVEL] message` with a CRLF terminator.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* 115200
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::cell::RefCell;
use core::fmt::{self, Write as _};

use cortex_m::interrupt::{self, Mutex};
use log::{LevelFilter, Metadata, Record};
use nb::block;
use stm32f7xx_hal::{
    pac,
    prelude::*,
    serial::{Instance, Pins, Serial, Tx},
};

pub struct Usart<U: Instance> {
    tx: Tx<U>,
}

impl<U: Instance> Usart<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, _rx) = serial.split();
        Self { tx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Write string and CRLF terminator.
    #[inline]
    pub fn println(&mut self, s: &str) {
        self.write_str(s);
        self.write_str("\r\n");
    }

    /// Block until the hardware TX FIFO/drain is flushed.
    #[inline]
    pub fn flush(&mut self) {
        let _ = block!(self.tx.flush());
    }
}

impl<U: Instance> fmt::Write for Usart<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Usart::write_str(self, s);
        Ok(())
    }
}

/// Debug port used by the logger (USART3, ST-LINK virtual COM port on the F767ZI board).
pub type DebugPort = Usart<pac::USART3>;

static PORT: Mutex<RefCell<Option<DebugPort>>> = Mutex::new(RefCell::new(None));
static LOGGER: UsartLogger = UsartLogger;

/// `log::Log` implementation over [`DebugPort`].
pub struct UsartLogger;

impl UsartLogger {
    /// Hand `port` to the logger and install it. Call once at boot.
    pub fn install(port: DebugPort, level: LevelFilter) {
        interrupt::free(|cs| PORT.borrow(cs).replace(Some(port)));
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl log::Log for UsartLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                let _ = write!(port, "[{}] {}\r\n", record.level(), record.args());
            }
        });
    }

    fn flush(&self) {
        interrupt::free(|cs| {
            if let Some(port) = PORT.borrow(cs).borrow_mut().as_mut() {
                port.flush();
            }
        });
    }
}
