// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! DFRobot DFR0760 (Gravity) text-to-speech module over I2C.
//!
//! Every command is a frame `FD len_hi len_lo cmd [payload]` where `len` counts the command byte
//! and the payload. The module answers single-byte plain reads: `'A'` once synthesis has started,
//! `'O'` when it is idle.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Read, Write};
use heapless::Vec;

use crate::config::SpeechMode;
use crate::io::{Speech, MAX_SPEECH_LEN};

const HEADER: u8 = 0xFD;
const SYNC: u8 = 0xAA;

// Commands
const START_SYNTHESIS: u8 = 0x01;
const STOP_SYNTHESIS: u8 = 0x02;
const SLEEP: u8 = 0x88;
const WAKE: u8 = 0xFF;
const INQUIRY: u8 = 0x21;

/// Text encoding byte for plain ASCII.
const ENCODING_ASCII: u8 = 0x00;

// Status replies
const ACK_SPEAKING: u8 = b'A';
const ACK_READY: u8 = b'O';

const INIT_ATTEMPTS: u32 = 40;
const START_POLLS: u32 = 100;
const FINISH_POLLS: u32 = 250;

/// Frame header plus command and encoding bytes.
const FRAME_OVERHEAD: usize = 5;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error<E> {
    Bus(E),
    /// Text longer than [`MAX_SPEECH_LEN`].
    TooLong,
    /// The module never reported ready during [`Dfr0760::init`].
    NotReady,
    /// The module was still talking after the blocking wait gave up.
    Timeout,
}

pub struct Dfr0760<I2C, D> {
    i2c: I2C,
    delay: D,
    addr: u8,
    mode: SpeechMode,
}

impl<I2C, E, D> Dfr0760<I2C, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    D: DelayMs<u32>,
{
    pub fn new(i2c: I2C, delay: D, addr: u8, mode: SpeechMode) -> Self {
        Self {
            i2c,
            delay,
            addr,
            mode,
        }
    }

    fn command(&mut self, cmd: u8) -> Result<(), Error<E>> {
        self.i2c
            .write(self.addr, &[HEADER, 0x00, 0x01, cmd])
            .map_err(Error::Bus)
    }

    fn status(&mut self) -> Result<u8, Error<E>> {
        let mut buf = [0u8];
        self.i2c.read(self.addr, &mut buf).map_err(Error::Bus)?;
        Ok(buf[0])
    }

    /// Wait for the module to come up, then set the volume (0..=9).
    pub fn init(&mut self, volume: u8) -> Result<(), Error<E>> {
        let mut ready = false;
        for _ in 0..INIT_ATTEMPTS {
            if self.i2c.write(self.addr, &[SYNC]).is_err() {
                self.delay.delay_ms(50);
                continue;
            }
            self.delay.delay_ms(50);
            if self.command(INQUIRY).is_err() {
                self.delay.delay_ms(50);
                continue;
            }
            self.delay.delay_ms(20);
            if let Ok(ACK_READY) = self.status() {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(Error::NotReady);
        }
        self.set_volume(volume)
    }

    /// Volume is an inline `[vN]` tag; levels above 9 are clamped.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error<E>> {
        let tag = [b'[', b'v', b'0' + volume.min(9), b']'];
        self.say_bytes(&tag)
    }

    pub fn say_text(&mut self, text: &str) -> Result<(), Error<E>> {
        self.say_bytes(text.as_bytes())
    }

    fn say_bytes(&mut self, text: &[u8]) -> Result<(), Error<E>> {
        if text.is_empty() {
            return Ok(());
        }
        if text.len() > MAX_SPEECH_LEN {
            return Err(Error::TooLong);
        }

        let len = (2 + text.len()) as u16;
        let mut frame: Vec<u8, { MAX_SPEECH_LEN + FRAME_OVERHEAD }> = Vec::new();
        let [hi, lo] = len.to_be_bytes();
        frame
            .extend_from_slice(&[HEADER, hi, lo, START_SYNTHESIS, ENCODING_ASCII])
            .and_then(|()| frame.extend_from_slice(text))
            .map_err(|()| Error::TooLong)?;
        self.i2c.write(self.addr, &frame).map_err(Error::Bus)?;

        match self.mode {
            SpeechMode::FireAndForget => Ok(()),
            SpeechMode::Blocking => self.wait_until_done(),
        }
    }

    /// Block until the module has started and then finished speaking.
    pub fn wait_until_done(&mut self) -> Result<(), Error<E>> {
        for _ in 0..START_POLLS {
            match self.status() {
                Ok(ACK_SPEAKING) => break,
                Ok(ACK_READY) => {
                    log::debug!("dfr0760: idle before speech started");
                    return Ok(());
                }
                _ => {}
            }
            self.delay.delay_ms(20);
        }
        self.delay.delay_ms(100);

        for _ in 0..FINISH_POLLS {
            if self.command(INQUIRY).is_ok() {
                self.delay.delay_ms(10);
                if let Ok(ACK_READY) = self.status() {
                    return Ok(());
                }
            }
            self.delay.delay_ms(50);
        }
        Err(Error::Timeout)
    }

    /// Cut off the current utterance.
    pub fn stop(&mut self) -> Result<(), Error<E>> {
        self.command(STOP_SYNTHESIS)?;
        self.delay.delay_ms(50);
        Ok(())
    }

    pub fn sleep(&mut self) -> Result<(), Error<E>> {
        self.command(SLEEP)?;
        self.delay.delay_ms(50);
        Ok(())
    }

    pub fn wake(&mut self) -> Result<(), Error<E>> {
        self.command(WAKE)?;
        self.delay.delay_ms(100);
        Ok(())
    }
}

impl<I2C, E, D> Speech for Dfr0760<I2C, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    E: core::fmt::Debug,
    D: DelayMs<u32>,
{
    fn say(&mut self, text: &str) {
        if let Err(e) = self.say_text(text) {
            log::warn!("dfr0760: say {:?} failed: {:?}", text, e);
        }
    }
}
