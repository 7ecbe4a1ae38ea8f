// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! WS2812 ("NeoPixel") chains: the 16-pixel ring, the 7-pixel jewel and the 8-pixel stick.
//!
//! Colors are buffered here and written out in one burst on flush. The line encoding is left to a
//! [`SmartLedsWrite`] backend (`ws2812-spi` on the board).

use heapless::Vec;
use smart_leds::{SmartLedsWrite, RGB8};

use crate::io::{Color, Indicator};

/// Longest chain on the board.
pub const MAX_PIXELS: usize = 16;

#[inline]
fn rgb8(color: Color) -> RGB8 {
    let (r, g, b) = color.rgb();
    RGB8::new(r, g, b)
}

pub struct NeoPixel<W> {
    writer: W,
    pixels: Vec<Color, MAX_PIXELS>,
    dirty: bool,
}

impl<W, E> NeoPixel<W>
where
    W: SmartLedsWrite<Color = RGB8, Error = E>,
{
    /// A chain of `len` pixels (at most [`MAX_PIXELS`]), all off. The first flush writes it out.
    pub fn new(writer: W, len: usize) -> Self {
        let mut pixels = Vec::new();
        pixels.resize(len.min(MAX_PIXELS), Color::Black).ok();
        Self {
            writer,
            pixels,
            dirty: true,
        }
    }

    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    pub fn write(&mut self) -> Result<(), E> {
        self.writer.write(self.pixels.iter().map(|&c| rgb8(c)))
    }

    pub fn free(self) -> W {
        self.writer
    }
}

impl<W, E> Indicator for NeoPixel<W>
where
    W: SmartLedsWrite<Color = RGB8, Error = E>,
    E: core::fmt::Debug,
{
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set(&mut self, index: usize, color: Color) {
        if let Some(px) = self.pixels.get_mut(index) {
            if *px != color {
                *px = color;
                self.dirty = true;
            }
        }
    }

    fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        match self.write() {
            Ok(()) => self.dirty = false,
            Err(e) => log::warn!("neopixel: write failed: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::io::BRIGHTNESS;

    /// Records every frame written to the chain.
    #[derive(Clone, Default)]
    struct Recorder {
        frames: Rc<RefCell<std::vec::Vec<std::vec::Vec<RGB8>>>>,
        failing: Rc<RefCell<bool>>,
    }

    impl SmartLedsWrite for Recorder {
        type Error = ();
        type Color = RGB8;

        fn write<T, I>(&mut self, iterator: T) -> Result<(), ()>
        where
            T: IntoIterator<Item = I>,
            I: Into<RGB8>,
        {
            if *self.failing.borrow() {
                return Err(());
            }
            let frame = iterator.into_iter().map(Into::into).collect();
            self.frames.borrow_mut().push(frame);
            Ok(())
        }
    }

    #[test]
    fn first_flush_blanks_the_chain() {
        let rec = Recorder::default();
        let mut strip = NeoPixel::new(rec.clone(), 7);
        strip.flush();
        let frames = rec.frames.borrow();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], vec![RGB8::default(); 7]);
    }

    #[test]
    fn flush_writes_only_after_a_change() {
        let rec = Recorder::default();
        let mut strip = NeoPixel::new(rec.clone(), 16);
        strip.flush();
        strip.set(3, Color::Black);
        strip.flush();
        assert_eq!(rec.frames.borrow().len(), 1);

        strip.set(3, Color::Red);
        strip.set(40, Color::Blue);
        strip.flush();
        let frames = rec.frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1][3], RGB8::new(BRIGHTNESS, 0, 0));
        assert_eq!(frames[1].len(), 16);
    }

    #[test]
    fn failed_write_is_retried() {
        let rec = Recorder::default();
        let mut strip = NeoPixel::new(rec.clone(), 8);
        *rec.failing.borrow_mut() = true;
        strip.set_all(Color::Green);
        strip.flush();
        *rec.failing.borrow_mut() = false;
        strip.flush();
        let frames = rec.frames.borrow();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].iter().all(|&px| px == RGB8::new(0, BRIGHTNESS, 0)));
    }

    #[test]
    fn chain_length_is_capped() {
        let strip = NeoPixel::new(Recorder::default(), 40);
        assert_eq!(strip.len(), MAX_PIXELS);
        assert_eq!(strip.pixel(15), Some(Color::Black));
        assert_eq!(strip.pixel(16), None);
    }
}
