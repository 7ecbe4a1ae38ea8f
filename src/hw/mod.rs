// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # MCU Wrappers
//!
//! STM32F767 peripherals the firmware touches directly. Only built for the bare-metal target;
//! everything above this layer is generic over `embedded-hal` traits.
//!
//! - [`clock`] – SysTick millisecond clock and a busy-wait delay
//! - [`led`] – Status LED
//! - [`pins`] – Board pin map
//! - [`rng`] – Hardware RNG (PRNG seed)
//! - [`tone`] – TIM4 PWM for the buzzer
//! - [`usart`] – Debug USART and the `log` backend

pub mod clock;
pub mod led;
pub mod pins;
pub mod rng;
pub mod tone;
pub mod usart;

pub use clock::SpinDelay;
pub use led::Led;
pub use pins::BoardPins;
pub use rng::HwRng;
pub use tone::TonePwm;
pub use usart::{DebugPort, Usart, UsartLogger};
