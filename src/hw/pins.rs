// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F767ZI puzzle box.
//!
//! Logical MCU input slot `n` (see [`crate::config::PinMap`]) is wired to port pin PFn.

use stm32f7xx_hal::{
    gpio::{
        gpioa, gpiob, gpioc, gpiod, gpioe, gpiof, Alternate, Input, OpenDrain, Output, PullDown,
        PullUp, PushPull,
    },
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```rust,ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE, dp.GPIOF);
/// ```
pub struct BoardPins {
    /// LD1, heartbeat.
    pub status_led: gpiob::PB0<Output<PushPull>>,
    pub usart3: Usart3Pins,
    pub i2c1: I2c1Pins,
    /// 16-pixel ring.
    pub spi1: Spi1Pins,
    /// 7-pixel jewel.
    pub spi2: Spi2Pins,
    /// 8-pixel stick.
    pub spi4: Spi4Pins,
    pub buzzer: gpiod::PD12<Alternate<2>>, // TIM4_CH1
    pub inputs: McuInputPins,
}

pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// Shared I2C bus: expanders, IMU, TTS, 7-segment.
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

pub struct Spi1Pins {
    pub sck: gpioa::PA5<Alternate<5>>,
    pub miso: gpioa::PA6<Alternate<5>>,
    pub mosi: gpioa::PA7<Alternate<5>>,
}

pub struct Spi2Pins {
    pub sck: gpiob::PB10<Alternate<5>>,
    pub miso: gpioc::PC2<Alternate<5>>,
    pub mosi: gpioc::PC3<Alternate<5>>,
}

pub struct Spi4Pins {
    pub sck: gpioe::PE12<Alternate<5>>,
    pub miso: gpioe::PE13<Alternate<5>>,
    pub mosi: gpioe::PE14<Alternate<5>>,
}

/// Buttons and selects are active-low with pull-ups; toggle switches pull down.
pub struct McuInputPins {
    pub pose_select: gpiof::PF0<Input<PullUp>>,
    pub switch0: gpiof::PF3<Input<PullDown>>,
    pub switch1: gpiof::PF4<Input<PullDown>>,
    pub switch2: gpiof::PF5<Input<PullDown>>,
    pub switch3: gpiof::PF6<Input<PullDown>>,
    pub switch4: gpiof::PF7<Input<PullDown>>,
    pub memory_select: gpiof::PF8<Input<PullUp>>,
    pub green_button: gpiof::PF10<Input<PullUp>>,
    pub blue_button: gpiof::PF11<Input<PullUp>>,
    pub yellow_button: gpiof::PF12<Input<PullUp>>,
    pub switch_select: gpiof::PF14<Input<PullUp>>,
    pub red_button: gpiof::PF15<Input<PullUp>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(
        gpioa: pac::GPIOA,
        gpiob: pac::GPIOB,
        gpioc: pac::GPIOC,
        gpiod: pac::GPIOD,
        gpioe: pac::GPIOE,
        gpiof: pac::GPIOF,
    ) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();
        let gpiof = gpiof.split();

        Self {
            status_led: gpiob.pb0.into_push_pull_output(),

            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            spi1: Spi1Pins {
                sck: gpioa.pa5.into_alternate::<5>(),
                miso: gpioa.pa6.into_alternate::<5>(),
                mosi: gpioa.pa7.into_alternate::<5>(),
            },

            spi2: Spi2Pins {
                sck: gpiob.pb10.into_alternate::<5>(),
                miso: gpioc.pc2.into_alternate::<5>(),
                mosi: gpioc.pc3.into_alternate::<5>(),
            },

            spi4: Spi4Pins {
                sck: gpioe.pe12.into_alternate::<5>(),
                miso: gpioe.pe13.into_alternate::<5>(),
                mosi: gpioe.pe14.into_alternate::<5>(),
            },

            buzzer: gpiod.pd12.into_alternate::<2>(),

            inputs: McuInputPins {
                pose_select: gpiof.pf0.into_pull_up_input(),
                switch0: gpiof.pf3.into_pull_down_input(),
                switch1: gpiof.pf4.into_pull_down_input(),
                switch2: gpiof.pf5.into_pull_down_input(),
                switch3: gpiof.pf6.into_pull_down_input(),
                switch4: gpiof.pf7.into_pull_down_input(),
                memory_select: gpiof.pf8.into_pull_up_input(),
                green_button: gpiof.pf10.into_pull_up_input(),
                blue_button: gpiof.pf11.into_pull_up_input(),
                yellow_button: gpiof.pf12.into_pull_up_input(),
                switch_select: gpiof.pf14.into_pull_up_input(),
                red_button: gpiof.pf15.into_pull_up_input(),
            },
        }
    }
}
