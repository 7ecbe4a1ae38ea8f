// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Variable-frequency PWM on TIM4 channel 1 (PD12) for the buzzer.
//!
//! The HAL PWM fixes the frequency at construction, so the timer is programmed through the PAC
//! and exposed as an `embedded_hal::Pwm` whose period can change per tone.

use embedded_hal::Pwm;
use fugit::HertzU32;
use stm32f7xx_hal::pac;

pub struct TonePwm {
    tim: pac::TIM4,
    timclk_hz: u32,
}

impl TonePwm {
    /// Configure TIM4 CH1 as PWM mode 1 with preload, output disabled.
    pub fn tim4(tim: pac::TIM4, timclk_hz: u32) -> Self {
        // SAFETY: single read-modify-write of the TIM4 clock enable bit at boot.
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb1enr.modify(|_, w| w.tim4en().set_bit());

        // Disable counter while configuring
        tim.cr1.modify(|_, w| w.cen().clear_bit());

        // CH1 output, PWM mode 1, preload enabled
        tim.ccmr1_output().modify(|_, w| {
            w.oc1pe().set_bit();
            unsafe { w.cc1s().bits(0b00).oc1m().bits(0b110) }
        });
        tim.cr1.modify(|_, w| w.arpe().set_bit());
        tim.ccer.modify(|_, w| w.cc1p().clear_bit().cc1e().clear_bit());

        Self { tim, timclk_hz }
    }

    pub fn free(self) -> pac::TIM4 {
        self.tim
    }
}

impl Pwm for TonePwm {
    type Channel = ();
    type Time = HertzU32;
    type Duty = u16;

    fn disable(&mut self, _: ()) {
        self.tim.ccer.modify(|_, w| w.cc1e().clear_bit());
        self.tim.cr1.modify(|_, w| w.cen().clear_bit());
    }

    fn enable(&mut self, _: ()) {
        self.tim.ccer.modify(|_, w| w.cc1e().set_bit());
        self.tim.cr1.modify(|_, w| w.cen().set_bit());
    }

    fn get_period(&self) -> HertzU32 {
        let psc = self.tim.psc.read().bits() + 1;
        let arr = self.tim.arr.read().bits() + 1;
        HertzU32::from_raw(self.timclk_hz / (psc * arr))
    }

    fn get_duty(&self, _: ()) -> u16 {
        self.tim.ccr1.read().bits() as u16
    }

    fn get_max_duty(&self) -> u16 {
        (self.tim.arr.read().bits() + 1).min(u32::from(u16::MAX)) as u16
    }

    fn set_duty(&mut self, _: (), duty: u16) {
        self.tim.ccr1.write(|w| unsafe { w.bits(u32::from(duty)) });
    }

    fn set_period<P>(&mut self, period: P)
    where
        P: Into<Self::Time>,
    {
        let freq = period.into().raw().max(1);
        let ticks = (self.timclk_hz / freq).max(2);
        let psc = (ticks - 1) / 0x1_0000;
        let arr = ticks / (psc + 1) - 1;

        self.tim.psc.write(|w| unsafe { w.bits(psc) });
        self.tim.arr.write(|w| unsafe { w.bits(arr) });
        // Load the new prescaler and period immediately
        self.tim.egr.write(|w| w.ug().set_bit());
    }
}
