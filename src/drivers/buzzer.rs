// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Piezo buzzer on one PWM channel, driven at 50% duty.

use embedded_hal::Pwm;
use fugit::HertzU32;

use crate::io::Tone;

pub struct Buzzer<P: Pwm> {
    pwm: P,
    channel: P::Channel,
    sounding: Option<u32>,
}

impl<P> Buzzer<P>
where
    P: Pwm<Time = HertzU32, Duty = u16>,
    P::Channel: Copy,
{
    /// Wrap `pwm`, starting silent.
    pub fn new(mut pwm: P, channel: P::Channel) -> Self {
        pwm.disable(channel);
        Self {
            pwm,
            channel,
            sounding: None,
        }
    }

    #[inline]
    pub fn sounding(&self) -> Option<u32> {
        self.sounding
    }

    pub fn free(self) -> P {
        self.pwm
    }
}

impl<P> Tone for Buzzer<P>
where
    P: Pwm<Time = HertzU32, Duty = u16>,
    P::Channel: Copy,
{
    fn tone_on(&mut self, freq_hz: u32) {
        if freq_hz == 0 {
            self.tone_off();
            return;
        }
        if self.sounding == Some(freq_hz) {
            return;
        }
        self.pwm.set_period(HertzU32::from_raw(freq_hz));
        let half = self.pwm.get_max_duty() / 2;
        self.pwm.set_duty(self.channel, half);
        self.pwm.enable(self.channel);
        self.sounding = Some(freq_hz);
    }

    fn tone_off(&mut self) {
        self.pwm.disable(self.channel);
        self.sounding = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePwm {
        period: u32,
        duty: u16,
        enabled: bool,
        periods_set: usize,
    }

    impl Pwm for FakePwm {
        type Channel = ();
        type Time = HertzU32;
        type Duty = u16;

        fn disable(&mut self, _: ()) {
            self.enabled = false;
        }

        fn enable(&mut self, _: ()) {
            self.enabled = true;
        }

        fn get_period(&self) -> HertzU32 {
            HertzU32::from_raw(self.period)
        }

        fn get_duty(&self, _: ()) -> u16 {
            self.duty
        }

        fn get_max_duty(&self) -> u16 {
            1000
        }

        fn set_duty(&mut self, _: (), duty: u16) {
            self.duty = duty;
        }

        fn set_period<T>(&mut self, period: T)
        where
            T: Into<Self::Time>,
        {
            self.period = period.into().raw();
            self.periods_set += 1;
        }
    }

    #[test]
    fn tone_runs_at_half_duty() {
        let mut buzzer = Buzzer::new(FakePwm::default(), ());
        buzzer.tone_on(700);
        assert_eq!(buzzer.sounding(), Some(700));
        let pwm = buzzer.free();
        assert!(pwm.enabled);
        assert_eq!(pwm.get_period().raw(), 700);
        assert_eq!(pwm.duty, 500);
    }

    #[test]
    fn same_tone_is_not_reprogrammed() {
        let mut buzzer = Buzzer::new(FakePwm::default(), ());
        buzzer.tone_on(700);
        buzzer.tone_on(700);
        buzzer.tone_on(440);
        assert_eq!(buzzer.free().periods_set, 2);
    }

    #[test]
    fn off_and_zero_frequency_silence() {
        let mut buzzer = Buzzer::new(FakePwm::default(), ());
        buzzer.tone_on(700);
        buzzer.tone_off();
        assert_eq!(buzzer.sounding(), None);
        buzzer.tone_on(700);
        buzzer.tone_on(0);
        assert!(!buzzer.free().enabled);
    }
}
