// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Puzzle box firmware entry point.
//!
//! Brings up clocks, pins, the debug logger and every device, wires them into a [`Board`], then
//! polls the game controller every `TICK_MS` for the rest of time.
//!
//! On the host this binary is an empty stub so `cargo test` can build the workspace.

#![cfg_attr(target_os = "none", no_std, no_main)]

#[cfg(target_os = "none")]
mod firmware {
    use cortex_m_rt::{entry, exception};
    use panic_halt as _;

    use hal::{
        i2c::{BlockingI2c, Mode as I2cMode},
        pac,
        prelude::*,
        serial::{Config, Serial},
        spi::Spi,
    };
    use log::LevelFilter;
    use stm32f7xx_hal as hal;
    use ws2812_spi::{Ws2812, MODE as WS2812_MODE};

    use puzzlebox::board::Board;
    use puzzlebox::config::{
        GameConfig, MemorySequenceConfig, PinMap, PoseHoldConfig, SequenceMatchConfig, SpeechMode,
        SwitchMappingConfig, DFR0760_ADDR, EXPANDER0_ADDR, EXPANDER1_ADDR, JEWEL_LEN,
        LSM6DSO_ADDR, RING_LEN, SEG7_ADDR, STICK_LEN, TICK_MS, TTS_VOLUME, VERBOSE,
    };
    use puzzlebox::control::time::{elapsed, ms};
    use puzzlebox::control::{FeedbackHub, SeededRandom, Sinks};
    use puzzlebox::drivers::{
        BankedInputs, Buzzer, Dfr0760, ExpanderInputs, Keypad, Lsm6dso, McuInputs, NeoPixel,
        RgbLamp, Seg7, Sx1509,
    };
    use puzzlebox::game::GameController;
    use puzzlebox::hw::{self, BoardPins, HwRng, Led, SpinDelay, TonePwm, Usart, UsartLogger};
    use puzzlebox::puzzles::{
        AnyPuzzle, MemorySequence, PoseHold, SequenceMatch, SwitchMapping,
    };

    /// Heartbeat LED half-period.
    const HEARTBEAT_MS: u32 = 1000;

    #[entry]
    fn main() -> ! {
        // Peripherals
        let dp = pac::Peripherals::take().unwrap();
        let mut cp = cortex_m::Peripherals::take().unwrap();

        // RNG clock must be enabled before RCC is handed to the HAL
        let mut hw_rng = HwRng::new(dp.RNG);

        // Clocks
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
        let mut apb1 = rcc.apb1;
        let mut apb2 = rcc.apb2;
        let sysclk_hz = clocks.sysclk().raw();
        hw::clock::start(&mut cp.SYST, sysclk_hz);
        let delay = SpinDelay::new(sysclk_hz);

        // GPIO
        let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD, dp.GPIOE, dp.GPIOF);
        let mut led = Led::active_high(pins.status_led);

        // USART3 (DBG)
        let usart_cfg = Config {
            baud_rate: 115_200.bps(),
            ..Default::default()
        };
        let serial = Serial::new(dp.USART3, (pins.usart3.tx, pins.usart3.rx), &clocks, usart_cfg);
        let level = if VERBOSE {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        UsartLogger::install(Usart::new(serial), level);
        log::info!("puzzlebox: boot, sysclk {} Hz", sysclk_hz);

        let mut rng = SeededRandom::new(hw_rng.seed());

        // I2C1, shared by every I2C device
        let i2c = BlockingI2c::i2c1(
            dp.I2C1,
            (pins.i2c1.scl, pins.i2c1.sda),
            I2cMode::standard(100.kHz()),
            &clocks,
            &mut apb1,
            50_000,
        );
        let i2c_bus = shared_bus::BusManagerSimple::new(i2c);

        let map = PinMap::DEFAULT;

        let mut expander0 = Sx1509::new(i2c_bus.acquire_i2c(), EXPANDER0_ADDR);
        let mut expander1 = Sx1509::new(i2c_bus.acquire_i2c(), EXPANDER1_ADDR);
        for dev in [&mut expander0, &mut expander1] {
            if let Err(e) = dev.reset() {
                log::warn!("sx1509@{:#04x}: reset failed: {:?}", dev.addr(), e);
            }
        }
        let mut exp0_inputs = ExpanderInputs::new(expander0);
        let mut exp1_inputs = ExpanderInputs::new(expander1);

        let mut keypad = Keypad::new(
            Sx1509::new(i2c_bus.acquire_i2c(), EXPANDER1_ADDR),
            delay,
            map.keypad_rows,
            map.keypad_cols,
        );
        if let Err(e) = keypad.init() {
            log::warn!("keypad: init failed: {:?}", e);
        }

        let mut lamp = RgbLamp::new(
            Sx1509::new(i2c_bus.acquire_i2c(), EXPANDER1_ADDR),
            map.lamp_red,
            map.lamp_green,
            map.lamp_blue,
        );
        if let Err(e) = lamp.init() {
            log::warn!("lamp: init failed: {:?}", e);
        }

        let mut imu = Lsm6dso::new(i2c_bus.acquire_i2c(), LSM6DSO_ADDR);

        let mut tts = Dfr0760::new(
            i2c_bus.acquire_i2c(),
            delay,
            DFR0760_ADDR,
            SpeechMode::FireAndForget,
        );
        if let Err(e) = tts.init(TTS_VOLUME) {
            log::warn!("dfr0760: init failed: {:?}", e);
        }

        let mut seg7 = Seg7::new(i2c_bus.acquire_i2c(), SEG7_ADDR);
        if let Err(e) = seg7.clear() {
            log::warn!("seg7: clear failed: {:?}", e);
        }

        // Pixel chains, one SPI bus each
        let spi1 = Spi::new(dp.SPI1, (pins.spi1.sck, pins.spi1.miso, pins.spi1.mosi))
            .enable::<u8>(WS2812_MODE, 3.MHz(), &clocks, &mut apb2);
        let spi2 = Spi::new(dp.SPI2, (pins.spi2.sck, pins.spi2.miso, pins.spi2.mosi))
            .enable::<u8>(WS2812_MODE, 3.MHz(), &clocks, &mut apb1);
        let spi4 = Spi::new(dp.SPI4, (pins.spi4.sck, pins.spi4.miso, pins.spi4.mosi))
            .enable::<u8>(WS2812_MODE, 3.MHz(), &clocks, &mut apb2);
        let mut ring = NeoPixel::new(Ws2812::new(spi1), RING_LEN);
        let mut jewel = NeoPixel::new(Ws2812::new(spi2), JEWEL_LEN);
        let mut stick = NeoPixel::new(Ws2812::new(spi4), STICK_LEN);

        // Buzzer on TIM4 CH1
        let _buzzer_pin = pins.buzzer;
        let mut buzzer = Buzzer::new(TonePwm::tim4(dp.TIM4, clocks.timclk1().raw()), ());

        // MCU inputs by logical slot
        let mut inp = pins.inputs;
        let mut mcu = McuInputs::new()
            .with(0, &mut inp.pose_select)
            .with(3, &mut inp.switch0)
            .with(4, &mut inp.switch1)
            .with(5, &mut inp.switch2)
            .with(6, &mut inp.switch3)
            .with(7, &mut inp.switch4)
            .with(8, &mut inp.memory_select)
            .with(10, &mut inp.green_button)
            .with(11, &mut inp.blue_button)
            .with(12, &mut inp.yellow_button)
            .with(14, &mut inp.switch_select)
            .with(15, &mut inp.red_button);
        let mut inputs = BankedInputs {
            mcu: &mut mcu,
            expander0: &mut exp0_inputs,
            expander1: &mut exp1_inputs,
        };

        let mut board = Board {
            inputs: &mut inputs,
            keypad: &mut keypad,
            tilt: &mut imu,
            rng: &mut rng,
            display: &mut seg7,
            feedback: FeedbackHub::new(Sinks {
                ring: &mut ring,
                jewel: &mut jewel,
                stick: &mut stick,
                lamp: &mut lamp,
                speech: &mut tts,
                buzzer: &mut buzzer,
            }),
        };

        let puzzles = [
            AnyPuzzle::SequenceMatch(SequenceMatch::new(SequenceMatchConfig::default())),
            AnyPuzzle::PoseHold(PoseHold::new(PoseHoldConfig::default())),
            AnyPuzzle::MemorySequence(MemorySequence::new(MemorySequenceConfig::default())),
            AnyPuzzle::SwitchMapping(SwitchMapping::new(SwitchMappingConfig::default())),
        ];
        let mut game = GameController::new(GameConfig::default(), map.start, puzzles);
        game.init(&mut board);

        let mut last_tick = hw::clock::now();
        let mut last_beat = last_tick;
        loop {
            let now = hw::clock::now();
            if elapsed(now, last_tick) >= ms(TICK_MS) {
                last_tick = now;
                game.tick(now, &mut board);
            }
            if elapsed(now, last_beat) >= ms(HEARTBEAT_MS) {
                last_beat = now;
                led.toggle();
            }
            cortex_m::asm::wfi();
        }
    }

    #[exception]
    fn SysTick() {
        hw::clock::tick();
    }
}

#[cfg(not(target_os = "none"))]
fn main() {}
