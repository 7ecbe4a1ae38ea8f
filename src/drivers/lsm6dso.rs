// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! LSM6DSO 6-axis IMU, accelerometer only.
//!
//! The accelerometer runs at 104 Hz, ±2 g, with block data update so the six output bytes of one
//! sample are always read together.

use embedded_hal::blocking::i2c::{Write, WriteRead};
use micromath::F32Ext;

use crate::io::{Pose, TiltSensor};

// Register addresses
pub mod reg {
    pub const WHO_AM_I: u8 = 0x0F;
    pub const CTRL1_XL: u8 = 0x10;
    pub const CTRL3_C: u8 = 0x12;
    pub const STATUS_REG: u8 = 0x1E;
    pub const OUTX_L_A: u8 = 0x28;
}

pub const WHO_AM_I_VALUE: u8 = 0x6C;

/// ODR 104 Hz, ±2 g.
const CTRL1_XL_104HZ_2G: u8 = 0x40;
/// Software reset.
const CTRL3_C_SW_RESET: u8 = 0x01;
/// Block data update and register auto-increment.
const CTRL3_C_BDU_INC: u8 = 0x44;
const STATUS_XLDA: u8 = 0x01;

/// Accelerometer sensitivity at ±2 g, in g per LSB.
pub const G_PER_LSB: f32 = 0.061e-3;

const DEG_PER_RAD: f32 = 180.0 / core::f32::consts::PI;

/// Pitch and roll (degrees) of a gravity vector given in raw counts.
pub fn pose_from_accel(raw: [i16; 3]) -> Pose {
    let [x, y, z] = raw.map(|v| v as f32 * G_PER_LSB);
    let pitch = x.atan2((y * y + z * z).sqrt());
    let roll = y.atan2((x * x + z * z).sqrt());
    Pose {
        pitch: pitch * DEG_PER_RAD,
        roll: roll * DEG_PER_RAD,
    }
}

pub struct Lsm6dso<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C, E> Lsm6dso<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { i2c, addr }
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, E> {
        let mut buf = [0u8];
        self.i2c.write_read(self.addr, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), E> {
        self.i2c.write(self.addr, &[reg, value])
    }

    pub fn who_am_i(&mut self) -> Result<u8, E> {
        self.read_reg(reg::WHO_AM_I)
    }

    /// Reset the device and start the accelerometer.
    pub fn init(&mut self) -> Result<(), E> {
        self.write_reg(reg::CTRL3_C, CTRL3_C_SW_RESET)?;
        self.write_reg(reg::CTRL3_C, CTRL3_C_BDU_INC)?;
        self.write_reg(reg::CTRL1_XL, CTRL1_XL_104HZ_2G)
    }

    /// Put the accelerometer in power-down.
    pub fn power_down(&mut self) -> Result<(), E> {
        self.write_reg(reg::CTRL1_XL, 0)
    }

    /// Latest raw sample, or `None` when no new sample is ready.
    pub fn accel_raw(&mut self) -> Result<Option<[i16; 3]>, E> {
        if self.read_reg(reg::STATUS_REG)? & STATUS_XLDA == 0 {
            return Ok(None);
        }
        let mut buf = [0u8; 6];
        self.i2c.write_read(self.addr, &[reg::OUTX_L_A], &mut buf)?;
        Ok(Some([
            i16::from_le_bytes([buf[0], buf[1]]),
            i16::from_le_bytes([buf[2], buf[3]]),
            i16::from_le_bytes([buf[4], buf[5]]),
        ]))
    }
}

impl<I2C, E> TiltSensor for Lsm6dso<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    E: core::fmt::Debug,
{
    fn start(&mut self) {
        match self.who_am_i() {
            Ok(WHO_AM_I_VALUE) => {}
            Ok(other) => log::warn!("lsm6dso: unexpected WHO_AM_I {:#04x}", other),
            Err(e) => log::warn!("lsm6dso: probe failed: {:?}", e),
        }
        if let Err(e) = self.init() {
            log::warn!("lsm6dso: init failed: {:?}", e);
        }
    }

    fn stop(&mut self) {
        if let Err(e) = self.power_down() {
            log::warn!("lsm6dso: power down failed: {:?}", e);
        }
    }

    fn pose(&mut self) -> Option<Pose> {
        match self.accel_raw() {
            Ok(raw) => raw.map(pose_from_accel),
            Err(e) => {
                log::warn!("lsm6dso: read failed: {:?}", e);
                None
            }
        }
    }
}
