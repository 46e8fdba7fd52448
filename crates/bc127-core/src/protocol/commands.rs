//! Command vocabulary
//!
//! Enumerated parameters for the module's textual command set. Token values
//! follow the Melody firmware manual.

use serde::{Deserialize, Serialize};

/// Bluetooth profile selector for the `OPEN` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionType {
    /// Serial Port Profile
    Spp,
    /// Bluetooth Low Energy (GATT)
    Ble,
    /// Advanced Audio Distribution Profile
    A2dp,
    /// Audio/Video Remote Control Profile
    Avrcp,
    /// Hands-Free Profile
    Hfp,
    /// Phone Book Access Profile
    Pbap,
}

impl ConnectionType {
    /// Protocol token expected by the `OPEN` command.
    pub fn token(&self) -> &'static str {
        match self {
            ConnectionType::Spp => "SPP",
            ConnectionType::Ble => "BLE",
            ConnectionType::A2dp => "A2DP",
            ConnectionType::Avrcp => "AVRCP",
            ConnectionType::Hfp => "HFP",
            ConnectionType::Pbap => "PBAP",
        }
    }
}

/// Remote playback and volume controls (AVRCP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCommand {
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to the next track
    Forward,
    /// Skip to the previous track
    Back,
    /// Stop playback
    Stop,
    /// Raise the remote volume one step
    VolumeUp,
    /// Lower the remote volume one step
    VolumeDown,
}

impl AudioCommand {
    /// Full command line for this control.
    pub fn command(&self) -> &'static str {
        match self {
            AudioCommand::Play => "MUSIC PLAY",
            AudioCommand::Pause => "MUSIC PAUSE",
            AudioCommand::Forward => "MUSIC FORWARD",
            AudioCommand::Back => "MUSIC BACKWARD",
            AudioCommand::Stop => "MUSIC STOP",
            AudioCommand::VolumeUp => "VOLUME UP",
            AudioCommand::VolumeDown => "VOLUME DOWN",
        }
    }
}

/// UART speeds the module accepts for `SET BAUD`.
///
/// The firmware recognizes exactly these five; anything else is rejected
/// before a byte is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaudRate {
    /// 9600 bit/s (factory default)
    Baud9600,
    /// 19200 bit/s
    Baud19200,
    /// 38400 bit/s
    Baud38400,
    /// 57600 bit/s
    Baud57600,
    /// 115200 bit/s
    Baud115200,
}

impl BaudRate {
    /// Decimal token for `SET BAUD=`.
    pub fn token(&self) -> &'static str {
        match self {
            BaudRate::Baud9600 => "9600",
            BaudRate::Baud19200 => "19200",
            BaudRate::Baud38400 => "38400",
            BaudRate::Baud57600 => "57600",
            BaudRate::Baud115200 => "115200",
        }
    }

    /// Numeric speed, for reconfiguring the host side of the link after a
    /// successful change.
    pub fn bits_per_second(&self) -> u32 {
        match self {
            BaudRate::Baud9600 => 9600,
            BaudRate::Baud19200 => 19200,
            BaudRate::Baud38400 => 38400,
            BaudRate::Baud57600 => 57600,
            BaudRate::Baud115200 => 115200,
        }
    }
}

/// BLE role for `SET BLE_ROLE`. A change takes effect after `WRITE` plus
/// `RESET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BleRole {
    /// BLE disabled
    Disabled,
    /// Peripheral (advertiser)
    Peripheral,
    /// Central (scanner/initiator)
    Central,
}

impl BleRole {
    /// Numeric token for `SET BLE_ROLE=`.
    pub fn token(&self) -> &'static str {
        match self {
            BleRole::Disabled => "0",
            BleRole::Peripheral => "1",
            BleRole::Central => "2",
        }
    }
}

/// Classic audio role for `SET CLASSIC_ROLE`. A change takes effect after
/// `WRITE` plus `RESET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassicRole {
    /// Receive streamed audio
    Sink,
    /// Stream audio out to another device
    Source,
}

impl ClassicRole {
    /// Numeric token for `SET CLASSIC_ROLE=`.
    pub fn token(&self) -> &'static str {
        match self {
            ClassicRole::Sink => "0",
            ClassicRole::Source => "1",
        }
    }
}
