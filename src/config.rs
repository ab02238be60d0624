use thiserror::Error;


/// bytes the receive buffer can hold
pub const RX_BUFFER_SIZE: usize = 255;
/// bytes the transmit buffer can hold
pub const TX_BUFFER_SIZE: usize = 255;
/// storage of the receive ring buffer, one slot stays empty
pub const RX_SLOTS: usize = RX_BUFFER_SIZE + 1;
/// storage of the transmit ring buffer, one slot stays empty
pub const TX_SLOTS: usize = TX_BUFFER_SIZE + 1;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const MIN_BAUD_RATE: u32 = 300;
pub const MAX_BAUD_RATE: u32 = 2_000_000;


/// error in transport settings
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("baud rate {0} is outside supported range")]
    BaudRate(u32),
}

/// transport settings chosen at initialization
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    baud_rate: u32,
}
impl Config {
    pub const DEFAULT: Self = Self {baud_rate: DEFAULT_BAUD_RATE};

    pub fn new(baud_rate: u32) -> Result<Self, ConfigError> {
        if !(MIN_BAUD_RATE ..= MAX_BAUD_RATE).contains(&baud_rate)
            {return Err(ConfigError::BaudRate(baud_rate))}
        Ok(Self {baud_rate})
    }
    pub const fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}
impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
