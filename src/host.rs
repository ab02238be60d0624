/*!
    run the link over a serial port or any tokio stream in a `std` environment

    the receive and transmit interrupts are replaced by two loops racing each other in [serve]. This is what simulators and host side test benches use.
*/

use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite, AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};
use serial2_tokio::{SerialPort, CharSize, StopBits, Parity};
use futures_concurrency::future::Race;
use thiserror::Error;
use log::*;

use crate::{
    config::{Config, ConfigError},
    hmi::{RxInterrupt, TxInterrupt, TransmitControl},
    machine::Machine,
    };


/// bytes read from the port at once
pub const RX_CHUNK: usize = 64;
/// bytes written to the port at once
pub const TX_CHUNK: usize = 64;


/// error on the host side of the link
#[derive(Error, Debug)]
pub enum Error {
    #[error("problem with serial port")]
    Bus(std::io::Error),
    #[error("serial peer closed the stream")]
    Closed,
    #[error("invalid link settings")]
    Config(ConfigError),
}
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Bus(error)
    }
}
impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}


/// open a serial port in raw 8N1 mode at the configured baud rate
pub fn open(path: impl AsRef<Path>, config: &Config) -> Result<SerialPort, Error> {
    let rate = config.baud_rate();
    let port = SerialPort::open(path, |mut settings: serial2_tokio::Settings| {
            settings.set_raw();
            settings.set_baud_rate(rate)?;
            settings.set_char_size(CharSize::Bits8);
            settings.set_stop_bits(StopBits::One);
            settings.set_parity(Parity::None);
            Ok(settings)
            })?;
    info!("opened serial port at {} baud", rate);
    Ok(port)
}

/**
    pump bytes between `io` and the interrupt handles

    returns on the first error, or with [Error::Closed] when the peer closes the stream
*/
pub async fn serve<IO, M, T, const RX: usize, const TX: usize>(
    receive: &mut RxInterrupt<'_, M, RX, TX, T>,
    transmit: &mut TxInterrupt<'_, M, RX, TX, T>,
    io: IO,
    ) -> Result<(), Error>
where IO: AsyncRead + AsyncWrite, M: Machine, T: TransmitControl
{
    let (reader, writer) = tokio::io::split(io);
    debug!("serving hmi link");
    (
        receive_loop(receive, reader),
        transmit_loop(transmit, writer),
    ).race().await
}

async fn receive_loop<IO, M, T, const RX: usize, const TX: usize>(port: &mut RxInterrupt<'_, M, RX, TX, T>, mut reader: ReadHalf<IO>) -> Result<(), Error>
where IO: AsyncRead, M: Machine, T: TransmitControl
{
    let mut chunk = [0u8; RX_CHUNK];
    loop {
        let size = reader.read(&mut chunk).await?;
        if size == 0
            {return Err(Error::Closed)}
        for &byte in &chunk[.. size] {
            port.receive(byte);
        }
    }
}

async fn transmit_loop<IO, M, T, const RX: usize, const TX: usize>(port: &mut TxInterrupt<'_, M, RX, TX, T>, mut writer: WriteHalf<IO>) -> Result<(), Error>
where IO: AsyncWrite, M: Machine, T: TransmitControl
{
    let mut batch = heapless::Vec::<u8, TX_CHUNK>::new();
    loop {
        port.armed().await;
        while !batch.is_full() && port.is_armed() {
            port.transmit_ready(|byte| {let _ = batch.push(byte);});
        }
        writer.write_all(&batch).await?;
        writer.flush().await?;
        batch.clear();
    }
}
