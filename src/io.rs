/*!
    drive the interrupt handles from an async bus

    on targets where the uart driver is async (embassy for instance), the two interrupt contexts become two tasks: one awaiting received bytes, one awaiting the transmit driver being armed. Run both concurrently next to the main loop.
*/

use embedded_io_async::{Read, Write};
use log::*;

use crate::{
    hmi::{RxInterrupt, TxInterrupt, TransmitControl},
    machine::Machine,
    };


/// bytes read from the bus at once
pub const RX_CHUNK: usize = 32;
/// bytes written to the bus at once
pub const TX_CHUNK: usize = 32;


/// feed all bytes received on the bus to the realtime demultiplexer, until end of stream or error
pub async fn receive<B, M, T, const RX: usize, const TX: usize>(port: &mut RxInterrupt<'_, M, RX, TX, T>, bus: &mut B) -> Result<(), B::Error>
where B: Read, M: Machine, T: TransmitControl
{
    let mut chunk = [0u8; RX_CHUNK];
    loop {
        let size = bus.read(&mut chunk).await?;
        if size == 0 {
            debug!("receive bus reached end of stream");
            return Ok(());
        }
        for &byte in &chunk[.. size] {
            port.receive(byte);
        }
    }
}

/// write queued bytes to the bus as soon as the transmit driver is armed, until error
pub async fn transmit<B, M, T, const RX: usize, const TX: usize>(port: &mut TxInterrupt<'_, M, RX, TX, T>, bus: &mut B) -> Result<(), B::Error>
where B: Write, M: Machine, T: TransmitControl
{
    let mut batch = heapless::Vec::<u8, TX_CHUNK>::new();
    loop {
        port.armed().await;
        while !batch.is_full() && port.is_armed() {
            port.transmit_ready(|byte| {let _ = batch.push(byte);});
        }
        bus.write_all(&batch).await?;
        bus.flush().await?;
        batch.clear();
    }
}
