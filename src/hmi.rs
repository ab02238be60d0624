use core::{
    cell::RefCell,
    future::poll_fn,
    task::{Poll, Waker},
    sync::atomic::{AtomicBool, AtomicUsize},
    sync::atomic::Ordering::*,
    };
use critical_section::Mutex;
use log::*;

use crate::{
    command::{Command, Incoming},
    config::{Config, RX_SLOTS, TX_SLOTS},
    flags::{StateFlags, ExecState, MotionOverride, AccessoryOverride, exec},
    machine::{Machine, State},
    report::{self, Sink},
    ring::{RingBuffer, Producer, Consumer},
    };


/**
    switch of the hardware transmit ready interrupt

    [Hmi] calls it inside a critical section, with `true` when bytes get queued while idle and `false` once the transmit buffer is drained. On a microcontroller this sets or clears the interrupt enable bit of the uart. Async bridges polling [TxInterrupt::armed] have no such interrupt and use `()`, which does nothing.
*/
pub trait TransmitControl {
    fn set_transmit_ready(&self, enabled: bool);
}
impl TransmitControl for () {
    fn set_transmit_ready(&self, _enabled: bool) {}
}
impl<C: TransmitControl> TransmitControl for &C {
    fn set_transmit_ready(&self, enabled: bool) {
        (**self).set_transmit_ready(enabled)
    }
}


/// waker of the one task waiting on a side of the link
struct WakerSlot(Mutex<RefCell<Option<Waker>>>);
impl WakerSlot {
    const fn new() -> Self {
        Self(Mutex::new(RefCell::new(None)))
    }
    fn register(&self, waker: &Waker) {
        critical_section::with(|cs| {
            let mut slot = self.0.borrow_ref_mut(cs);
            if !slot.as_ref().is_some_and(|current| current.will_wake(waker))
                {*slot = Some(waker.clone())}
        })
    }
    fn wake(&self) {
        if let Some(waker) = critical_section::with(|cs| self.0.borrow_ref_mut(cs).take())
            {waker.wake()}
    }
}


/**
    uart host link of the controller

    it owns both ring buffers and the realtime request flags. It is meant to live in a `static` for the whole program, and [Self::split] hands out one handle per execution context:

    - [Host] for the main loop, reading received data and writing replies
    - [RxInterrupt] for the byte received interrupt
    - [TxInterrupt] for the transmit ready interrupt

    `RX` and `TX` are ring buffer storage sizes, which hold one byte more than their capacity. `T` switches the transmit ready interrupt, see [TransmitControl].
*/
pub struct Hmi<M, const RX: usize = RX_SLOTS, const TX: usize = TX_SLOTS, T = ()> {
    config: Config,
    machine: M,
    control: T,
    receive: RingBuffer<RX>,
    transmit: RingBuffer<TX>,
    exec: StateFlags<ExecState>,
    motion: StateFlags<MotionOverride>,
    accessory: StateFlags<AccessoryOverride>,
    #[cfg(feature = "debug-report")]
    debug: StateFlags<u8>,
    /// transmit ready notifications are wanted
    armed: AtomicBool,
    /// data bytes lost on a full receive buffer
    dropped: AtomicUsize,
    /// task waiting for room in the transmit buffer
    writer: WakerSlot,
    /// task waiting for the driver to be armed
    transmitter: WakerSlot,
}

impl<M: Machine, const RX: usize, const TX: usize> Hmi<M, RX, TX> {
    /// link without transmit interrupt control, for async bridges
    pub const fn new(config: Config, machine: M) -> Self {
        Self::with_control(config, machine, ())
    }
}

impl<M: Machine, const RX: usize, const TX: usize, T: TransmitControl> Hmi<M, RX, TX, T> {
    /// link enabling and disabling the transmit ready interrupt through `control`
    pub const fn with_control(config: Config, machine: M, control: T) -> Self {
        Self {
            config,
            machine,
            control,
            receive: RingBuffer::new(),
            transmit: RingBuffer::new(),
            exec: StateFlags::new(),
            motion: StateFlags::new(),
            accessory: StateFlags::new(),
            #[cfg(feature = "debug-report")]
            debug: StateFlags::new(),
            armed: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
            writer: WakerSlot::new(),
            transmitter: WakerSlot::new(),
        }
    }

    /// give out the handles of each context, only the first call succeeds
    pub fn split(&self) -> Option<(Host<'_, M, RX, TX, T>, RxInterrupt<'_, M, RX, TX, T>, TxInterrupt<'_, M, RX, TX, T>)> {
        let (rx_producer, rx_consumer) = self.receive.split()?;
        let (tx_producer, tx_consumer) = self.transmit.split()?;
        info!("hmi ready at {} baud", self.config.baud_rate());
        Some((
            Host {hmi: self, receive: rx_consumer, transmit: tx_producer},
            RxInterrupt {hmi: self, receive: rx_producer},
            TxInterrupt {hmi: self, transmit: tx_consumer},
        ))
    }

    pub fn config(&self) -> &Config {&self.config}
    pub fn machine(&self) -> &M {&self.machine}
    pub fn transmit_control(&self) -> &T {&self.control}
    /// execution requests, see [crate::flags::exec]
    pub fn exec(&self) -> &StateFlags<ExecState> {&self.exec}
    /// feed and rapid override requests, see [crate::flags::motion]
    pub fn motion_overrides(&self) -> &StateFlags<MotionOverride> {&self.motion}
    /// spindle and coolant override requests, see [crate::flags::accessory]
    pub fn accessory_overrides(&self) -> &StateFlags<AccessoryOverride> {&self.accessory}
    /// debug requests, see [crate::flags::debug]
    #[cfg(feature = "debug-report")]
    pub fn debug_requests(&self) -> &StateFlags<u8> {&self.debug}

    /// free space in the receive buffer, this is what a host streaming data should pace on
    pub fn rx_available(&self) -> usize {self.receive.available_space()}
    pub fn rx_count(&self) -> usize {self.receive.used_count()}
    pub fn tx_count(&self) -> usize {self.transmit.used_count()}
    /// number of data bytes dropped because the receive buffer was full
    pub fn dropped(&self) -> usize {self.dropped.load(Relaxed)}
    /// whether the transmit ready interrupt should be enabled
    pub fn is_armed(&self) -> bool {self.armed.load(Acquire)}
    /// a reset was received and not yet cleared by the main loop
    pub fn is_aborted(&self) -> bool {self.exec.contains(exec::RESET)}

    fn execute(&self, command: Command) {
        match command {
            Command::Reset => {
                warn!("reset command received");
                self.machine.reset();
                self.exec.set(exec::RESET);
                // a writer waiting for room must see the abort
                self.writer.wake();
            },
            Command::StatusReport => self.exec.set(exec::STATUS_REPORT),
            Command::CycleStart => self.exec.set(exec::CYCLE_START),
            Command::FeedHold => self.exec.set(exec::FEED_HOLD),
            Command::SafetyDoor => self.exec.set(exec::SAFETY_DOOR),
            Command::JogCancel => {
                // cancelling motion outside of a jog must not be possible
                if self.machine.state() == State::Jog
                    {self.exec.set(exec::MOTION_CANCEL)}
                else
                    {trace!("jog cancel ignored outside of jog")}
            },
            Command::DebugReport => {
                #[cfg(feature = "debug-report")]
                self.debug.set(crate::flags::debug::REPORT);
            },
            Command::Motion(mask) => self.motion.set(mask),
            Command::Accessory(mask) => self.accessory.set(mask),
        }
    }
}


/// main loop side of [Hmi]
pub struct Host<'h, M, const RX: usize, const TX: usize, T = ()> {
    hmi: &'h Hmi<M, RX, TX, T>,
    receive: Consumer<'h, RX>,
    transmit: Producer<'h, TX>,
}
impl<'h, M: Machine, const RX: usize, const TX: usize, T: TransmitControl> Host<'h, M, RX, TX, T> {
    pub fn hmi(&self) -> &'h Hmi<M, RX, TX, T> {self.hmi}

    /// next received data byte, if any
    pub fn read(&mut self) -> Option<u8> {
        self.receive.pop()
    }
    /// throw away all received data not yet read, used on reset
    pub fn reset_read_buffer(&mut self) {
        self.receive.clear();
    }

    /**
        queue a byte for transmission and make sure transmission is running

        when the transmit buffer is full this spins until the transmit interrupt frees a slot. The spin gives up when a reset is received, the byte is then not sent and false is returned.
    */
    pub fn write(&mut self, byte: u8) -> bool {
        while !self.transmit.push(byte) {
            if self.hmi.is_aborted() {
                debug!("transmit aborted by reset");
                return false;
            }
            core::hint::spin_loop();
        }
        self.arm();
        true
    }
    /**
        same as [Self::write] but sleeps instead of spinning

        the task is woken when the transmit interrupt frees a slot or a reset is received
    */
    pub async fn write_async(&mut self, byte: u8) -> bool {
        let hmi = self.hmi;
        let transmit = &mut self.transmit;
        let pushed = poll_fn(|context| {
            // registered before checking, so a slot freed in between still wakes us
            hmi.writer.register(context.waker());
            if transmit.push(byte)
                {return Poll::Ready(true)}
            if hmi.is_aborted() {
                debug!("transmit aborted by reset");
                return Poll::Ready(false);
            }
            Poll::Pending
        }).await;
        if pushed
            {self.arm()}
        pushed
    }
    /// queue a whole string, stops at the first aborted byte
    pub fn print(&mut self, text: &str) -> bool {
        text.bytes().all(|byte| self.write(byte))
    }
    /// send a status line built from the current machine state
    pub fn report(&mut self) {
        let snapshot = self.hmi.machine.snapshot();
        report::realtime_status(self, &snapshot);
    }

    fn arm(&self) {
        // paired with the emptiness check in TxInterrupt, so a byte pushed while the interrupt disarms is never left behind
        let armed = critical_section::with(|_| {
            if self.hmi.armed.load(Relaxed)
                {return false}
            self.hmi.armed.store(true, Relaxed);
            self.hmi.control.set_transmit_ready(true);
            true
        });
        if armed
            {self.hmi.transmitter.wake()}
    }
}
impl<M: Machine, const RX: usize, const TX: usize, T: TransmitControl> Sink for Host<'_, M, RX, TX, T> {
    fn put(&mut self, byte: u8) {
        self.write(byte);
    }
}


/// byte received interrupt side of [Hmi]
pub struct RxInterrupt<'h, M, const RX: usize, const TX: usize, T = ()> {
    hmi: &'h Hmi<M, RX, TX, T>,
    receive: Producer<'h, RX>,
}
impl<'h, M: Machine, const RX: usize, const TX: usize, T: TransmitControl> RxInterrupt<'h, M, RX, TX, T> {
    pub fn hmi(&self) -> &'h Hmi<M, RX, TX, T> {self.hmi}

    /**
        handle one received byte

        realtime commands take effect right away and never reach the receive buffer, whatever it contains. Other bytes are buffered, or silently dropped if the buffer is full.
    */
    pub fn receive(&mut self, byte: u8) {
        match Incoming::classify(byte) {
            Incoming::Command(command) => self.hmi.execute(command),
            Incoming::Discard => trace!("discarded unknown realtime byte {:#04x}", byte),
            Incoming::Data(byte) => {
                if !self.receive.push(byte) {
                    // only this context writes the counter
                    let dropped = self.hmi.dropped.load(Relaxed);
                    self.hmi.dropped.store(dropped.wrapping_add(1), Relaxed);
                    trace!("receive buffer full, dropped {:#04x}", byte);
                }
            },
        }
    }
}


/// transmit ready interrupt side of [Hmi]
pub struct TxInterrupt<'h, M, const RX: usize, const TX: usize, T = ()> {
    hmi: &'h Hmi<M, RX, TX, T>,
    transmit: Consumer<'h, TX>,
}
impl<'h, M: Machine, const RX: usize, const TX: usize, T: TransmitControl> TxInterrupt<'h, M, RX, TX, T> {
    pub fn hmi(&self) -> &'h Hmi<M, RX, TX, T> {self.hmi}

    pub fn is_armed(&self) -> bool {
        self.hmi.is_armed()
    }
    /// wait until there is something to transmit, the task sleeps until [Host] arms the driver
    pub async fn armed(&self) {
        poll_fn(|context| {
            self.hmi.transmitter.register(context.waker());
            if self.is_armed()
                {return Poll::Ready(())}
            Poll::Pending
        }).await
    }

    /**
        handle one transmit ready event

        sends the next queued byte through `send`, then disarms if nothing is left. Returns whether the driver is still armed.
    */
    pub fn transmit_ready(&mut self, send: impl FnOnce(u8)) -> bool {
        if let Some(byte) = self.transmit.pop() {
            send(byte);
            self.hmi.writer.wake();
        }
        critical_section::with(|_| {
            if !self.transmit.is_empty()
                {return true}
            if self.hmi.armed.load(Relaxed) {
                self.hmi.armed.store(false, Relaxed);
                self.hmi.control.set_transmit_ready(false);
            }
            false
        })
    }
}
