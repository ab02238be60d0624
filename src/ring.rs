/*!
    single-producer single-consumer byte ring buffer

    the buffer holds `SLOTS` bytes of storage but only `SLOTS - 1` bytes of data: one slot is always left empty so that `head == tail` means empty and `head + 1 == tail` means full, without any shared counter.

    `head` is only written by the [Producer], `tail` only by the [Consumer]. Each side reads the other's index as a single atomic snapshot, so both can run in different contexts (interrupt and main loop, or two threads) without any lock.
*/

use core::{
    cell::UnsafeCell,
    sync::atomic::{AtomicBool, AtomicUsize},
    sync::atomic::Ordering::*,
    };


pub struct RingBuffer<const SLOTS: usize> {
    storage: UnsafeCell<[u8; SLOTS]>,
    /// next slot to write, owned by the producer
    head: AtomicUsize,
    /// next slot to read, owned by the consumer
    tail: AtomicUsize,
    /// set once the producer and consumer handles have been given out
    split: AtomicBool,
}

// SAFETY: storage is only accessed through the unique Producer and Consumer handles, which never touch the same slot at the same time
unsafe impl<const SLOTS: usize> Sync for RingBuffer<SLOTS> {}

impl<const SLOTS: usize> RingBuffer<SLOTS> {
    /// number of bytes the buffer can hold at once
    pub const CAPACITY: usize = SLOTS - 1;
    const VALID: () = assert!(SLOTS >= 2, "a ring buffer needs at least one usable slot");

    /// create an empty buffer, usable in a `static`
    pub const fn new() -> Self {
        let () = Self::VALID;
        Self {
            storage: UnsafeCell::new([0; SLOTS]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            split: AtomicBool::new(false),
        }
    }

    /**
        give out the producer and consumer handles

        this can only succeed once for a given buffer, further calls return `None`
    */
    pub fn split(&self) -> Option<(Producer<'_, SLOTS>, Consumer<'_, SLOTS>)> {
        if self.split.swap(true, AcqRel)
            {return None}
        Some((Producer {ring: self}, Consumer {ring: self}))
    }

    /// number of bytes currently stored
    pub fn used_count(&self) -> usize {
        let head = self.head.load(Acquire);
        let tail = self.tail.load(Acquire);
        if head >= tail  {head - tail}
        else  {SLOTS - (tail - head)}
    }
    /// number of bytes that can still be pushed
    pub fn available_space(&self) -> usize {
        Self::CAPACITY - self.used_count()
    }
    pub fn is_empty(&self) -> bool {
        self.head.load(Acquire) == self.tail.load(Acquire)
    }

    const fn next(index: usize) -> usize {
        if index + 1 == SLOTS  {0}
        else  {index + 1}
    }
}

impl<const SLOTS: usize> Default for RingBuffer<SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}


/// writing end of a [RingBuffer]
pub struct Producer<'r, const SLOTS: usize> {
    ring: &'r RingBuffer<SLOTS>,
}
impl<const SLOTS: usize> Producer<'_, SLOTS> {
    /// append a byte, or return false and leave the buffer untouched if it is full
    pub fn push(&mut self, byte: u8) -> bool {
        let head = self.ring.head.load(Relaxed);
        let next = RingBuffer::<SLOTS>::next(head);
        if next == self.ring.tail.load(Acquire)
            {return false}
        // SAFETY: slot `head` is outside the readable range until head is published below
        unsafe {self.ring.storage.get().cast::<u8>().add(head).write(byte)};
        self.ring.head.store(next, Release);
        true
    }
    pub fn available_space(&self) -> usize {
        self.ring.available_space()
    }
    pub fn used_count(&self) -> usize {
        self.ring.used_count()
    }
    pub fn is_full(&self) -> bool {
        self.ring.available_space() == 0
    }
}

/// reading end of a [RingBuffer]
pub struct Consumer<'r, const SLOTS: usize> {
    ring: &'r RingBuffer<SLOTS>,
}
impl<const SLOTS: usize> Consumer<'_, SLOTS> {
    /// take the oldest byte, if any
    pub fn pop(&mut self) -> Option<u8> {
        let tail = self.ring.tail.load(Relaxed);
        if tail == self.ring.head.load(Acquire)
            {return None}
        // SAFETY: slot `tail` was published by the producer and will not be rewritten before tail moves
        let byte = unsafe {self.ring.storage.get().cast::<u8>().add(tail).read()};
        self.ring.tail.store(RingBuffer::<SLOTS>::next(tail), Release);
        Some(byte)
    }
    /// drop everything currently stored
    pub fn clear(&mut self) {
        let head = self.ring.head.load(Acquire);
        self.ring.tail.store(head, Release);
    }
    pub fn available_space(&self) -> usize {
        self.ring.available_space()
    }
    pub fn used_count(&self) -> usize {
        self.ring.used_count()
    }
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}
