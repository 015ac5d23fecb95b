//! # Kernel synchronization primitives
//!
//! Small lock types for state shared between ordinary kernel code and
//! asynchronous notification paths (interrupt handlers, firmware event
//! callbacks).
//!
//! * [`SpinLock`] is a test-and-test-and-set lock with an RAII guard. It never
//!   sleeps and never allocates, so it can be taken from interrupt context as
//!   long as every critical section is short and bounded.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod spin_lock;

pub use spin_lock::{SpinLock, SpinLockGuard};
