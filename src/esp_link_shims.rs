//! `critical-section` 1.x implementation for ESP-IDF.
//!
//! The `embassy-sync` channels between tasks lock through
//! `CriticalSectionRawMutex`, which resolves to these two symbols at link
//! time. They are backed by one process-wide std mutex, re-entrant per
//! thread via a depth counter. Sections guard only channel bookkeeping, so
//! hold times are a handful of instructions.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

static SECTION: Mutex<()> = Mutex::new(());

thread_local! {
    static DEPTH: Cell<u8> = const { Cell::new(0) };
    static GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            let lock = SECTION.lock().unwrap_or_else(PoisonError::into_inner);
            GUARD.with(|g| *g.borrow_mut() = Some(lock));
        }
        let d = d.saturating_add(1);
        depth.set(d);
        d
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            return;
        }
        depth.set(d - 1);
        if d == 1 {
            GUARD.with(|g| *g.borrow_mut() = None);
        }
    });
}
