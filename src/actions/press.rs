use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};
use std::thread;
use std::time::Duration;

/// Tells a short press from a long one.
///
/// Each `begin` starts a new press epoch and arms a timer thread. The timer
/// runs its callback only if the key is still held and no newer press has
/// started. `end` reports whether the press was short, i.e. the timer has not
/// already handled it.
#[derive(Default)]
pub struct LongPress {
    held: Arc<AtomicBool>,
    seq: u64,
    current: Arc<AtomicU64>,
    fired: Arc<AtomicU64>,
}

impl LongPress {
    pub fn begin<F>(&mut self, hold: Duration, on_long: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.seq = self.seq.wrapping_add(1);
        let press = self.seq;
        self.held.store(true, Ordering::SeqCst);
        self.current.store(press, Ordering::SeqCst);
        self.fired.store(0, Ordering::SeqCst);

        let held = Arc::clone(&self.held);
        let current = Arc::clone(&self.current);
        let fired = Arc::clone(&self.fired);

        thread::spawn(move || {
            thread::sleep(hold);
            if held.load(Ordering::SeqCst) && current.load(Ordering::SeqCst) == press {
                fired.store(press, Ordering::SeqCst);
                on_long();
            }
        });
    }

    /// Release the key. True when the press was short.
    pub fn end(&self) -> bool {
        self.held.store(false, Ordering::SeqCst);
        self.fired.load(Ordering::SeqCst) != self.current.load(Ordering::SeqCst)
    }
}
