//! Counter that threads can wait on

use std::sync::{Condvar,Mutex,PoisonError};

#[derive(Default)]
pub struct ThreadSafeCounter {
    value: Mutex<usize>,
    changed: Condvar
}

impl ThreadSafeCounter {
    pub fn new(value: usize) -> Self {
        Self {
            value: Mutex::new(value),
            changed: Condvar::new()
        }
    }
    pub fn value(&self) -> usize {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn increase(&self) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }
    /// saturates at zero
    pub fn decrease(&self) {
        let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        *value = value.saturating_sub(1);
    }
    /// Block until `predicate` holds for the current value.
    /// Someone has to call `notify_one` or `notify_all` after changing the value.
    pub fn wait<F: Fn(usize) -> bool>(&self,predicate: F) {
        let value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        let _value = self.changed.wait_while(value,|v| !predicate(*v)).unwrap_or_else(PoisonError::into_inner);
    }
    pub fn notify_one(&self) {
        self.changed.notify_one();
    }
    pub fn notify_all(&self) {
        self.changed.notify_all();
    }
}

#[test]
fn count_up_and_down() {
    let counter = ThreadSafeCounter::new(0);
    counter.increase();
    counter.increase();
    counter.decrease();
    assert_eq!(counter.value(),1);
    counter.decrease();
    counter.decrease();
    assert_eq!(counter.value(),0);
}

#[test]
fn wait_for_workers() {
    let counter = ThreadSafeCounter::new(0);
    std::thread::scope(|s| {
        for _i in 0..4 {
            s.spawn(|| {
                std::thread::sleep(std::time::Duration::from_millis(10));
                counter.increase();
                counter.notify_all();
            });
        }
        counter.wait(|v| v == 4);
        assert_eq!(counter.value(),4);
    });
}
