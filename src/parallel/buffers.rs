//! Fixed set of reusable buffers
//!
//! Taking a buffer blocks until one is free, so the pool also bounds how much
//! work can be queued up at once.

use std::ops::{Deref,DerefMut};
use std::sync::{Condvar,Mutex,PoisonError};

pub struct BufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
    available: Condvar,
    count: usize
}

impl <T> BufferPool<T> {
    /// Create `count` buffers, each with room for `size` elements.
    pub fn new(count: usize,size: usize) -> Self {
        let buffers = (0..count).map(|_| Vec::with_capacity(size)).collect();
        Self {
            free: Mutex::new(buffers),
            available: Condvar::new(),
            count
        }
    }
    /// Take an empty buffer, waiting for one to be released if necessary.
    pub fn get(&self) -> PooledBuffer<'_,T> {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(buf) = free.pop() {
                return PooledBuffer {
                    pool: self,
                    buf
                };
            }
            free = self.available.wait(free).unwrap_or_else(PoisonError::into_inner);
        }
    }
    /// number of buffers not currently lent out
    pub fn free(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
    pub fn count(&self) -> usize {
        self.count
    }
    fn release(&self,mut buf: Vec<T>) {
        buf.clear();
        self.free.lock().unwrap_or_else(PoisonError::into_inner).push(buf);
        self.available.notify_one();
    }
}

/// A buffer on loan from a `BufferPool`, it goes back when dropped.
pub struct PooledBuffer<'a,T> {
    pool: &'a BufferPool<T>,
    buf: Vec<T>
}

impl <'a,T> Deref for PooledBuffer<'a,T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Vec<T> {
        &self.buf
    }
}

impl <'a,T> DerefMut for PooledBuffer<'a,T> {
    fn deref_mut(&mut self) -> &mut Vec<T> {
        &mut self.buf
    }
}

impl <'a,T> Drop for PooledBuffer<'a,T> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[test]
fn recycling() {
    let pool: BufferPool<u8> = BufferPool::new(2,16);
    assert_eq!(pool.free(),2);
    let mut a = pool.get();
    a.extend_from_slice(&[1,2,3]);
    let b = pool.get();
    assert_eq!(pool.free(),0);
    assert!(b.is_empty());
    drop(a);
    assert_eq!(pool.free(),1);
    let c = pool.get();
    assert!(c.is_empty());
    assert!(c.capacity() >= 16);
    drop(b);
    drop(c);
    assert_eq!(pool.free(),pool.count());
}

#[test]
fn get_waits_for_release() {
    use std::sync::atomic::{AtomicBool,Ordering};
    let pool: BufferPool<u8> = BufferPool::new(1,4);
    let released = AtomicBool::new(false);
    std::thread::scope(|s| {
        let held = pool.get();
        s.spawn(|| {
            let buf = pool.get();
            assert!(released.load(Ordering::SeqCst));
            drop(buf);
        });
        std::thread::sleep(std::time::Duration::from_millis(50));
        released.store(true,Ordering::SeqCst);
        drop(held);
    });
    assert_eq!(pool.free(),1);
}
