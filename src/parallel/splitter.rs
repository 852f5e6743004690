//! Two stage chunk pipeline
//!
//! The input is cut into chunks.  A dispatcher thread copies each chunk into a
//! pooled buffer and queues it for a fixed set of workers.  A worker runs the
//! first stage into a second pooled buffer, then the second stage back into the
//! first.  Results arrive in any order and are put back in input order by the
//! calling thread before they reach the output.

use std::collections::BTreeMap;
use std::panic::{self,AssertUnwindSafe};
use std::sync::atomic::{AtomicBool,Ordering};
use std::sync::{mpsc,Mutex,PoisonError};
use super::buffers::{BufferPool,PooledBuffer};
use super::counter::ThreadSafeCounter;
use crate::Error;

/// One transformation applied to each chunk.
pub trait Stage<T>: Sync {
    /// Transform `input`, appending to `output` which starts out empty.
    fn run(&self,input: &[T],output: &mut Vec<T>) -> Result<(),Error>;
    /// Length of the next chunk at the start of `rest`, which is not empty.
    /// Fixed size chunks unless the stage's input frames itself.
    fn next_chunk_len(&self,rest: &[T],chunk_size: usize) -> Result<usize,Error> {
        Ok(usize::min(chunk_size,rest.len()))
    }
}

struct Job<'a,T> {
    index: usize,
    input: PooledBuffer<'a,T>,
    scratch: PooledBuffer<'a,T>
}

pub struct Splitter<F,S> {
    first: F,
    second: S
}

impl <F,S> Splitter<F,S> {
    pub fn new(first: F,second: S) -> Self {
        Self {
            first,
            second
        }
    }
    /// Push every chunk of `input` through both stages and append the results
    /// to `output` in input order.  Returns the number of chunks.
    pub fn run<T,O>(&self,input: &[T],output: &mut O,max_number_of_threads: usize,chunk_size: usize) -> Result<usize,Error>
    where T: Copy + Send + Sync, F: Stage<T>, S: Stage<T>, O: Extend<T> {
        if max_number_of_threads == 0 || chunk_size == 0 {
            return Err(Error::InvalidOptions("threads and chunk size must be positive".to_string()));
        }
        let pool: BufferPool<T> = BufferPool::new(2*max_number_of_threads+1,2*chunk_size);
        let in_flight = ThreadSafeCounter::new(0);
        let abort = AtomicBool::new(false);
        let (job_tx,job_rx) = mpsc::sync_channel::<Job<T>>(max_number_of_threads);
        let job_rx = Mutex::new(job_rx);
        let (done_tx,done_rx) = mpsc::channel::<(usize,Result<PooledBuffer<T>,Error>)>();

        std::thread::scope(|scope| {
            let mut workers = Vec::new();
            for _w in 0..max_number_of_threads {
                let done_tx = done_tx.clone();
                let (job_rx,in_flight) = (&job_rx,&in_flight);
                workers.push(scope.spawn(move || {
                    loop {
                        let job = match job_rx.lock().unwrap_or_else(PoisonError::into_inner).recv() {
                            Ok(job) => job,
                            Err(_) => break
                        };
                        let index = job.index;
                        let result = panic::catch_unwind(AssertUnwindSafe(|| self.work(job)))
                            .unwrap_or_else(|_| {
                                log::error!("stage panicked on chunk {}",index);
                                Err(Error::WorkerFailed)
                            });
                        let sent = done_tx.send((index,result));
                        in_flight.decrease();
                        in_flight.notify_all();
                        if sent.is_err() {
                            break;
                        }
                    }
                }));
            }
            drop(done_tx);

            let (pool,in_flight,abort) = (&pool,&in_flight,&abort);
            let dispatcher = scope.spawn(move || -> Result<usize,Error> {
                let job_tx = job_tx;
                let mut rest = input;
                let mut index = 0;
                while !rest.is_empty() && !abort.load(Ordering::SeqCst) {
                    let len = self.first.next_chunk_len(rest,chunk_size)?;
                    if len == 0 || len > rest.len() {
                        return Err(Error::FileFormatMismatch);
                    }
                    let mut chunk = pool.get();
                    chunk.extend_from_slice(&rest[..len]);
                    let scratch = pool.get();
                    rest = &rest[len..];
                    in_flight.wait(|n| n < max_number_of_threads);
                    in_flight.increase();
                    log::debug!("dispatch chunk {} with {} symbols",index,len);
                    if job_tx.send(Job { index, input: chunk, scratch }).is_err() {
                        return Err(Error::WorkerFailed);
                    }
                    index += 1;
                }
                Ok(index)
            });

            // reorder on this thread so the output never has to cross threads
            let mut expected = 0;
            let mut pending: BTreeMap<usize,PooledBuffer<T>> = BTreeMap::new();
            let mut failure: Option<Error> = None;
            for (index,result) in done_rx {
                match (result,failure.is_some()) {
                    (Ok(buf),false) => {
                        pending.insert(index,buf);
                        while let Some(buf) = pending.remove(&expected) {
                            output.extend(buf.iter().copied());
                            expected += 1;
                        }
                    },
                    (Err(e),false) => {
                        log::error!("chunk {} failed: {}",index,e);
                        abort.store(true,Ordering::SeqCst);
                        pending.clear();
                        failure = Some(e);
                    },
                    _ => {}
                }
            }

            let dispatched = match dispatcher.join() {
                Ok(result) => result,
                Err(_) => Err(Error::WorkerFailed)
            };
            for worker in workers {
                if worker.join().is_err() {
                    failure.get_or_insert(Error::WorkerFailed);
                }
            }
            if let Some(e) = failure {
                return Err(e);
            }
            let chunks = dispatched?;
            if expected != chunks {
                log::error!("only {} of {} chunks came back",expected,chunks);
                return Err(Error::WorkerFailed);
            }
            Ok(chunks)
        })
    }
    fn work<'a,T>(&self,job: Job<'a,T>) -> Result<PooledBuffer<'a,T>,Error>
    where T: Copy, F: Stage<T>, S: Stage<T> {
        let Job { mut input, mut scratch, .. } = job;
        self.first.run(&input,&mut scratch)?;
        input.clear();
        self.second.run(&scratch,&mut input)?;
        Ok(input)
    }
}

#[cfg(test)]
struct Upper;

#[cfg(test)]
impl Stage<u8> for Upper {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        // uneven delays so chunks finish out of order
        std::thread::sleep(std::time::Duration::from_millis((input[0] % 7) as u64));
        output.extend(input.iter().map(|b| b.to_ascii_uppercase()));
        Ok(())
    }
}

#[cfg(test)]
struct Bracket;

#[cfg(test)]
impl Stage<u8> for Bracket {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        output.push(b'[');
        output.extend_from_slice(input);
        output.push(b']');
        Ok(())
    }
}

#[cfg(test)]
struct FailOn(u8);

#[cfg(test)]
impl Stage<u8> for FailOn {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        if input.contains(&self.0) {
            return Err(Error::BadCode);
        }
        output.extend_from_slice(input);
        Ok(())
    }
}

#[cfg(test)]
struct PanicOn(u8);

#[cfg(test)]
impl Stage<u8> for PanicOn {
    fn run(&self,input: &[u8],output: &mut Vec<u8>) -> Result<(),Error> {
        if input.contains(&self.0) {
            panic!("bad chunk");
        }
        output.extend_from_slice(input);
        Ok(())
    }
}

#[test]
fn output_keeps_input_order() {
    let input: Vec<u8> = (0..1000).map(|i| b'a' + (i % 26) as u8).collect();
    let mut expected = Vec::new();
    for chunk in input.chunks(7) {
        expected.push(b'[');
        expected.extend(chunk.iter().map(|b| b.to_ascii_uppercase()));
        expected.push(b']');
    }
    for threads in [1,2,5] {
        let mut output: Vec<u8> = Vec::new();
        let chunks = Splitter::new(Upper,Bracket).run(&input,&mut output,threads,7).expect("pipeline failed");
        assert_eq!(chunks,143);
        assert_eq!(output,expected);
    }
}

#[test]
fn empty_input() {
    let nothing: Vec<u8> = Vec::new();
    let mut output: Vec<u8> = Vec::new();
    assert_eq!(Splitter::new(Upper,Bracket).run(&nothing,&mut output,4,16).unwrap(),0);
    assert!(output.is_empty());
}

#[test]
fn stage_errors_stop_the_pipeline() {
    let input: Vec<u8> = (0..=255).cycle().take(5000).collect();
    let mut output: Vec<u8> = Vec::new();
    let result = Splitter::new(Bracket,FailOn(b'x')).run(&input,&mut output,3,10);
    assert!(matches!(result,Err(Error::BadCode)));
    let mut output: Vec<u8> = Vec::new();
    let result = Splitter::new(PanicOn(200),Bracket).run(&input,&mut output,3,10);
    assert!(matches!(result,Err(Error::WorkerFailed)));
}
