//! Ticker Actor: Paces play mode.
//!
//! Every `step_interval` the ticker offers the session one [`Tick`]. The
//! session steps a generation per tick while playing and ignores ticks while
//! paused. The channel holds a single tick, so a slow step delays play
//! instead of building up a backlog of generations to catch up on.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Longest uninterrupted sleep, bounding how late a shutdown is noticed.
const SHUTDOWN_SLICE: Duration = Duration::from_millis(5);

/// One play-mode beat.
#[derive(Debug, Clone, Copy)]
pub struct Tick {
    /// Beats offered so far, counting those the session never picked up.
    pub seq: u64,
    /// How far past its deadline this beat was sent.
    pub late: Duration,
}

/// Thread that offers the session a [`Tick`] every step interval.
#[derive(Debug)]
pub struct TickerActor {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
    ticks: Receiver<Tick>,
}

impl TickerActor {
    /// Start offering ticks every `step_interval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(step_interval: Duration) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, ticks) = bounded(1);

        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("lifeline-ticker".to_string())
            .spawn(move || Self::beat(&tx, &thread_stop, step_interval))?;

        log::debug!("ticker started, one generation every {step_interval:?}");
        Ok(Self {
            handle: Some(handle),
            stop,
            ticks,
        })
    }

    /// Tick receiver, for use with `select!`.
    #[inline]
    pub const fn receiver(&self) -> &Receiver<Tick> {
        &self.ticks
    }

    /// Ask the thread to stop at its next wake-up.
    pub fn shutdown(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Stop the thread and wait for it.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    fn beat(tx: &Sender<Tick>, stop: &AtomicBool, step_interval: Duration) {
        let mut seq = 0u64;
        let mut deadline = Instant::now() + step_interval;

        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now < deadline {
                thread::sleep((deadline - now).min(SHUTDOWN_SLICE));
                continue;
            }

            // A tick still waiting in the channel means the session is busy;
            // this one is dropped.
            let _ = tx.try_send(Tick {
                seq,
                late: now - deadline,
            });
            seq += 1;

            deadline += step_interval;
            if deadline <= now {
                // Stalled for a whole interval: restart the schedule.
                deadline = now + step_interval;
            }
        }
        log::debug!("ticker stopped after {seq} ticks");
    }
}

impl Drop for TickerActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_arrive_in_order() {
        let ticker = TickerActor::spawn(Duration::from_millis(10)).unwrap();

        let first = ticker
            .receiver()
            .recv_timeout(Duration::from_millis(500))
            .unwrap();
        assert_eq!(first.seq, 0);

        let second = ticker
            .receiver()
            .recv_timeout(Duration::from_millis(500))
            .unwrap();
        assert!(second.seq > first.seq);

        ticker.join();
    }

    #[test]
    fn test_idle_session_holds_one_tick() {
        let ticker = TickerActor::spawn(Duration::from_millis(2)).unwrap();
        thread::sleep(Duration::from_millis(50));
        assert!(ticker.receiver().len() <= 1);
        ticker.join();
    }

    #[test]
    fn test_join_is_prompt_with_long_interval() {
        let ticker = TickerActor::spawn(Duration::from_secs(60)).unwrap();
        let started = Instant::now();
        ticker.join();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
