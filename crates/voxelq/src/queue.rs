//! Rate-limited outbound queue with lifetime statistics.

use std::collections::VecDeque;

use thiserror::Error;

use crate::sink::{VoxelAdd, VoxelSink};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("packets per second must be nonzero")]
    ZeroRate,
}

/// Outbound command queue released at a packets-per-second budget.
///
/// Time is injected through `drain(dt)` so the queue is deterministic:
/// one drain per simulation tick with the tick length in seconds. The
/// allowance carried between drains is capped at one second's worth of
/// packets so idle time cannot bank an unbounded burst.
#[derive(Debug)]
pub struct RateLimitedQueue {
    pending: VecDeque<VoxelAdd>,
    packets_per_second: u32,
    /// Fractional send allowance carried between drains.
    allowance: f64,
    lifetime_seconds: f64,
    lifetime_queued: u64,
    lifetime_sent: u64,
}

impl RateLimitedQueue {
    pub fn new(packets_per_second: u32) -> Result<Self, QueueError> {
        if packets_per_second == 0 {
            return Err(QueueError::ZeroRate);
        }
        Ok(Self {
            pending: VecDeque::new(),
            packets_per_second,
            allowance: 0.0,
            lifetime_seconds: 0.0,
            lifetime_queued: 0,
            lifetime_sent: 0,
        })
    }

    pub fn set_packets_per_second(&mut self, pps: u32) -> Result<(), QueueError> {
        if pps == 0 {
            return Err(QueueError::ZeroRate);
        }
        self.packets_per_second = pps;
        Ok(())
    }

    pub fn packets_per_second(&self) -> u32 {
        self.packets_per_second
    }

    /// Advance the clock by `dt` seconds and release up to the accrued
    /// allowance. Unreleased commands stay pending.
    pub fn drain(&mut self, dt: f64) -> Vec<VoxelAdd> {
        self.lifetime_seconds += dt;
        self.allowance += dt * self.packets_per_second as f64;
        let cap = self.packets_per_second as f64;
        if self.allowance > cap {
            self.allowance = cap;
        }

        let count = (self.allowance as usize).min(self.pending.len());
        self.allowance -= count as f64;
        let out: Vec<VoxelAdd> = self.pending.drain(..count).collect();
        self.lifetime_sent += out.len() as u64;
        out
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn lifetime_seconds(&self) -> f64 {
        self.lifetime_seconds
    }

    pub fn lifetime_queued(&self) -> u64 {
        self.lifetime_queued
    }

    pub fn lifetime_sent(&self) -> u64 {
        self.lifetime_sent
    }

    /// Average queued packets per second over the queue's lifetime.
    pub fn queued_pps(&self) -> f64 {
        if self.lifetime_seconds > 0.0 {
            self.lifetime_queued as f64 / self.lifetime_seconds
        } else {
            0.0
        }
    }

    /// Average sent packets per second over the queue's lifetime.
    pub fn sent_pps(&self) -> f64 {
        if self.lifetime_seconds > 0.0 {
            self.lifetime_sent as f64 / self.lifetime_seconds
        } else {
            0.0
        }
    }
}

impl VoxelSink for RateLimitedQueue {
    fn queue_add(&mut self, add: VoxelAdd) {
        self.lifetime_queued += 1;
        self.pending.push_back(add);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn add(n: u8) -> VoxelAdd {
        VoxelAdd {
            position: DVec3::new(n as f64, 0.0, 0.0),
            size: 1.0,
            color: [n, n, n],
        }
    }

    #[test]
    fn zero_rate_is_rejected() {
        assert!(matches!(RateLimitedQueue::new(0), Err(QueueError::ZeroRate)));
        let mut q = RateLimitedQueue::new(10).unwrap();
        assert!(q.set_packets_per_second(0).is_err());
        assert_eq!(q.packets_per_second(), 10);
    }

    #[test]
    fn drain_respects_budget() {
        let mut q = RateLimitedQueue::new(100).unwrap();
        for i in 0..50 {
            q.queue_add(add(i));
        }
        // 0.1 s at 100 pps releases exactly 10.
        let out = q.drain(0.1);
        assert_eq!(out.len(), 10);
        assert_eq!(q.pending_len(), 40);
        assert_eq!(out[0].color, [0, 0, 0]);
        assert_eq!(out[9].color, [9, 9, 9]);
    }

    #[test]
    fn fractional_allowance_carries_over() {
        let mut q = RateLimitedQueue::new(10).unwrap();
        for i in 0..4 {
            q.queue_add(add(i));
        }
        // 0.05 s at 10 pps = 0.5 of a packet: nothing goes out yet.
        assert_eq!(q.drain(0.05).len(), 0);
        // Another 0.05 s completes one packet.
        assert_eq!(q.drain(0.05).len(), 1);
    }

    #[test]
    fn idle_time_does_not_bank_a_burst() {
        let mut q = RateLimitedQueue::new(5).unwrap();
        // A minute of idle time, then a flood of commands.
        assert_eq!(q.drain(60.0).len(), 0);
        for i in 0..100 {
            q.queue_add(add(i as u8));
        }
        // Allowance is capped at one second's worth (5).
        assert_eq!(q.drain(0.0).len(), 5);
    }

    #[test]
    fn lifetime_counters_track_queue_and_send() {
        let mut q = RateLimitedQueue::new(2).unwrap();
        for i in 0..6 {
            q.queue_add(add(i));
        }
        q.drain(1.0);
        q.drain(1.0);
        assert_eq!(q.lifetime_queued(), 6);
        assert_eq!(q.lifetime_sent(), 4);
        assert_eq!(q.pending_len(), 2);
        assert!((q.lifetime_seconds() - 2.0).abs() < 1e-12);
        assert!((q.queued_pps() - 3.0).abs() < 1e-12);
        assert!((q.sent_pps() - 2.0).abs() < 1e-12);
    }
}
