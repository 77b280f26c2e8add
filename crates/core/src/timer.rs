//! Monotonic stopwatch used to time work units and whole runs.
//!
//! Built on [`tokio::time::Instant`] so a paused test runtime controls the
//! clock; outside a runtime it behaves like `std::time::Instant`.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::TimerError;

/// Start/stop timer that remembers the last lap and the accumulated total.
#[derive(Debug, Clone, Default)]
pub struct Timer {
    started: Option<Instant>,
    last: Option<Duration>,
    total: Duration,
    laps: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer that is already running.
    pub fn started() -> Self {
        Self {
            started: Some(Instant::now()),
            ..Self::default()
        }
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.started.is_some() {
            return Err(TimerError::AlreadyRunning);
        }
        self.started = Some(Instant::now());
        Ok(())
    }

    /// Stop the timer and return the duration of the lap that just ended.
    pub fn stop(&mut self) -> Result<Duration, TimerError> {
        let started = self.started.take().ok_or(TimerError::NotRunning)?;
        let lap = started.elapsed();
        self.last = Some(lap);
        self.total += lap;
        self.laps += 1;
        Ok(lap)
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Time since `start()` for a running timer, otherwise the last lap.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => started.elapsed(),
            None => self.last.unwrap_or_default(),
        }
    }

    /// Sum of all completed laps.
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn laps(&self) -> u32 {
        self.laps
    }
}

/// Seconds with one decimal, the precision every report line uses.
pub fn format_secs(d: Duration) -> String {
    format!("{:.1}", d.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_is_misuse() {
        let mut t = Timer::new();
        assert_eq!(t.stop(), Err(TimerError::NotRunning));
    }

    #[test]
    fn double_start_is_misuse() {
        let mut t = Timer::new();
        t.start().unwrap();
        assert_eq!(t.start(), Err(TimerError::AlreadyRunning));
        assert!(t.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn lap_measures_synthetic_delay() {
        let mut t = Timer::new();
        t.start().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        let lap = t.stop().unwrap();

        assert!(lap >= Duration::from_secs(2));
        assert!(lap < Duration::from_millis(2100), "lap too long: {:?}", lap);
        assert_eq!(t.elapsed(), lap);
    }

    #[tokio::test(start_paused = true)]
    async fn total_accumulates_laps() {
        let mut t = Timer::new();
        for secs in [1, 3] {
            t.start().unwrap();
            tokio::time::sleep(Duration::from_secs(secs)).await;
            t.stop().unwrap();
        }
        assert_eq!(t.laps(), 2);
        let total = t.total().as_secs_f64();
        assert!((4.0..4.1).contains(&total), "expected ~4s, got {total}");
    }

    #[test]
    fn real_clock_is_positive() {
        let mut t = Timer::started();
        std::thread::sleep(Duration::from_millis(5));
        let lap = t.stop().unwrap();
        assert!(lap >= Duration::from_millis(5));
    }

    #[test]
    fn format_one_decimal() {
        assert_eq!(format_secs(Duration::from_millis(17_040)), "17.0");
        assert_eq!(format_secs(Duration::from_millis(349)), "0.3");
        assert_eq!(format_secs(Duration::ZERO), "0.0");
    }
}
