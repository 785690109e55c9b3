use std::time::Duration;

pub const DEFAULT_CPU_HZ: u32 = 500;
pub const TIMER_HZ: u32 = 60;

/// Fixed-timestep clock with two independent accumulators: one releases CPU
/// cycles at the configured frequency, the other releases 60 Hz ticks for the
/// delay and sound timers. Remainders carry over between calls, so the same
/// elapsed time yields the same tick counts no matter how it is split up.
pub struct Clock {
    cycle_period: Duration,
    timer_period: Duration,
    cycle_accum: Duration,
    timer_accum: Duration,
}

impl Clock {
    pub fn new(cpu_hz: u32) -> Self {
        Self {
            cycle_period: Duration::from_secs(1) / cpu_hz,
            timer_period: Duration::from_secs(1) / TIMER_HZ,
            cycle_accum: Duration::ZERO,
            timer_accum: Duration::ZERO,
        }
    }

    /// Feeds elapsed wall time and returns how many CPU cycles and how many
    /// timer ticks fell due. Catch-up counts, never dropped time: a long tick
    /// simply releases more cycles.
    pub fn advance(&mut self, elapsed: Duration) -> (u32, u32) {
        self.cycle_accum += elapsed;
        self.timer_accum += elapsed;

        let mut cycles = 0;
        while self.cycle_accum >= self.cycle_period {
            self.cycle_accum -= self.cycle_period;
            cycles += 1;
        }

        let mut timer_ticks = 0;
        while self.timer_accum >= self.timer_period {
            self.timer_accum -= self.timer_period;
            timer_ticks += 1;
        }

        (cycles, timer_ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_releases_full_rates() {
        let mut clock = Clock::new(500);
        let (cycles, ticks) = clock.advance(Duration::from_secs(1));
        assert_eq!(cycles, 500);
        assert_eq!(ticks, 60);
    }

    #[test]
    fn short_tick_releases_nothing_but_accumulates() {
        let mut clock = Clock::new(500);
        let (cycles, ticks) = clock.advance(Duration::from_millis(1));
        assert_eq!((cycles, ticks), (0, 0));
        let (cycles, ticks) = clock.advance(Duration::from_millis(1));
        // 2ms is exactly one cycle at 500 Hz, still short of a 60 Hz tick
        assert_eq!((cycles, ticks), (1, 0));
    }

    #[test]
    fn tick_counts_are_independent_of_split() {
        let mut coarse = Clock::new(700);
        let (total_cycles, total_ticks) = coarse.advance(Duration::from_millis(1000));

        let mut fine = Clock::new(700);
        let mut cycles = 0;
        let mut ticks = 0;
        for _ in 0..100 {
            let (c, t) = fine.advance(Duration::from_millis(10));
            cycles += c;
            ticks += t;
        }

        assert_eq!(cycles, total_cycles);
        assert_eq!(ticks, total_ticks);
    }

    #[test]
    fn timer_rate_is_independent_of_cpu_rate() {
        for hz in [60, 500, 1000] {
            let mut clock = Clock::new(hz);
            let (_, ticks) = clock.advance(Duration::from_secs(2));
            assert_eq!(ticks, 120, "cpu_hz = {hz}");
        }
    }
}
