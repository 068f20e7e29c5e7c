use std::time::Instant;

const MICROJOULES_PER_JOULE: f64 = 1_000_000.0;

/// Derives power draw from a cumulative energy counter.
///
/// Holds the previous reading between ticks. Power is the energy delta
/// divided by the elapsed time between the two readings, so a non-default
/// sampling interval still yields watts.
#[derive(Debug, Default)]
pub struct EnergyCounter {
    last: Option<(u64, Instant)>,
}

impl EnergyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reading taken at `now` and return the average power since
    /// the previous one.
    ///
    /// Returns `None` on the first reading and when the counter wrapped.
    pub fn update(&mut self, energy_uj: u64, now: Instant) -> Option<f64> {
        let (last_uj, last_time) = self.last.replace((energy_uj, now))?;

        if energy_uj < last_uj {
            return None;
        }

        let elapsed = now.saturating_duration_since(last_time).as_secs_f64();
        if elapsed <= 0.0 {
            return None;
        }

        Some((energy_uj - last_uj) as f64 / MICROJOULES_PER_JOULE / elapsed)
    }
}
