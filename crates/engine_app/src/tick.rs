//! Fixed-timestep tick loop.
//!
//! Each iteration:
//!
//! 1. Advance the `clock` singleton by one step.
//! 2. Run one [`World::tick`].
//! 3. Sleep for whatever is left of the step budget.

use std::time::Instant;

use anyhow::Result;
use engine_ecs::World;
use tracing::{debug, info, warn};

use crate::config::TickConfig;
use crate::modules::Clock;

/// Drives a [`World`] at a fixed rate.
#[derive(Debug)]
pub struct TickLoop {
    config: TickConfig,
    world: World,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, world: World) -> Self {
        Self { config, world }
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Run a single step of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Fails if the clock module is missing or a system fails.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        let clock = self.world.state_mut::<Clock>()?;
        clock.dt = dt as f32;
        clock.elapsed += dt;

        self.world.tick()?;
        Ok(())
    }

    /// Run the loop for the configured number of ticks, or indefinitely.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error.
    pub fn run(&mut self) -> Result<()> {
        let tick_duration = self.config.period()?;
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            systems = self.world.systems().len(),
            "starting tick loop"
        );

        loop {
            let start = Instant::now();

            self.step(tick_duration.as_secs_f64())?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "tick loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick = self.world.tick_count(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
            debug!(tick = self.world.tick_count(), "step done");
        }
        Ok(())
    }
}
