use bevy::prelude::*;
use bevy::time::TimeSystem;

/// Frame rate at which one frame advances the simulation by one animation-ratio unit.
pub const REFERENCE_FRAME_RATE: f64 = 60.0;

pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<SimulationClock>()
            .init_resource::<SimulationClock>()
            .add_systems(First, clock_tick.after(TimeSystem));
    }
}

/// Simulation time, counted in animation-ratio units rather than wall-clock seconds.
///
/// One unit is one frame at [`REFERENCE_FRAME_RATE`], so stepping the clock by the
/// frame's ratio keeps the simulation speed independent of the actual frame rate.
#[derive(Debug, Default, Copy, Clone, PartialEq, Resource, Reflect)]
#[reflect(Resource)]
pub struct SimulationClock {
    ticks: u64,
    elapsed: f64,
    delta: f64,
}

impl SimulationClock {
    pub fn tick(&mut self, ratio: f64) {
        self.ticks += 1;
        self.elapsed += ratio;
        self.delta = ratio;
    }

    /// Number of ticks since the clock was created.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Accumulated animation-ratio units.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Animation ratio of the last tick.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub fn animation_ratio(delta_seconds: f64) -> f64 {
        delta_seconds * REFERENCE_FRAME_RATE
    }
}

fn clock_tick(mut clock: ResMut<SimulationClock>, virtual_time: Res<Time<Virtual>>) {
    clock.tick(SimulationClock::animation_ratio(
        virtual_time.delta_secs_f64(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn one_reference_frame_is_one_unit() {
        assert_abs_diff_eq!(SimulationClock::animation_ratio(1.0 / 60.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(SimulationClock::animation_ratio(1.0 / 30.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn tick_accumulates() {
        let mut clock = SimulationClock::default();
        clock.tick(1.0);
        clock.tick(0.5);
        clock.tick(2.0);
        assert_eq!(clock.ticks(), 3);
        assert_abs_diff_eq!(clock.elapsed(), 3.5);
        assert_abs_diff_eq!(clock.delta(), 2.0);
    }
}
