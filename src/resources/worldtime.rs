use bevy_ecs::prelude::Resource;

/// Stage clock, advanced once per update.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f64,
    pub delta: f64,
    pub time_scale: f64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Triangle wave over `period` seconds: 0 at the start of each period,
    /// 1 half way through.
    pub fn triangle(&self, period: f64) -> f64 {
        if period <= 0.0 {
            return 0.0;
        }
        let phase = (self.elapsed / period).fract();
        1.0 - (2.0 * phase - 1.0).abs()
    }
}
