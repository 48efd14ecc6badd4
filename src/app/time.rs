use crate::app::prelude::{App, OnEnginePreFrame, OnEngineSetup, Plugin};
use bevy_ecs::prelude::Resource;
use bevy_ecs::system::{Commands, ResMut};
use std::time::{Duration, Instant};

pub struct TimePlugin;
impl Plugin for TimePlugin {
    fn apply(self, app: App) -> App {
        app.add_systems(OnEngineSetup, init_time_system)
            .add_systems(OnEnginePreFrame, update_time_system)
    }
}

fn init_time_system(mut cmds: Commands) {
    cmds.insert_resource(Time {
        init_time: Instant::now(),
        last_time: None,
        delta: Duration::ZERO,
        elapsed: Duration::ZERO,
    });
}

fn update_time_system(mut t_res: ResMut<Time>) {
    let now = Instant::now();
    t_res.delta = t_res.last_time.map_or(Duration::ZERO, |last| now - last);
    t_res.elapsed = now - t_res.init_time;
    t_res.last_time = Some(now);
}

#[derive(Resource)]
pub struct Time {
    init_time: Instant,
    last_time: Option<Instant>,
    delta: Duration,
    elapsed: Duration,
}

impl Time {
    pub fn fps(&self) -> f32 {
        if self.delta.is_zero() {
            return 0.0;
        }
        1.0 / self.delta_f32()
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_f32(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_f32(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn init_time(&self) -> Instant {
        self.init_time
    }

    pub fn last_time(&self) -> Option<Instant> {
        self.last_time
    }
}
