use super::exit::RequestExit;
use super::limiter::{FrameLimiter, LimitMode};
use super::log::{LogConfig, init_logs};
use super::plugin::{BaseSchedules, Plugin};
use super::schedules::{
    OnCleanup, OnEnginePostFrame, OnEnginePreFrame, OnEngineSetup, OnPostFrame, OnPreFrame,
    OnRender, OnSetup, OnUpdate,
};
use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};

/// Frame pacing configuration, applied as a plugin.
#[derive(Default, Clone, Copy)]
pub struct FrameConfig {
    max_fps: Option<u8>,
    unlimited: bool,
}

impl FrameConfig {
    /// Limits the maximum fps (defaults to 60)
    pub fn max_fps(fps: u8) -> Self {
        Self {
            max_fps: Some(fps),
            unlimited: false,
        }
    }

    /// Runs the loop as fast as it can, without pacing
    pub fn unlimited() -> Self {
        Self {
            max_fps: None,
            unlimited: true,
        }
    }

    pub(crate) fn limit_mode(&self) -> LimitMode {
        if self.unlimited {
            return LimitMode::Disabled;
        }

        self.max_fps
            .map(|fps| LimitMode::from_fps(fps as f64))
            .unwrap_or_default()
    }
}

impl Plugin for FrameConfig {
    fn apply(self, mut app: App) -> App {
        app.frame_config = self;
        app
    }
}

pub struct App {
    pub world: World,
    pub(crate) frame_config: FrameConfig,
    pub(crate) log_config: LogConfig,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let mut world = World::new();
        world.init_resource::<RequestExit>();

        let app = Self {
            world,
            frame_config: Default::default(),
            log_config: Default::default(),
        };

        app.add_plugin(BaseSchedules)
    }

    pub(crate) fn with_log(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    #[inline]
    pub fn add_plugin(self, plugin: impl Plugin) -> Self {
        plugin.apply(self)
    }

    #[inline]
    #[track_caller]
    pub fn add_systems<M>(
        mut self,
        label: impl ScheduleLabel,
        systems: impl IntoSystemConfigs<M>,
    ) -> Self {
        self.world
            .try_schedule_scope(label, |_world, schedule| {
                schedule.add_systems(systems);
            })
            .unwrap();
        self
    }

    #[inline]
    #[track_caller]
    pub fn add_resource<R: Resource>(mut self, value: R) -> Self {
        self.world.insert_resource(value);
        self
    }

    /// Runs the app until an exit is requested.
    ///
    /// The whole frame runs on the calling thread: setup schedules once,
    /// then engine-pre, user, render and engine-post schedules per frame,
    /// paced by the frame limiter.
    pub fn run(self) -> Result<(), String> {
        let Self {
            mut world,
            frame_config,
            log_config,
        } = self;

        init_logs(log_config);

        world.run_schedule(OnEngineSetup);
        world.run_schedule(OnSetup);

        let mut limiter = FrameLimiter::new(frame_config.limit_mode());
        loop {
            world.run_schedule(OnEnginePreFrame);
            world.run_schedule(OnPreFrame);
            world.run_schedule(OnUpdate);
            world.run_schedule(OnRender);
            world.run_schedule(OnPostFrame);
            world.run_schedule(OnEnginePostFrame);

            world.clear_trackers();

            if world.resource::<RequestExit>().0 {
                break;
            }

            limiter.tick();
        }

        world.run_schedule(OnCleanup);
        Ok(())
    }
}
