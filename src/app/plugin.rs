use super::app::App;
use super::schedules::{
    OnCleanup, OnEnginePostFrame, OnEnginePreFrame, OnEngineSetup, OnPostFrame, OnPreFrame,
    OnRender, OnSetup, OnUpdate,
};
use crate::app::time::TimePlugin;
use crate::assets::AssetsPlugin;
use crate::splash::SplashPlugin;
use bevy_ecs::prelude::Schedule;
use bevy_ecs::schedule::ExecutorKind;

pub trait Plugin {
    fn apply(self, app: App) -> App;
}

macro_rules! add_schedules {
    ($app:expr, $( $schedule:ident ),* $(,)?) => {
        $(
            {
                // one cooperative thread drives the whole frame
                let mut schedule = Schedule::new($schedule);
                schedule.set_executor_kind(ExecutorKind::SingleThreaded);
                $app.world.add_schedule(schedule);
            }
        )*
    };
}

pub(crate) struct BaseSchedules;
impl Plugin for BaseSchedules {
    fn apply(self, mut app: App) -> App {
        add_schedules!(
            app,
            OnEngineSetup,
            OnEnginePreFrame,
            OnEnginePostFrame,
            OnSetup,
            OnPreFrame,
            OnUpdate,
            OnRender,
            OnPostFrame,
            OnCleanup,
        );
        app
    }
}

/// Everything an app needs besides its own screens: time, the asset
/// loader pump and the splash overlay lifecycle.
pub struct MainPlugins;
impl Plugin for MainPlugins {
    fn apply(self, app: App) -> App {
        app.add_plugin(TimePlugin)
            .add_plugin(AssetsPlugin::default())
            .add_plugin(SplashPlugin)
    }
}
