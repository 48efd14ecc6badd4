use bevy_ecs::prelude::*;
use bevy_ecs::world::Command;

#[derive(Resource, Default)]
pub(crate) struct RequestExit(pub bool);

pub struct AppExitCommand;

impl Command for AppExitCommand {
    fn apply(self, world: &mut World) {
        log::info!("Closing app...");
        world.resource_mut::<RequestExit>().0 = true;
    }
}

pub trait ExitCmdExt {
    fn exit(&mut self);
}

impl ExitCmdExt for Commands<'_, '_> {
    fn exit(&mut self) {
        self.queue(AppExitCommand);
    }
}
