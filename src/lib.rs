pub mod app;
pub mod assets;
pub mod fonts;
pub mod greeting;
pub mod splash;
pub mod view;

mod or_panic;

pub mod prelude;

pub use or_panic::PanicContext;

// re-export bevy ecs
pub use bevy_ecs;
