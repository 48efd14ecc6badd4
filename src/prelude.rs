pub use crate::app::prelude::*;
pub use crate::assets::{AssetData, AssetLoader, AssetsPlugin, LoadList};
pub use crate::fonts::{Font, FontLoadError, Fonts, FontsPlugin};
pub use crate::greeting::GreetingPlugin;
pub use crate::or_panic::*;
pub use crate::splash::{self, Splash, SplashPlugin};
pub use crate::view::{
    Align, Color, ContainerStyle, FontWeight, Node, StatusBarStyle, TextStyle, ViewTree,
};

pub use bevy_ecs::prelude::*;
