use crate::app::prelude::{App, OnRender, Plugin};
use crate::fonts::{Fonts, FontsPlugin};
use crate::splash::Splash;
use crate::view::{Color, ContainerStyle, FontWeight, Node, StatusBarStyle, TextStyle, ViewTree};
use bevy_ecs::prelude::*;

pub const GREETING: &str = "Buongiorno!";

const FONT_FAMILY: &str = "Host Grotesk";
const BASE_TEXT_SIZE: f32 = 16.0;

const FONT_MANIFEST: [(&str, &str); 4] = [
    ("HostGrotesk-Regular", "assets/fonts/HostGrotesk-Regular.ttf"),
    ("HostGrotesk-Medium", "assets/fonts/HostGrotesk-Medium.ttf"),
    ("HostGrotesk-SemiBold", "assets/fonts/HostGrotesk-SemiBold.ttf"),
    ("HostGrotesk-Bold", "assets/fonts/HostGrotesk-Bold.ttf"),
];

/// The app's single screen: requests the font family and renders the
/// greeting once loading concludes.
pub struct GreetingPlugin;

impl Plugin for GreetingPlugin {
    fn apply(self, app: App) -> App {
        app.add_resource(ViewTree::default())
            .add_plugin(FontsPlugin::new(&FONT_MANIFEST))
            .add_systems(OnRender, render_greeting_system)
    }
}

fn render_greeting_system(
    fonts: Res<Fonts>,
    mut splash: ResMut<Splash>,
    mut tree: ResMut<ViewTree>,
) {
    // while the font set is pending nothing is drawn and the splash stays up
    if !fonts.concluded() {
        tree.clear();
        return;
    }

    // an errored load dismisses the splash and renders the same screen;
    // the failure is never surfaced here
    splash.hide();
    tree.set_root(greeting_screen());
}

fn greeting_screen() -> Node {
    Node::Container {
        style: ContainerStyle {
            background: Color::LIME,
            ..Default::default()
        },
        children: vec![
            Node::Text {
                content: GREETING.to_string(),
                style: TextStyle {
                    family: FONT_FAMILY.to_string(),
                    weight: FontWeight::SemiBold,
                    size: BASE_TEXT_SIZE,
                },
            },
            Node::StatusBar {
                style: StatusBarStyle::Auto,
            },
        ],
    }
}
