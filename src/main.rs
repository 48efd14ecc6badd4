use buongiorno::prelude::*;

fn main() -> Result<(), String> {
    // the overlay must stay up until fonts conclude, not just the first frame
    splash::prevent_auto_hide();

    App::new()
        .add_plugin(LogPlugin::default())
        .add_plugin(MainPlugins)
        .add_plugin(GreetingPlugin)
        .run()
}
