//! Startup splash overlay. The overlay is visible from process start; by
//! default it hides itself after the first completed frame, unless
//! [`prevent_auto_hide`] is called during bootstrap, in which case it stays
//! up until something calls hide explicitly.

use crate::app::prelude::{App, OnEnginePostFrame, OnEngineSetup, Plugin};
use atomic_refcell::AtomicRefCell;
use bevy_ecs::prelude::*;
use once_cell::sync::Lazy;

static OVERLAY: Lazy<AtomicRefCell<Overlay>> = Lazy::new(|| AtomicRefCell::new(Overlay::default()));

struct Overlay {
    visible: bool,
    auto_hide: bool,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            visible: true,
            auto_hide: true,
        }
    }
}

/// Keep the overlay up until an explicit [`hide`]. Meant to be called once
/// during bootstrap, before the first frame runs.
pub fn prevent_auto_hide() {
    OVERLAY.borrow_mut().auto_hide = false;
}

/// Hide the overlay. Idempotent: calling it again is a no-op.
pub fn hide() {
    let mut overlay = OVERLAY.borrow_mut();
    if overlay.visible {
        overlay.visible = false;
        log::debug!("Splash overlay hidden");
    }
}

pub fn is_visible() -> bool {
    OVERLAY.borrow().visible
}

/// ECS mirror of the overlay, the handle frame systems work against.
#[derive(Resource, Debug, Clone)]
pub struct Splash {
    visible: bool,
    auto_hide: bool,
}

impl Splash {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn auto_hide(&self) -> bool {
        self.auto_hide
    }

    /// Idempotent, any number of calls behaves like the first one.
    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            log::debug!("Splash overlay hidden");
        }
    }

    #[cfg(test)]
    pub(crate) fn visible_for_test() -> Self {
        Self {
            visible: true,
            auto_hide: false,
        }
    }
}

pub struct SplashPlugin;

impl Plugin for SplashPlugin {
    fn apply(self, app: App) -> App {
        app.add_systems(OnEngineSetup, init_splash_system)
            .add_systems(
                OnEnginePostFrame,
                (auto_hide_system, sync_overlay_system).chain(),
            )
    }
}

fn init_splash_system(mut cmds: Commands) {
    let overlay = OVERLAY.borrow();
    cmds.insert_resource(Splash {
        visible: overlay.visible,
        auto_hide: overlay.auto_hide,
    });
}

fn auto_hide_system(mut splash: ResMut<Splash>) {
    // without prevent_auto_hide the overlay only covers the first frame
    if splash.auto_hide {
        splash.hide();
    }
}

fn sync_overlay_system(mut splash: ResMut<Splash>) {
    let mut overlay = OVERLAY.borrow_mut();
    // hidden is terminal on both sides, a hide is never resurrected
    let visible = overlay.visible && splash.visible;
    overlay.visible = visible;
    splash.visible = visible;
    overlay.auto_hide = splash.auto_hide;
}
