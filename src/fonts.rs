use crate::app::prelude::{App, OnEnginePreFrame, OnEngineSetup, Plugin};
use crate::assets::{AssetData, AssetLoader};
use bevy_ecs::prelude::*;
use cosmic_text::fontdb::{Database, Source};
use cosmic_text::{Style, Weight};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A font face parsed from a loaded asset.
#[derive(Clone, Debug)]
pub struct Font {
    name: String,
    family: Arc<String>,
    weight: Weight,
    style: Style,
}

impl Font {
    /// Name the font was requested under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Family name declared by the font face
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn style(&self) -> Style {
        self.style
    }
}

/// The single error kind of font loading: a file that could not be read
/// or bytes that are not a valid font face.
#[derive(Clone, Debug)]
pub struct FontLoadError {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font '{}' failed to load: {}", self.name, self.reason)
    }
}

pub(crate) fn parse_font(data: &AssetData) -> Result<Font, String> {
    let mut db = Database::new();
    let ids = db.load_font_source(Source::Binary(Arc::new(data.data.clone())));
    let raw_id = *ids
        .first()
        .ok_or_else(|| "Cannot create the font".to_string())?;
    let face = db
        .face(raw_id)
        .ok_or_else(|| "Invalid font type".to_string())?;

    Ok(Font {
        name: data.id.clone(),
        family: Arc::new(
            face.families
                .first()
                .map(|(family, _)| family.clone())
                .unwrap_or_default(),
        ),
        weight: face.weight,
        style: face.style,
    })
}

struct FontRequest {
    name: String,
    path: String,
}

/// Loading state for the whole requested font set. The pair the rest of
/// the app reacts to is (is_loaded, error); once either is set the set is
/// concluded, and conclusion is terminal for the session.
#[derive(Resource)]
pub struct Fonts {
    pending: Vec<FontRequest>,
    fonts: FxHashMap<String, Font>,
    error: Option<FontLoadError>,
    concluded: bool,
    total: usize,
}

impl Fonts {
    fn new(manifest: &[(String, String)]) -> Self {
        Self {
            pending: manifest
                .iter()
                .map(|(name, path)| FontRequest {
                    name: name.clone(),
                    path: path.clone(),
                })
                .collect(),
            fonts: Default::default(),
            error: None,
            concluded: false,
            total: manifest.len(),
        }
    }

    /// True once every requested font parsed successfully
    pub fn is_loaded(&self) -> bool {
        self.total > 0 && self.fonts.len() == self.total
    }

    /// First failure observed while loading the set, if any
    pub fn error(&self) -> Option<&FontLoadError> {
        self.error.as_ref()
    }

    /// True once loading finished, successfully or not. Terminal: a late
    /// signal change never flips this back.
    pub fn concluded(&self) -> bool {
        self.concluded
    }

    pub fn get(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    pub(crate) fn insert_font(&mut self, font: Font) {
        self.fonts.insert(font.name.clone(), font);
    }

    pub(crate) fn record_error(&mut self, error: FontLoadError) {
        if self.error.is_none() {
            log::warn!("{error}");
            self.error = Some(error);
        }
    }

    pub(crate) fn refresh_conclusion(&mut self) {
        if self.concluded {
            return;
        }

        if self.is_loaded() || self.error.is_some() {
            self.concluded = true;
            log::debug!(
                "Font loading concluded: loaded={}, error={}",
                self.is_loaded(),
                self.error.is_some()
            );
        }
    }
}

/// Requests a set of named font files and tracks them until the whole set
/// concludes, one way or the other.
pub struct FontsPlugin {
    manifest: Vec<(String, String)>,
}

impl FontsPlugin {
    /// `manifest` pairs a font name with the path of its file.
    pub fn new(manifest: &[(&str, &str)]) -> Self {
        Self {
            manifest: manifest
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_string()))
                .collect(),
        }
    }
}

impl Plugin for FontsPlugin {
    fn apply(self, app: App) -> App {
        let fonts = Fonts::new(&self.manifest);
        let paths = self
            .manifest
            .iter()
            .map(|(_, path)| path.clone())
            .collect::<Vec<_>>();

        app.add_resource(fonts)
            .add_systems(OnEngineSetup, move |mut loader: ResMut<AssetLoader>| {
                loader.add_parser("ttf", parse_font);
                loader.add_parser("otf", parse_font);
                for path in &paths {
                    loader.load(path);
                }
            })
            .add_systems(OnEnginePreFrame, update_fonts_system)
    }
}

fn update_fonts_system(mut fonts: ResMut<Fonts>, mut loader: ResMut<AssetLoader>) {
    // pending is taken out so fonts can be mutated while walking it
    let mut pending = std::mem::take(&mut fonts.pending);
    pending.retain(|request| {
        if let Some(mut font) = loader.take::<Font>(&request.path) {
            font.name = request.name.clone();
            log::debug!("Font ready: '{}' ({})", font.name, font.family);
            fonts.insert_font(font);
            return false;
        }

        if let Some(reason) = loader.load_error(&request.path) {
            let reason = reason.to_string();
            fonts.record_error(FontLoadError {
                name: request.name.clone(),
                reason,
            });
            return false;
        }

        true
    });
    fonts.pending = pending;

    fonts.refresh_conclusion();
}
