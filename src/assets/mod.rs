use bevy_ecs::prelude::*;
use futures::task::{Context, Poll};
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::{
    any::{Any, TypeId},
    path::{Path, PathBuf},
    sync::Arc,
};

mod events;
mod load_file;
mod waker;

use crate::{
    app::prelude::{App, OnEnginePreFrame, Plugin},
    assets::{events::LoadState, load_file::FileLoader, waker::*},
    or_panic::PanicContext,
};

/// Registers the asset loader and its per-frame pump: pending file reads
/// are polled and newly loaded bytes are parsed at the start of each frame.
#[derive(Default)]
pub struct AssetsPlugin {
    loader: AssetLoader,
}

impl AssetsPlugin {
    pub fn add_parser<T, F>(mut self, ext: &str, parser: F) -> Self
    where
        T: Any + Send + Sync + 'static,
        F: Fn(&AssetData) -> Result<T, String> + Send + Sync + 'static,
    {
        self.loader.add_parser(ext, parser);
        self
    }
}

impl Plugin for AssetsPlugin {
    fn apply(self, app: App) -> App {
        app.add_resource(self.loader)
            .add_systems(OnEnginePreFrame, pump_assets_system)
    }
}

/// Raw bytes of a loaded asset, handed to parsers.
pub struct AssetData {
    pub id: String,
    pub data: Vec<u8>,
}

struct ParsedAny {
    type_id: TypeId,
    value: Box<dyn Any + Send + Sync>,
}

type ParserFn = dyn Fn(&AssetData) -> Result<ParsedAny, String> + Send + Sync + 'static;

#[derive(Resource)]
pub struct AssetLoader {
    file_loader: FileLoader,
    loading: Vec<LoadWrapper>,
    loaded: FxHashMap<String, (TypeId, Box<dyn Any + Send + Sync>)>,
    states: FxHashMap<String, LoadState>,
    lists: FxHashMap<String, Vec<String>>,
    parsers: FxHashMap<String, Arc<ParserFn>>,
}

impl Default for AssetLoader {
    fn default() -> Self {
        let mut loader = Self {
            file_loader: FileLoader::new().or_panic("Creating FileLoader"),
            loading: vec![],
            loaded: Default::default(),
            states: Default::default(),
            lists: Default::default(),
            parsers: Default::default(),
        };

        loader.add_parser("", bytes_parser);
        loader
    }
}

impl AssetLoader {
    /// Returns a reference to a loaded asset by its ID and type.
    pub fn get<T: Any + Send + Sync>(&self, id: &str) -> Option<&T> {
        let (tid, v) = self.loaded.get(id)?;
        if *tid == TypeId::of::<T>() {
            v.downcast_ref::<T>()
        } else {
            None
        }
    }

    /// Removes and returns a loaded asset, transferring ownership to the caller.
    pub fn take<T: Any + Send + Sync>(&mut self, id: &str) -> Option<T> {
        let (tid, v) = self.loaded.remove(id)?;
        let same_type = tid == TypeId::of::<T>();
        if !same_type {
            self.loaded.insert(id.to_string(), (tid, v));
            return None;
        }

        let val: T = v.downcast::<T>().ok().map(|b| *b)?;
        self.remove_from_lists(id);
        Some(val)
    }

    /// Registers a parser for a file extension, turning raw bytes into a typed value.
    pub fn add_parser<T, F>(&mut self, ext: &str, parser: F)
    where
        T: Any + Send + Sync + 'static,
        F: Fn(&AssetData) -> Result<T, String> + Send + Sync + 'static,
    {
        self.parsers.insert(
            ext.to_string(),
            Arc::new(move |data: &AssetData| {
                parser(data).map(|t| ParsedAny {
                    type_id: TypeId::of::<T>(),
                    value: Box::new(t),
                })
            }),
        );
    }

    /// Loads an asset from a file path.
    pub fn load(&mut self, file_path: &str) {
        self.load_with_id(file_path, file_path);
    }

    /// Load an asset from a file path with a custom ID.
    pub fn load_with_id(&mut self, id: &str, file_path: &str) {
        if self.states.contains_key(id) || self.is_loaded(id) {
            log::debug!("Skipping load '{}': already pending or loaded", id);
            return;
        }

        log::debug!("Loading asset file '{file_path}'");
        let fut = Box::pin(self.file_loader.load_file(file_path));
        self.states.insert(id.to_string(), LoadState::Loading);
        self.loading.push(LoadWrapper::new(id, fut));
    }

    /// Loads an asset from raw bytes with a custom ID.
    pub fn load_bytes<S, B>(&mut self, id: S, bytes: B)
    where
        S: Into<String>,
        B: Into<Vec<u8>>,
    {
        let id = id.into();

        if self.states.contains_key(&id) || self.is_loaded(&id) {
            log::debug!("Skipping load '{}': already pending or loaded", id);
            return;
        }

        log::debug!("Loading asset bytes '{id}'");
        self.states.insert(id, LoadState::Loaded(bytes.into()));
    }

    /// Loads multiple assets as a named list for tracking progress.
    pub fn load_list(&mut self, id: &str, list: impl Into<LoadList>) {
        log::debug!("Loading asset list '{}'", id);
        let list_id = id.to_string();
        let LoadList { items } = list.into();

        for item in &items {
            match &item.typ {
                LoadType::Path(p) => {
                    let path = p.to_string_lossy().to_string();
                    self.load_with_id(&item.id, &path);
                }
                LoadType::Bytes(b) => {
                    self.load_bytes(&item.id, b.clone());
                }
            }
        }

        self.lists
            .insert(list_id, items.into_iter().map(|item| item.id).collect());
    }

    /// Checks if an asset (or every asset of a list) has been loaded and parsed.
    pub fn is_loaded(&self, id: &str) -> bool {
        if let Some(list) = self.lists.get(id) {
            return list.iter().all(|item_id| self.loaded.contains_key(item_id));
        }

        self.loaded.contains_key(id)
    }

    pub fn is_loading(&self, id: &str) -> bool {
        if let Some(list) = self.lists.get(id) {
            return list.iter().any(|item_id| self.is_asset_loading(item_id));
        }
        self.is_asset_loading(id)
    }

    fn is_asset_loading(&self, id: &str) -> bool {
        self.states
            .get(id)
            .is_some_and(|s| matches!(s, LoadState::Loading | LoadState::Loaded(_)))
    }

    /// Returns the read or parse error recorded for an asset, if any.
    pub fn load_error(&self, id: &str) -> Option<&str> {
        self.states.get(id).and_then(|s| match s {
            LoadState::Err(err) => Some(err.as_str()),
            _ => None,
        })
    }

    /// Returns the loading progress of a list (0.0 to 1.0).
    pub fn list_progress(&self, list_id: &str) -> f32 {
        let Some(list) = self.lists.get(list_id) else {
            return 0.0;
        };

        let total = list.len();
        let done = list.iter().filter(|item| self.is_loaded(item)).count();
        (done as f32) / (total as f32)
    }

    /// Clears all loaded assets.
    pub fn clear(&mut self) {
        self.loaded.clear();
        self.lists.clear();
    }

    pub(crate) fn update(&mut self) {
        let mut needs_clean = false;
        for pending in self.loading.iter_mut() {
            if let Some(state) = pending.try_load() {
                if let Some(entry) = self.states.get_mut(&pending.id) {
                    *entry = state;
                }
                needs_clean = true;
            }
        }

        if needs_clean {
            self.loading.retain(|pending| !pending.is_loaded());
        }
    }

    pub(crate) fn parse_pending(&mut self) {
        struct ToParse {
            id: String,
            ext: String,
            bytes: Vec<u8>,
        }

        let mut to_parse = vec![];
        for (id, st) in self.states.iter() {
            if let LoadState::Loaded(bytes) = st {
                let ext = Path::new(id)
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string();

                to_parse.push(ToParse {
                    id: id.clone(),
                    ext,
                    bytes: bytes.clone(),
                });
            }
        }

        for ToParse { id, ext, bytes } in to_parse {
            let parser = self
                .parsers
                .get(&ext)
                .or_else(|| self.parsers.get(""))
                .cloned()
                .or_panic("parser must exist (ext or default)");

            let data = AssetData {
                id: id.clone(),
                data: bytes,
            };
            match (parser)(&data) {
                Ok(parsed) => {
                    self.loaded.insert(id.clone(), (parsed.type_id, parsed.value));
                    self.states.remove(&id);
                    log::info!("Asset parsed '{id}'");
                }
                Err(e) => {
                    if let Some(s) = self.states.get_mut(&id) {
                        *s = LoadState::Err(e.clone());
                    }
                    log::warn!("Parse failed for '{id}': {e}");
                }
            }
        }
    }

    fn remove_from_lists(&mut self, id: &str) {
        self.lists.iter_mut().for_each(|(_, list)| {
            list.retain(|item| item != id);
        });

        self.lists.retain(|_, list| !list.is_empty());
    }

    #[cfg(test)]
    pub(crate) fn is_parsed<T: Any + Send + Sync>(&self, id: &str) -> bool {
        self.loaded
            .get(id)
            .is_some_and(|(tid, _)| *tid == TypeId::of::<T>())
    }
}

fn bytes_parser(data: &AssetData) -> Result<Vec<u8>, String> {
    Ok(data.data.clone())
}

fn pump_assets_system(mut loader: ResMut<AssetLoader>) {
    loader.update();
    loader.parse_pending();
}

struct LoadItem {
    id: String,
    typ: LoadType,
}

enum LoadType {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Default)]
pub struct LoadList {
    items: Vec<LoadItem>,
}

impl LoadList {
    #[inline]
    pub fn add_from_path(&mut self, path: &str) -> &mut Self {
        self.items.push(LoadItem {
            id: path.to_string(),
            typ: LoadType::Path(PathBuf::from(path)),
        });
        self
    }

    #[inline]
    pub fn add_from_bytes(&mut self, id: &str, bytes: &[u8]) -> &mut Self {
        self.items.push(LoadItem {
            id: id.to_string(),
            typ: LoadType::Bytes(bytes.to_vec()),
        });
        self
    }
}

trait ToLoadItem {
    fn to_load_item(&self) -> LoadItem;
}

impl ToLoadItem for &str {
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: (*self).to_string(),
            typ: LoadType::Path(PathBuf::from(*self)),
        }
    }
}

impl ToLoadItem for String {
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: self.clone(),
            typ: LoadType::Path(PathBuf::from(self)),
        }
    }
}

impl ToLoadItem for &Path {
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: self.to_string_lossy().to_string(),
            typ: LoadType::Path(self.to_path_buf()),
        }
    }
}

impl<T> ToLoadItem for (T, &str)
where
    T: AsRef<str>,
{
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: self.0.as_ref().to_string(),
            typ: LoadType::Path(PathBuf::from(self.1)),
        }
    }
}

impl<T> ToLoadItem for (T, Vec<u8>)
where
    T: AsRef<str>,
{
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: self.0.as_ref().to_string(),
            typ: LoadType::Bytes(self.1.clone()),
        }
    }
}

impl<T> ToLoadItem for (T, &[u8])
where
    T: AsRef<str>,
{
    fn to_load_item(&self) -> LoadItem {
        LoadItem {
            id: self.0.as_ref().to_string(),
            typ: LoadType::Bytes(self.1.to_vec()),
        }
    }
}

impl<'a, N> ToLoadItem for &'a N
where
    N: ToLoadItem,
{
    fn to_load_item(&self) -> LoadItem {
        N::to_load_item(*self)
    }
}

impl<I, N> From<I> for LoadList
where
    I: IntoIterator<Item = N>,
    N: ToLoadItem,
{
    fn from(value: I) -> Self {
        Self {
            items: value.into_iter().map(|item| item.to_load_item()).collect(),
        }
    }
}

type InnerBoxFuture = BoxFuture<'static, Result<Vec<u8>, String>>;

struct LoadWrapper {
    id: String,
    fut: Arc<Mutex<InnerBoxFuture>>,
    loaded: bool,
}

impl LoadWrapper {
    fn new(id: &str, fut: InnerBoxFuture) -> Self {
        Self {
            id: id.to_string(),
            fut: Arc::new(Mutex::new(fut)),
            loaded: false,
        }
    }

    fn try_load(&mut self) -> Option<LoadState> {
        if self.loaded {
            return None;
        }

        let waker = DummyWaker.into_task_waker();
        let mut ctx = Context::from_waker(&waker);
        match self.fut.lock().as_mut().poll(&mut ctx) {
            Poll::Ready(r_buff) => {
                self.loaded = true;
                match r_buff {
                    Ok(buff) => {
                        log::debug!("File loaded: '{}'", self.id);
                        Some(LoadState::Loaded(buff))
                    }
                    Err(err) => {
                        let err = format!("Cannot load file: {}: {}", self.id, err);
                        log::warn!("{err}");
                        Some(LoadState::Err(err))
                    }
                }
            }
            _ => None,
        }
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn parser_string(asset_input: &AssetData) -> Result<String, String> {
        String::from_utf8(asset_input.data.clone()).map_err(|utf8_error| utf8_error.to_string())
    }

    fn parser_always_error(_asset_input: &AssetData) -> Result<String, String> {
        Err("error".to_string())
    }

    fn pump(loader: &mut AssetLoader) {
        loader.update();
        loader.parse_pending();
    }

    // pumps until the id concludes (parsed or errored) or the deadline hits
    fn pump_until_concluded(loader: &mut AssetLoader, id: &str) {
        for _ in 0..400 {
            pump(loader);
            if loader.is_loaded(id) || loader.load_error(id).is_some() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("'{id}' never concluded");
    }

    #[test]
    fn load_bytes_default_parser() {
        let mut loader = AssetLoader::default();
        loader.load_bytes("no_id", b"hello world".to_vec());
        pump(&mut loader);

        assert!(loader.is_parsed::<Vec<u8>>("no_id"));
        let stored_bytes = loader.get::<Vec<u8>>("no_id").unwrap();
        assert_eq!(stored_bytes, &b"hello world".to_vec());
    }

    #[test]
    fn load_bytes_ext_parser() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);
        loader.load_bytes("text_file.txt", b"sample text".to_vec());
        pump(&mut loader);

        assert!(loader.is_parsed::<String>("text_file.txt"));
        let stored_text = loader.get::<String>("text_file.txt").unwrap();
        assert_eq!(stored_text, "sample text");
    }

    #[test]
    fn load_list_take() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);

        let mut list = LoadList::default();
        list.add_from_bytes("inline_data.txt", b"bytes content");
        loader.load_list("example_list_id", list);
        pump(&mut loader);

        assert!(loader.is_parsed::<String>("inline_data.txt"));
        let taken_value: String = loader.take::<String>("inline_data.txt").unwrap();
        assert_eq!(taken_value, "bytes content");
        assert!(!loader.is_loaded("inline_data.txt"));
        assert!(loader.lists.get("example_list_id").is_none());
    }

    #[test]
    fn load_list_progress() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);

        let mut list = LoadList::default();
        list.add_from_bytes("first_loaded.txt", b"alpha");
        list.add_from_path("some/missing.file");
        loader.load_list("dual_list_progress", list);
        pump(&mut loader);

        let progress_value = loader.list_progress("dual_list_progress");
        assert!((progress_value - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn load_bytes_error_state() {
        let mut loader = AssetLoader::default();
        loader.add_parser("err", parser_always_error);
        loader.load_bytes("bad_asset.err", b"does not matter".to_vec());
        pump(&mut loader);

        assert!(loader.get::<String>("bad_asset.err").is_none());
        let err = loader.load_error("bad_asset.err").unwrap();
        assert!(err.contains("error"));
    }

    #[test]
    fn is_loading_before_pump() {
        let mut loader = AssetLoader::default();
        loader.load("unavailable_path.asset");
        assert!(loader.is_loading("unavailable_path.asset"));
    }

    #[test]
    fn clear_drops_loaded_and_lists() {
        let mut loader = AssetLoader::default();
        loader.load_bytes("first_blob", b"one".to_vec());
        loader.load_bytes("second_blob", b"two".to_vec());
        pump(&mut loader);

        loader.lists.insert(
            "temporary_list".to_string(),
            vec!["first_blob".to_string(), "second_blob".to_string()],
        );
        assert!(loader.is_loaded("first_blob"));
        assert!(loader.is_loaded("second_blob"));

        loader.clear();
        assert!(loader.loaded.is_empty());
        assert!(loader.lists.is_empty());
    }

    #[test]
    fn type_specific_parsed() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);
        loader.load_bytes("typ.txt", b"abc".to_vec());
        pump(&mut loader);

        assert!(loader.is_parsed::<String>("typ.txt"));
        assert!(!loader.is_parsed::<Vec<u8>>("typ.txt"));
        assert!(loader.get::<Vec<u8>>("typ.txt").is_none());
    }

    #[test]
    fn load_bytes_skips_duplicates() {
        let mut loader = AssetLoader::default();
        loader.load_bytes("dup_id.txt", b"first".to_vec());
        let states_count_before = loader.states.len();
        loader.load_bytes("dup_id.txt", b"second".to_vec());
        assert_eq!(states_count_before, loader.states.len());

        pump(&mut loader);
        assert!(loader.is_loaded("dup_id.txt"));
    }

    #[test]
    fn load_paths_skips_duplicates() {
        let mut loader = AssetLoader::default();
        loader.load("dup.asset");
        let before = loader.states.len();
        loader.load("dup.asset");
        assert_eq!(before, loader.states.len());
    }

    #[test]
    fn load_with_id_skips_repath() {
        let mut loader = AssetLoader::default();
        loader.load_with_id("x", "a.asset");
        let n1 = loader.states.len();
        loader.load_with_id("x", "b.asset");
        assert_eq!(n1, loader.states.len());
    }

    #[test]
    fn load_list_ref_slice_strs() {
        let mut loader = AssetLoader::default();
        loader.load_list("list", &["some/path.asset"]);
        assert!(loader.is_loading("some/path.asset"));
    }

    #[test]
    fn list_progress_unknown() {
        let loader = AssetLoader::default();
        assert_eq!(loader.list_progress("missing_list"), 0.0);
    }

    #[test]
    fn list_progress_complete() {
        let mut loader = AssetLoader::default();
        loader.load_list(
            "full",
            [("a.txt", b"a".to_vec()), ("b.txt", b"b".to_vec())],
        );
        pump(&mut loader);

        assert!((loader.list_progress("full") - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn take_wrong_type_keeps_asset() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);
        loader.load_bytes("t.txt", b"hello".to_vec());
        pump(&mut loader);

        assert!(loader.take::<Vec<u8>>("t.txt").is_none());
        assert!(loader.is_loaded("t.txt"));
    }

    #[test]
    fn take_keeps_list_with_remaining_items() {
        let mut loader = AssetLoader::default();
        loader.add_parser("txt", parser_string);
        loader.load_list(
            "lst",
            [("a.txt", b"a".to_vec()), ("b.txt", b"b".to_vec())],
        );
        pump(&mut loader);

        let _ = loader.take::<String>("a.txt").unwrap();
        let v = loader.lists.get("lst").unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0], "b.txt");
        assert!(loader.is_loaded("b.txt"));
    }

    #[test]
    fn loads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"from disk").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let mut loader = AssetLoader::default();
        loader.load(&path);
        pump_until_concluded(&mut loader, &path);

        let bytes = loader.get::<Vec<u8>>(&path).unwrap();
        assert_eq!(bytes, &b"from disk".to_vec());
    }

    #[test]
    fn missing_file_concludes_with_error() {
        let mut loader = AssetLoader::default();
        loader.load("not/a/real/file.bin");
        pump_until_concluded(&mut loader, "not/a/real/file.bin");

        assert!(!loader.is_loaded("not/a/real/file.bin"));
        let err = loader.load_error("not/a/real/file.bin").unwrap();
        assert!(err.contains("Cannot load file"));
    }
}
