#[derive(Clone, Debug)]
pub(crate) enum LoadState {
    Loading,
    Loaded(Vec<u8>),
    Err(String),
}
