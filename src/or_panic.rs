use std::fmt::Display;

/// Unwraps a value that must exist for the app to keep running, logging the
/// context before panicking so the failure shows up in the log output too.
pub trait PanicContext<T> {
    fn or_panic(self, ctx: &str) -> T;
}

impl<T, E> PanicContext<T> for Result<T, E>
where
    E: Display,
{
    #[track_caller]
    #[cold]
    #[inline(never)]
    fn or_panic(self, ctx: &str) -> T {
        match self {
            Ok(t) => t,
            Err(err) => {
                log::error!("{ctx}: {err}");
                panic!("{ctx}: {err}")
            }
        }
    }
}

impl<T> PanicContext<T> for Option<T> {
    #[track_caller]
    #[cold]
    #[inline(never)]
    fn or_panic(self, ctx: &str) -> T {
        match self {
            Some(t) => t,
            None => {
                log::error!("{ctx}");
                panic!("{ctx}")
            }
        }
    }
}
