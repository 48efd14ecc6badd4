use futures::channel::oneshot;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::future::Future;

/// Reads files on a thread pool so the frame loop never blocks on IO.
pub(crate) struct FileLoader {
    thread_pool: ThreadPool,
}

impl FileLoader {
    pub fn new() -> Result<Self, String> {
        let thread_pool = ThreadPoolBuilder::default()
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Self { thread_pool })
    }

    pub fn load_file(&self, path: &str) -> impl Future<Output = Result<Vec<u8>, String>> + use<> {
        let (tx, rx) = oneshot::channel();

        let path = path.to_owned();
        self.thread_pool.spawn(move || {
            let read_result = std::fs::read(&path);
            let _ = tx.send(read_result.map_err(|e| e.to_string()));
        });

        async move {
            rx.await
                .unwrap_or_else(|_| Err("The channel was dropped.".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::waker::DummyWaker;
    use std::io::Write;
    use std::task::{Context, Poll};
    use std::time::Duration;

    #[test]
    fn reads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"file content").unwrap();

        let loader = FileLoader::new().unwrap();
        let mut fut = Box::pin(loader.load_file(&file.path().to_string_lossy()));

        let waker = DummyWaker.into_task_waker();
        let mut ctx = Context::from_waker(&waker);
        for _ in 0..400 {
            if let Poll::Ready(res) = fut.as_mut().poll(&mut ctx) {
                assert_eq!(res.unwrap(), b"file content");
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("file never loaded");
    }

    #[test]
    fn missing_file_reports_error() {
        let loader = FileLoader::new().unwrap();
        let mut fut = Box::pin(loader.load_file("definitely/not/here.bin"));

        let waker = DummyWaker.into_task_waker();
        let mut ctx = Context::from_waker(&waker);
        for _ in 0..400 {
            if let Poll::Ready(res) = fut.as_mut().poll(&mut ctx) {
                assert!(res.is_err());
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("read never concluded");
    }
}
