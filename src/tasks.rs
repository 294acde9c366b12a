//! Background fetches. Each query runs on its own thread and reports back
//! over the app's task channel; the UI drains the channel once per frame.
//!
//! With `panic = "abort"` (release profile) a panicking worker still takes the
//! process down; the unwind guard below only applies to unwinding builds.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::api::{CatalogSource, FetchError};
use crate::artwork::{self, DecodedImage, ImageSource};
use crate::models::{QueryKey, ResultSet};
use crate::view::MountId;

/// Where a catalog result may land: the view mount and the cache epoch it
/// was requested under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub mount: MountId,
    pub epoch: u64,
}

/// Background task messages
pub enum TaskResult {
    Fetched {
        ticket: Ticket,
        key: QueryKey,
        result: Result<ResultSet, FetchError>,
    },
    Artwork {
        url: String,
        result: Result<DecodedImage, FetchError>,
    },
}

/// Run `key` against `source` off the UI thread. `notify` is called after the
/// result is sent (the app uses it to request a repaint).
pub fn spawn_fetch<N>(
    source: Arc<dyn CatalogSource>,
    ticket: Ticket,
    key: QueryKey,
    sender: Sender<TaskResult>,
    notify: N,
) -> thread::JoinHandle<()>
where
    N: Fn() + Send + 'static,
{
    thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| source.fetch(&key)))
            .unwrap_or_else(|_| Err(FetchError::Network("fetch thread panicked".to_string())));

        // The receiver is gone when the app is closing
        if sender.send(TaskResult::Fetched { ticket, key, result }).is_ok() {
            notify();
        }
    })
}

/// Download and decode one image off the UI thread
pub fn spawn_artwork<N>(
    source: Arc<dyn ImageSource>,
    url: String,
    sender: Sender<TaskResult>,
    notify: N,
) -> thread::JoinHandle<()>
where
    N: Fn() + Send + 'static,
{
    thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let bytes = source.fetch_bytes(&url)?;
            artwork::decode_image(&bytes, artwork::MAX_TEXTURE_EDGE)
        }))
        .unwrap_or_else(|_| Err(FetchError::Network("image thread panicked".to_string())));

        if sender.send(TaskResult::Artwork { url, result }).is_ok() {
            notify();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_set, Category};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc::{channel, Receiver};

    const TICKET: Ticket = Ticket { mount: 9, epoch: 2 };

    struct FakeSource;

    impl CatalogSource for FakeSource {
        fn fetch(&self, key: &QueryKey) -> Result<ResultSet, FetchError> {
            match key.category {
                Category::MoviePopular => Ok(sample_set(7)),
                Category::TvPopular => Err(FetchError::Status(500)),
                _ => panic!("unexpected query"),
            }
        }
    }

    struct FakeImages;

    impl ImageSource for FakeImages {
        fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            match url {
                "png" => {
                    let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 255]));
                    let mut out = std::io::Cursor::new(Vec::new());
                    image::DynamicImage::ImageRgba8(img)
                        .write_to(&mut out, image::ImageFormat::Png)
                        .unwrap();
                    Ok(out.into_inner())
                }
                "text" => Ok(b"not an image".to_vec()),
                _ => Err(FetchError::Status(404)),
            }
        }
    }

    fn fetched(receiver: &Receiver<TaskResult>) -> (Ticket, QueryKey, Result<ResultSet, FetchError>) {
        match receiver.recv().unwrap() {
            TaskResult::Fetched { ticket, key, result } => (ticket, key, result),
            TaskResult::Artwork { url, .. } => panic!("unexpected artwork for {}", url),
        }
    }

    fn artwork(receiver: &Receiver<TaskResult>) -> Result<DecodedImage, FetchError> {
        match receiver.recv().unwrap() {
            TaskResult::Artwork { result, .. } => result,
            TaskResult::Fetched { key, .. } => panic!("unexpected fetch for {}", key),
        }
    }

    #[test]
    fn test_result_is_tagged_with_ticket() {
        let (sender, receiver) = channel();
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);

        spawn_fetch(
            Arc::new(FakeSource),
            TICKET,
            QueryKey::list(Category::MoviePopular),
            sender,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .join()
        .unwrap();

        let (ticket, key, result) = fetched(&receiver);
        assert_eq!(ticket, TICKET);
        assert_eq!(key.category, Category::MoviePopular);
        assert_eq!(result.unwrap().len(), 7);
        assert_eq!(notified.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_errors_are_forwarded() {
        let (sender, receiver) = channel();
        spawn_fetch(Arc::new(FakeSource), TICKET, QueryKey::list(Category::TvPopular), sender, || {})
            .join()
            .unwrap();
        let (_, _, result) = fetched(&receiver);
        assert_eq!(result, Err(FetchError::Status(500)));
    }

    #[test]
    fn test_panicking_source_becomes_error() {
        let (sender, receiver) = channel();
        spawn_fetch(Arc::new(FakeSource), TICKET, QueryKey::list(Category::TvOnTheAir), sender, || {})
            .join()
            .unwrap();
        let (_, _, result) = fetched(&receiver);
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[test]
    fn test_closed_receiver_is_harmless() {
        let (sender, receiver) = channel();
        drop(receiver);
        let notified = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&notified);
        spawn_fetch(
            Arc::new(FakeSource),
            TICKET,
            QueryKey::list(Category::MoviePopular),
            sender,
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        )
        .join()
        .unwrap();
        assert_eq!(notified.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_artwork_is_decoded_off_thread() {
        let (sender, receiver) = channel();
        spawn_artwork(Arc::new(FakeImages), "png".to_string(), sender, || {})
            .join()
            .unwrap();
        let decoded = artwork(&receiver).unwrap();
        assert_eq!(decoded.size, [3, 2]);
    }

    #[test]
    fn test_artwork_failures() {
        let (sender, receiver) = channel();
        spawn_artwork(Arc::new(FakeImages), "missing".to_string(), sender.clone(), || {})
            .join()
            .unwrap();
        assert_eq!(artwork(&receiver), Err(FetchError::Status(404)));

        spawn_artwork(Arc::new(FakeImages), "text".to_string(), sender, || {})
            .join()
            .unwrap();
        assert!(matches!(artwork(&receiver), Err(FetchError::Malformed(_))));
    }
}
