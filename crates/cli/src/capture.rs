//! Typed lines as a speech-capture engine
//!
//! The REPL plays the recognizer: each line the user enters is delivered to
//! the session as a final transcript through the sink of the open stream.

use std::sync::{Arc, Mutex, MutexGuard};

use voice_assistant::{
    CaptureError, CaptureEvent, CaptureHandle, CaptureOptions, CaptureSink, SpeechCapture,
};

/// The open stream and the settings it was opened with
#[derive(Clone)]
struct Stream {
    sink: CaptureSink,
    options: CaptureOptions,
}

#[derive(Default)]
pub struct ReplCapture {
    slot: Arc<Mutex<Option<Stream>>>,
}

fn lock(slot: &Mutex<Option<Stream>>) -> MutexGuard<'_, Option<Stream>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ReplCapture {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_open(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Deliver an event to the open stream; false when nothing is listening.
    pub fn emit(&self, event: CaptureEvent) -> bool {
        // Clone out so the session can retire the stream while handling it.
        let stream = lock(&self.slot).clone();
        match stream {
            Some(stream) => {
                stream.sink.emit(event);
                true
            }
            None => false,
        }
    }

    /// Recognition language of the open stream
    pub fn language(&self) -> Option<String> {
        lock(&self.slot)
            .as_ref()
            .map(|stream| stream.options.language.clone())
    }

    /// Whether the open stream asked for interim results
    pub fn interim_enabled(&self) -> bool {
        lock(&self.slot)
            .as_ref()
            .is_some_and(|stream| stream.options.interim_results)
    }

    pub fn say(&self, text: &str) -> bool {
        self.emit(CaptureEvent::Final(text.to_string()))
    }

    /// Deliver an interim transcript; dropped when the stream did not ask
    /// for them.
    pub fn partial(&self, text: &str) -> bool {
        self.interim_enabled() && self.emit(CaptureEvent::Interim(text.to_string()))
    }
}

impl SpeechCapture for ReplCapture {
    fn start(
        &self,
        options: &CaptureOptions,
        sink: CaptureSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError> {
        let generation = sink.generation();
        *lock(&self.slot) = Some(Stream {
            sink: sink.clone(),
            options: options.clone(),
        });
        sink.emit(CaptureEvent::Started);

        Ok(Box::new(ReplHandle {
            slot: self.slot.clone(),
            generation,
        }))
    }
}

struct ReplHandle {
    slot: Arc<Mutex<Option<Stream>>>,
    generation: u64,
}

impl CaptureHandle for ReplHandle {
    fn stop(&mut self) {
        let mut slot = lock(&self.slot);
        if slot.as_ref().map(|stream| stream.sink.generation()) == Some(self.generation) {
            *slot = None;
        }
    }
}

impl Drop for ReplHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use storefront_client::StorefrontClient;
    use voice_assistant::{ActionDispatcher, AssistantConfig, CaptureSession, Navigator, SpeechOutput};

    use super::*;

    #[derive(Default)]
    struct Screen {
        routes: Mutex<Vec<String>>,
        spoken: Mutex<Vec<String>>,
    }

    impl Navigator for Screen {
        fn navigate(&self, route: &str) {
            self.routes.lock().unwrap().push(route.to_string());
        }

        fn reload(&self) {}
    }

    impl SpeechOutput for Screen {
        fn say(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }

    fn session(capture: &Arc<ReplCapture>, screen: &Arc<Screen>) -> CaptureSession {
        session_with(capture, screen, AssistantConfig::immediate())
    }

    fn session_with(
        capture: &Arc<ReplCapture>,
        screen: &Arc<Screen>,
        config: AssistantConfig,
    ) -> CaptureSession {
        // Navigation never reaches the storefront, so no server is needed.
        let client = Arc::new(StorefrontClient::new("http://127.0.0.1:9"));
        let dispatcher = ActionDispatcher::builder(
            client.clone(),
            client.clone(),
            client,
            screen.clone(),
            screen.clone(),
        )
        .build();
        CaptureSession::new(config, capture.clone(), Arc::new(dispatcher)).unwrap()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn test_typed_line_navigates() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let session = session(&capture, &screen);

        assert!(!capture.say("open cart"));
        session.start();
        assert!(capture.is_open());
        assert!(capture.say("Open Cart"));
        settle().await;

        assert_eq!(*screen.routes.lock().unwrap(), vec!["/cart".to_string()]);
        assert_eq!(*screen.spoken.lock().unwrap(), vec!["Opening cart".to_string()]);
    }

    #[tokio::test]
    async fn test_stop_closes_stream() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let session = session(&capture, &screen);

        session.start();
        session.stop();
        assert!(!capture.is_open());
        assert!(!capture.say("open wishlist"));
        settle().await;
        assert!(screen.routes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_engine_end_releases_stream() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let session = session(&capture, &screen);

        session.start();
        assert!(capture.emit(CaptureEvent::Ended));
        assert!(!session.is_listening());
        assert!(!capture.is_open());
    }

    #[tokio::test]
    async fn test_restart_keeps_one_stream() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let session = session(&capture, &screen);

        session.start();
        session.start();
        assert!(capture.is_open());
        assert!(capture.say("go to profile"));
        settle().await;
        assert_eq!(*screen.routes.lock().unwrap(), vec!["/profile".to_string()]);
    }

    #[tokio::test]
    async fn test_stream_follows_capture_options() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let config = AssistantConfig {
            language: "en-GB".to_string(),
            interim_results: false,
            ..AssistantConfig::immediate()
        };
        let session = session_with(&capture, &screen, config);

        assert_eq!(capture.language(), None);
        session.start();
        assert_eq!(capture.language().as_deref(), Some("en-GB"));
        assert!(!capture.interim_enabled());
        assert!(!capture.partial("open ca"));
    }

    #[tokio::test]
    async fn test_partial_delivered_when_enabled() {
        let capture = ReplCapture::new();
        let screen = Arc::new(Screen::default());
        let session = session(&capture, &screen);

        session.start();
        assert!(capture.interim_enabled());
        assert!(capture.partial("open ca"));
        settle().await;
        assert!(screen.routes.lock().unwrap().is_empty());
    }
}
