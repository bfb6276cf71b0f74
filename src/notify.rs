use std::sync::Mutex;

/// Sink for user-visible warnings (pre-flight rejections).
///
/// Fire-and-forget: the core never inspects a result. Mid-session failures
/// do not go through this trait; they are logged to stderr instead.
pub trait Notifier {
    fn warn(&self, message: &str);
}

/// Prints warnings to stderr with a colored prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn warn(&self, message: &str) {
        const RESET: &str = "\x1b[0m";
        const WARN: &str = "\x1b[33m";
        eprintln!("{WARN}Warning{RESET}: {message}");
    }
}

/// Collects warnings in memory so callers (and tests) can assert on them.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn warn(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock poisoned")
            .push(message.to_string());
    }
}
