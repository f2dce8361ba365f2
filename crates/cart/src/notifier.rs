//! User-facing failure messages.
//!
//! The cart manager hands every failure to a [`Notifier`] instead of
//! returning it. Notifiers are fire-and-forget and must not fail.

use std::sync::{Arc, Mutex, PoisonError};

/// Surfaces error text to the shopper.
pub trait Notifier: Send + Sync {
    /// Show an error message.
    fn show_error(&self, message: &str);
}

impl<T: Notifier + ?Sized> Notifier for Arc<T> {
    fn show_error(&self, message: &str) {
        self.as_ref().show_error(message);
    }
}

/// Notifier that emits each message as a `tracing` warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_error(&self, message: &str) {
        tracing::warn!(user_message = message, "Cart error shown to user");
    }
}

/// Notifier that keeps messages until a caller drains them.
///
/// Used by the CLI to print messages after an operation, and by tests.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    messages: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Remove and return all messages shown so far.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for CollectingNotifier {
    fn show_error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Shared buffer the JSON formatter writes into.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_tracing_notifier_json_fields_are_distinct() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_writer(buffer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingNotifier.show_error("Erro na remoção do produto");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("\"message\"").count(), 1);

        let event: serde_json::Value = serde_json::from_str(output.trim()).unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["message"], "Cart error shown to user");
        assert_eq!(event["fields"]["user_message"], "Erro na remoção do produto");
    }

    #[test]
    fn test_collecting_notifier_take_drains() {
        let notifier = CollectingNotifier::new();
        notifier.show_error("Erro na remoção do produto");
        notifier.show_error("Quantidade solicitada fora de estoque");

        assert_eq!(notifier.messages().len(), 2);
        assert_eq!(
            notifier.take(),
            vec![
                "Erro na remoção do produto".to_string(),
                "Quantidade solicitada fora de estoque".to_string(),
            ]
        );
        assert!(notifier.messages().is_empty());
    }
}
