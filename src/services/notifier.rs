use tokio::sync::broadcast;

pub const ATTENDANCE_TOPIC: &str = "attendance";

/// Fire-and-forget change notification, sent after a successful write.
pub trait Notifier: Send + Sync {
    fn notify(&self, topic: &str);
}

/// Publishes topics on a tokio broadcast channel; UI push adapters subscribe.
#[derive(Clone)]
pub struct BroadcastNotifier {
    sender: broadcast::Sender<String>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self::new(64)
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, topic: &str) {
        // An error only means nobody is listening right now
        if self.sender.send(topic.to_string()).is_err() {
            log::debug!("No subscribers for topic {}", topic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_topics() {
        let notifier = BroadcastNotifier::default();
        let mut receiver = notifier.subscribe();

        notifier.notify(ATTENDANCE_TOPIC);

        assert_eq!(receiver.recv().await.unwrap(), "attendance");
    }

    #[test]
    fn notifying_without_subscribers_is_harmless() {
        BroadcastNotifier::new(1).notify(ATTENDANCE_TOPIC);
    }
}
