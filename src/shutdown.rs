use tokio::sync::broadcast;

/// Per-run stop signal. Each job gets a fresh channel so stragglers from an
/// earlier run can never be reawakened by a later stop.
pub type StopSender = broadcast::Sender<()>;
pub type StopReceiver = broadcast::Receiver<()>;
