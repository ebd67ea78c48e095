use crate::state::ServiceHealth;

/// Events pushed from background tasks to the UI loop.
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// One resolved health poll. `generation` is the poll's start order;
    /// the UI drops results older than the newest one already applied.
    Health {
        generation: u64,
        health: ServiceHealth,
    },
}

pub type EventSender = std::sync::mpsc::Sender<AppEvent>;
pub type EventReceiver = std::sync::mpsc::Receiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    std::sync::mpsc::channel()
}
