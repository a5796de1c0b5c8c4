use std::sync::Arc;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

type Subscriber<S> = Box<dyn FnMut(&Arc<S>)>;

/// A single-writer state container.
///
/// State is held behind an `Arc` and replaced wholesale on every write, so a reader
/// that kept an older `Arc` still sees the value it was given. Subscribers are called
/// synchronously after each write, in subscription order.
pub struct Store<S> {
    state: Arc<S>,
    subscribers: Vec<(SubscriberId, Subscriber<S>)>,
    next_id: usize,
}

impl<S> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(initial),
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self) -> Arc<S> {
        Arc::clone(&self.state)
    }

    pub fn set(&mut self, state: S) {
        self.state = Arc::new(state);
        self.notify();
    }

    /// Applies a pure transition to the current state. Nothing changes if `f` fails.
    pub fn update<E>(&mut self, f: impl FnOnce(&S) -> Result<S, E>) -> Result<Arc<S>, E> {
        let next = f(&self.state)?;
        self.set(next);
        Ok(self.get())
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&Arc<S>) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        let state = Arc::clone(&self.state);
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&state);
        }
    }
}
