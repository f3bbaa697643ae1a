//! Deferred work with last-write-wins cancellation.
//!
//! Every submission gets a [`Ticket`] from a monotonically increasing
//! sequence. Submitting supersedes anything still pending, and a result
//! computed for an older ticket is stale once a newer ticket exists.

use std::collections::VecDeque;

/// Generation number of a submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

#[derive(Debug)]
struct Item<T> {
    ticket: Ticket,
    payload: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct DeferredQueue<T> {
    next: u64,
    latest: Option<Ticket>,
    items: VecDeque<Item<T>>,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            next: 0,
            latest: None,
            items: VecDeque::new(),
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `payload`, canceling every older pending item.
    pub fn submit(&mut self, payload: T) -> Ticket {
        for item in self.items.iter_mut() {
            item.canceled = true;
        }

        let ticket = Ticket(self.next);
        self.next = self.next.wrapping_add(1);
        self.latest = Some(ticket);
        self.items.push_back(Item {
            ticket,
            payload,
            canceled: false,
        });
        ticket
    }

    /// Cancel a pending item. Returns whether it was still pending.
    pub fn cancel(&mut self, ticket: Ticket) -> bool {
        match self
            .items
            .iter_mut()
            .find(|i| i.ticket == ticket && !i.canceled)
        {
            Some(item) => {
                item.canceled = true;
                true
            }
            None => false,
        }
    }

    /// Cancel everything and invalidate outstanding tickets.
    pub fn reset(&mut self) {
        self.items.clear();
        self.latest = Some(Ticket(self.next));
        self.next = self.next.wrapping_add(1);
    }

    /// Take the oldest live item, discarding canceled ones on the way.
    pub fn pop_next(&mut self) -> Option<(Ticket, T)> {
        while let Some(item) = self.items.pop_front() {
            if !item.canceled {
                return Some((item.ticket, item.payload));
            }
        }
        None
    }

    /// Whether a result for `ticket` may still be applied.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest == Some(ticket)
    }

    pub fn latest(&self) -> Option<Ticket> {
        self.latest
    }

    /// Number of live pending items (0 or 1).
    pub fn len(&self) -> usize {
        self.items.iter().filter(|i| !i.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
