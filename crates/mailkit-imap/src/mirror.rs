//! Local cache of a selected mailbox's per-message state.
//!
//! IMAP servers renumber messages in place: a `* N EXPUNGE` response means
//! "the message that was at sequence number N is gone, and every message
//! after it just shifted down by one". A client that wants to keep using
//! sequence numbers it cached earlier (e.g. from a prior FETCH) has to
//! replay that renumbering itself. [`MailboxMirror`] does the bookkeeping.

use crate::parser::FetchItem;
use crate::types::{Flags, SeqNum, Uid};

/// A single cached message's known state.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedMessage {
    /// Current sequence number, kept in sync with EXPUNGE renumbering.
    pub seq: SeqNum,
    /// UID, once learned via a FETCH that requested it.
    pub uid: Option<Uid>,
    /// Flags, once learned via FETCH or reconciled from STORE.
    pub flags: Option<Flags>,
}

/// Tracks the message count and per-message flags/UID of a selected mailbox.
///
/// Reset whenever a mailbox is (re-)selected; updated as EXPUNGE, FETCH, and
/// STORE responses are observed.
#[derive(Debug, Default, Clone)]
pub struct MailboxMirror {
    count: u32,
    messages: Vec<CachedMessage>,
}

impl MailboxMirror {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all cached state and sets the message count, as on SELECT/EXAMINE.
    pub fn reset(&mut self, count: u32) {
        self.count = count;
        self.messages.clear();
    }

    /// The last known message count (EXISTS).
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The currently cached messages, in ascending sequence-number order.
    #[must_use]
    pub fn messages(&self) -> &[CachedMessage] {
        &self.messages
    }

    /// Applies an unsolicited EXISTS, replacing the known count.
    pub fn set_exists(&mut self, count: u32) {
        self.count = count;
    }

    /// Applies a `* N EXPUNGE`: drops the cached message at sequence `n` (if
    /// any was cached) and decrements the sequence number of every cached
    /// message numbered greater than `n`, per RFC 9051 §7.5.1.
    pub fn expunge(&mut self, n: SeqNum) {
        self.messages.retain(|m| m.seq != n);
        for m in &mut self.messages {
            if m.seq > n {
                m.seq = SeqNum::new(m.seq.get() - 1).unwrap_or(m.seq);
            }
        }
        self.count = self.count.saturating_sub(1);
    }

    /// Merges FETCH items into the mirror, creating a cache entry for `seq`
    /// if one doesn't already exist.
    pub fn observe_fetch(&mut self, seq: SeqNum, items: &[FetchItem]) {
        let entry = self.entry(seq);
        for item in items {
            match item {
                FetchItem::Flags(flags) => entry.flags = Some(flags.clone()),
                FetchItem::Uid(uid) => entry.uid = Some(*uid),
                _ => {}
            }
        }
    }

    /// Reconciles a STORE result into the mirror.
    ///
    /// Only updates a message's cached flags if flags were previously
    /// fetched for it; STORE alone never seeds a new cache entry.
    pub fn reconcile_store(&mut self, seq: SeqNum, items: &[FetchItem]) {
        let Some(existing) = self.messages.iter_mut().find(|m| m.seq == seq) else {
            return;
        };
        if existing.flags.is_none() {
            return;
        }
        for item in items {
            if let FetchItem::Flags(flags) = item {
                existing.flags = Some(flags.clone());
            }
        }
    }

    /// Looks up the cached flags for a sequence number, if known.
    #[must_use]
    pub fn flags_for(&self, seq: SeqNum) -> Option<&Flags> {
        self.messages
            .iter()
            .find(|m| m.seq == seq)
            .and_then(|m| m.flags.as_ref())
    }

    fn entry(&mut self, seq: SeqNum) -> &mut CachedMessage {
        if let Some(idx) = self.messages.iter().position(|m| m.seq == seq) {
            return &mut self.messages[idx];
        }
        self.messages.push(CachedMessage {
            seq,
            uid: None,
            flags: None,
        });
        self.messages.last_mut().expect("just pushed")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Flag;

    fn seq(n: u32) -> SeqNum {
        SeqNum::new(n).unwrap()
    }

    #[test]
    fn expunge_renumbers_later_messages_down() {
        let mut mirror = MailboxMirror::new();
        mirror.reset(3);
        mirror.observe_fetch(seq(1), &[FetchItem::Flags(Flags::from_vec(vec![Flag::Seen]))]);
        mirror.observe_fetch(seq(2), &[FetchItem::Flags(Flags::from_vec(vec![Flag::Flagged]))]);
        mirror.observe_fetch(seq(3), &[FetchItem::Flags(Flags::from_vec(vec![Flag::Draft]))]);

        mirror.expunge(seq(2));

        assert_eq!(mirror.count(), 2);
        let remaining: Vec<u32> = mirror.messages().iter().map(|m| m.seq.get()).collect();
        assert_eq!(remaining, vec![1, 3]);
        assert_eq!(
            mirror.flags_for(seq(2)),
            Some(&Flags::from_vec(vec![Flag::Draft])),
            "message previously at seq 3 is now seq 2"
        );
    }

    #[test]
    fn expunge_of_unknown_message_still_decrements_later_ones() {
        let mut mirror = MailboxMirror::new();
        mirror.reset(5);
        mirror.observe_fetch(seq(4), &[FetchItem::Uid(Uid::new(104).unwrap())]);

        mirror.expunge(seq(1));

        assert_eq!(mirror.count(), 4);
        assert_eq!(mirror.messages()[0].seq, seq(3));
    }

    #[test]
    fn store_reconciliation_ignores_messages_never_fetched() {
        let mut mirror = MailboxMirror::new();
        mirror.reset(1);

        mirror.reconcile_store(seq(1), &[FetchItem::Flags(Flags::from_vec(vec![Flag::Seen]))]);

        assert_eq!(mirror.flags_for(seq(1)), None);
    }

    #[test]
    fn store_reconciliation_updates_previously_fetched_flags() {
        let mut mirror = MailboxMirror::new();
        mirror.reset(1);
        mirror.observe_fetch(seq(1), &[FetchItem::Flags(Flags::from_vec(vec![]))]);

        mirror.reconcile_store(seq(1), &[FetchItem::Flags(Flags::from_vec(vec![Flag::Deleted]))]);

        assert_eq!(
            mirror.flags_for(seq(1)),
            Some(&Flags::from_vec(vec![Flag::Deleted]))
        );
    }
}
