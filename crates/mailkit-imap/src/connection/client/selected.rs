//! Implementation for the selected state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::{Command, FetchItems, StoreAction};
use crate::mirror::MailboxMirror;
use crate::parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
use crate::types::{Mailbox, MailboxStatus, SequenceSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the current mailbox.
    ///
    /// Note: The actual mailbox name is not stored; this is a placeholder.
    #[must_use]
    pub const fn mailbox(&self) -> &'static str {
        // In a full implementation, we'd store the mailbox name
        "INBOX"
    }

    /// Closes the current mailbox and returns to authenticated state.
    pub async fn close(mut self) -> Result<Client<S, Authenticated>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Close.serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;

        Ok(Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            mirror: MailboxMirror::new(),
            handler: self.handler,
            _state: PhantomData,
        })
    }

    /// Selects a different mailbox.
    pub async fn select(mut self, mailbox: &str) -> Result<(Self, MailboxStatus)> {
        let tag = self.tag_gen.next();
        let cmd = Command::Select {
            mailbox: Mailbox::new(mailbox),
            condstore: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let status = Client::<S, Authenticated>::parse_mailbox_status(&responses);
        Self::check_tagged_ok(&responses, &tag)?;

        self.mirror.reset(status.exists);

        Ok((self, status))
    }

    /// Searches for messages matching the given criteria.
    pub async fn search(&mut self, criteria: &str) -> Result<Vec<crate::types::SeqNum>> {
        let tag = self.tag_gen.next();
        // Simple text search
        let cmd = format!("{tag} SEARCH {criteria}\r\n");
        self.stream.write_command(cmd.as_bytes()).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Search(ids))) =
                ResponseParser::parse(response_bytes)
            {
                results.extend(ids);
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;
        Ok(results)
    }

    /// Fetches message data for the given sequence set.
    ///
    /// Returns a vector of (sequence number, fetch items) pairs.
    pub async fn fetch(
        &mut self,
        sequence: &SequenceSet,
        items: FetchItems,
    ) -> Result<Vec<(crate::types::SeqNum, Vec<FetchItem>)>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Fetch {
            sequence: sequence.clone(),
            items,
            uid: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) =
                ResponseParser::parse(response_bytes)
            {
                results.push((seq, items));
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        for (seq, items) in &results {
            self.mirror.observe_fetch(*seq, items);
            self.handler.on_fetch(*seq, items);
        }

        Ok(results)
    }

    /// Fetches message data using UIDs.
    ///
    /// Returns a vector of (sequence number, fetch items) pairs.
    pub async fn uid_fetch(
        &mut self,
        uid_set: &crate::types::UidSet,
        items: FetchItems,
    ) -> Result<Vec<(crate::types::SeqNum, Vec<FetchItem>)>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Fetch {
            sequence: uid_set.as_sequence_set(),
            items,
            uid: true,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) =
                ResponseParser::parse(response_bytes)
            {
                results.push((seq, items));
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        for (seq, items) in &results {
            self.mirror.observe_fetch(*seq, items);
            self.handler.on_fetch(*seq, items);
        }

        Ok(results)
    }

    /// Modifies message flags.
    ///
    /// Returns the updated flags for each affected message.
    pub async fn store(
        &mut self,
        sequence: &SequenceSet,
        action: StoreAction,
    ) -> Result<Vec<(crate::types::SeqNum, Vec<FetchItem>)>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Store {
            sequence: sequence.clone(),
            action,
            uid: false,
            silent: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) =
                ResponseParser::parse(response_bytes)
            {
                results.push((seq, items));
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        // The server echoes a FETCH with the resulting flags for each
        // affected message; fold it back into the mirror only where we'd
        // already cached flags for that message.
        for (seq, items) in &results {
            self.mirror.reconcile_store(*seq, items);
            self.handler.on_fetch(*seq, items);
        }

        Ok(results)
    }

    /// Modifies message flags silently (no FETCH response).
    pub async fn store_silent(
        &mut self,
        sequence: &SequenceSet,
        action: StoreAction,
    ) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Store {
            sequence: sequence.clone(),
            action,
            uid: false,
            silent: true,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(())
    }

    /// Modifies message flags using UIDs.
    pub async fn uid_store(
        &mut self,
        uid_set: &crate::types::UidSet,
        action: StoreAction,
    ) -> Result<Vec<(crate::types::SeqNum, Vec<FetchItem>)>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Store {
            sequence: uid_set.as_sequence_set(),
            action,
            uid: true,
            silent: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut results = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) =
                ResponseParser::parse(response_bytes)
            {
                results.push((seq, items));
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        for (seq, items) in &results {
            self.mirror.reconcile_store(*seq, items);
            self.handler.on_fetch(*seq, items);
        }

        Ok(results)
    }

    /// Copies messages to another mailbox.
    pub async fn copy(&mut self, sequence: &SequenceSet, mailbox: &str) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Copy {
            sequence: sequence.clone(),
            mailbox: Mailbox::new(mailbox),
            uid: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(())
    }

    /// Copies messages to another mailbox using UIDs.
    pub async fn uid_copy(&mut self, uid_set: &crate::types::UidSet, mailbox: &str) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Copy {
            sequence: uid_set.as_sequence_set(),
            mailbox: Mailbox::new(mailbox),
            uid: true,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(())
    }

    /// Moves messages to another mailbox.
    ///
    /// Requires the MOVE capability (RFC 6851).
    pub async fn r#move(&mut self, sequence: &SequenceSet, mailbox: &str) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Move {
            sequence: sequence.clone(),
            mailbox: Mailbox::new(mailbox),
            uid: false,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(())
    }

    /// Moves messages to another mailbox using UIDs.
    ///
    /// Requires the MOVE capability (RFC 6851).
    pub async fn uid_move(&mut self, uid_set: &crate::types::UidSet, mailbox: &str) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Move {
            sequence: uid_set.as_sequence_set(),
            mailbox: Mailbox::new(mailbox),
            uid: true,
        }
        .serialize(&tag);

        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        Self::check_tagged_ok(&responses, &tag)?;
        Ok(())
    }

    /// Permanently removes messages marked as \Deleted.
    ///
    /// Returns the sequence numbers expunged, in the order the server sent
    /// them (i.e. each one valid against the numbering left by the ones
    /// before it, per RFC 9051 §7.5.1).
    pub async fn expunge(&mut self) -> Result<Vec<crate::types::SeqNum>> {
        let tag = self.tag_gen.next();
        let cmd = Command::Expunge.serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let responses = self.read_until_tagged(&tag).await?;
        let mut expunged = Vec::new();

        for response_bytes in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Expunge(seq))) =
                ResponseParser::parse(response_bytes)
            {
                expunged.push(seq);
            }
        }

        Self::check_tagged_ok(&responses, &tag)?;

        // Apply renumbering and fire callbacks only once the command is
        // known to have succeeded, and in the order the server sent the
        // EXPUNGE responses.
        let count_before = self.mirror.count();
        for seq in &expunged {
            self.mirror.expunge(*seq);
            self.handler.on_expunge(*seq);
        }
        if self.mirror.count() != count_before {
            self.handler.on_exists(self.mirror.count());
        }

        Ok(expunged)
    }

    /// Gracefully disconnects from the server.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tag_gen.next();
        let cmd = Command::Logout.serialize(&tag);
        self.stream.write_command(&cmd).await?;

        let _ = self.read_until_tagged(&tag).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio_test::io::Builder;

    use super::*;
    use crate::command::TagGenerator;
    use crate::connection::framed::FramedStream;
    use crate::handler::ResponseHandler;
    use crate::types::{Flag, Flags, SeqNum};

    #[derive(Clone, Default)]
    struct RecordingHandler(Arc<Mutex<Vec<String>>>);

    impl ResponseHandler for RecordingHandler {
        fn on_expunge(&mut self, seq: SeqNum) {
            self.0.lock().unwrap().push(format!("expunge({})", seq.get()));
        }

        fn on_exists(&mut self, count: u32) {
            self.0.lock().unwrap().push(format!("exists({count})"));
        }

        fn on_fetch(&mut self, seq: SeqNum, items: &[FetchItem]) {
            self.0
                .lock()
                .unwrap()
                .push(format!("fetch({}, {} items)", seq.get(), items.len()));
        }
    }

    fn test_client(mock: tokio_test::io::Mock, exists: u32) -> (Client<tokio_test::io::Mock, Selected>, RecordingHandler) {
        let handler = RecordingHandler::default();
        let mut mirror = MailboxMirror::new();
        mirror.reset(exists);
        let client = Client {
            stream: FramedStream::new(mock),
            tag_gen: TagGenerator::default(),
            capabilities: Vec::new(),
            mirror,
            handler: Box::new(handler.clone()),
            _state: PhantomData,
        };
        (client, handler)
    }

    #[tokio::test]
    async fn expunge_renumbers_mirror_and_fires_events_after_completion() {
        let mock = Builder::new()
            .write(b"A0000 EXPUNGE\r\n")
            .read(b"* 2 EXPUNGE\r\n")
            .read(b"* 3 EXISTS\r\n")
            .read(b"A0000 OK EXPUNGE completed\r\n")
            .build();
        let (mut client, handler) = test_client(mock, 4);
        client
            .mirror
            .observe_fetch(SeqNum::new(1).unwrap(), &[FetchItem::Flags(Flags::new())]);
        client
            .mirror
            .observe_fetch(SeqNum::new(3).unwrap(), &[FetchItem::Flags(Flags::new())]);

        let expunged = client.expunge().await.unwrap();

        assert_eq!(expunged, vec![SeqNum::new(2).unwrap()]);
        assert_eq!(client.mirror().count(), 3);
        let remaining: Vec<u32> = client
            .mirror()
            .messages()
            .iter()
            .map(|m| m.seq.get())
            .collect();
        assert_eq!(remaining, vec![1, 2], "message at old seq 3 is now seq 2");

        let events = handler.0.lock().unwrap().clone();
        assert_eq!(events, vec!["expunge(2)".to_string(), "exists(3)".to_string()]);
    }

    #[tokio::test]
    async fn store_reconciles_only_previously_fetched_flags() {
        let mock = Builder::new()
            .write(b"A0000 STORE 1:2 +FLAGS (\\Deleted)\r\n")
            .read(b"* 1 FETCH (FLAGS (\\Deleted))\r\n")
            .read(b"* 2 FETCH (FLAGS (\\Deleted \\Seen))\r\n")
            .read(b"A0000 OK STORE completed\r\n")
            .build();
        let (mut client, _handler) = test_client(mock, 2);
        client.mirror.observe_fetch(
            SeqNum::new(1).unwrap(),
            &[FetchItem::Flags(Flags::from_vec(vec![Flag::Seen]))],
        );

        let sequence = SequenceSet::range(1, 2).unwrap();
        client
            .store(&sequence, StoreAction::AddFlags(vec![Flag::Deleted]))
            .await
            .unwrap();

        assert_eq!(
            client.mirror().flags_for(SeqNum::new(1).unwrap()),
            Some(&Flags::from_vec(vec![Flag::Deleted])),
            "seq 1 had cached flags, so STORE's echo reconciles"
        );
        assert_eq!(
            client.mirror().flags_for(SeqNum::new(2).unwrap()),
            None,
            "seq 2 was never fetched, so STORE alone must not seed it"
        );
    }
}
