//! Message grouping engine.
//!
//! Collapses a flat, time-ordered message sequence into contiguous
//! same-author groups so the presentation shows one timestamp per group
//! rather than one per message.

use crate::message::Message;

/// Maximum gap (in milliseconds) between consecutive same-author messages
/// that still merges them into one group. A gap of exactly this value
/// merges; one millisecond more starts a new group.
pub const GROUP_GAP_MILLIS: i64 = 5 * 60 * 1000;

/// A contiguous run of same-author messages under one displayed timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageGroup {
    pub author_id: String,
    /// Timestamp of the first message in the group. Later messages in the
    /// same group do not get their own displayed timestamp.
    pub display_timestamp: i64,
    pub messages: Vec<Message>,
}

/// Append one in-order message to an existing grouping.
///
/// This is the incremental step: when a message arrives at the tail with a
/// timestamp not earlier than the last, callers can extend the previous
/// grouping in place instead of regrouping from scratch.
pub fn push_message(groups: &mut Vec<MessageGroup>, message: Message) {
    if let Some(last) = groups.last_mut() {
        let prev_ts = last
            .messages
            .last()
            .map(|m| m.timestamp_millis)
            .unwrap_or(last.display_timestamp);
        if last.author_id == message.author_id
            && message.timestamp_millis - prev_ts <= GROUP_GAP_MILLIS
        {
            last.messages.push(message);
            return;
        }
    }
    groups.push(MessageGroup {
        author_id: message.author_id.clone(),
        display_timestamp: message.timestamp_millis,
        messages: vec![message],
    });
}

/// Group a time-ordered message sequence.
///
/// Pure and total: the same input always yields the same output, and
/// concatenating the groups' messages in order reproduces the input exactly.
pub fn group_messages(messages: &[Message]) -> Vec<MessageGroup> {
    let mut groups = Vec::new();
    for message in messages {
        push_message(&mut groups, message.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: &str, author: &str, ts: i64) -> Message {
        Message::new(id, author, vec![], ts)
    }

    #[test]
    fn test_empty_input() {
        assert!(group_messages(&[]).is_empty());
    }

    #[test]
    fn test_single_message() {
        let groups = group_messages(&[msg("1", "alice", 1000)]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].author_id, "alice");
        assert_eq!(groups[0].display_timestamp, 1000);
        assert_eq!(groups[0].messages.len(), 1);
    }

    #[test]
    fn test_same_author_within_window_merges() {
        let groups = group_messages(&[
            msg("1", "alice", 0),
            msg("2", "alice", 60_000),
            msg("3", "alice", 120_000),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].messages.len(), 3);
        // Only the first timestamp is displayed
        assert_eq!(groups[0].display_timestamp, 0);
    }

    #[test]
    fn test_gap_over_window_breaks() {
        let groups = group_messages(&[msg("1", "alice", 0), msg("2", "alice", 480_000)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].display_timestamp, 0);
        assert_eq!(groups[1].display_timestamp, 480_000);
    }

    #[test]
    fn test_different_authors_never_merge() {
        let groups = group_messages(&[msg("1", "alice", 0), msg("2", "bob", 60_000)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].author_id, "alice");
        assert_eq!(groups[1].author_id, "bob");
    }

    #[test]
    fn test_gap_boundary() {
        // Exactly the window merges
        let groups = group_messages(&[msg("1", "alice", 0), msg("2", "alice", GROUP_GAP_MILLIS)]);
        assert_eq!(groups.len(), 1);

        // One millisecond more breaks
        let groups =
            group_messages(&[msg("1", "alice", 0), msg("2", "alice", GROUP_GAP_MILLIS + 1)]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_gap_measured_from_previous_message() {
        // Each consecutive gap is under the window even though the last
        // message is far from the group's first.
        let groups = group_messages(&[
            msg("1", "alice", 0),
            msg("2", "alice", 240_000),
            msg("3", "alice", 480_000),
            msg("4", "alice", 720_000),
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].messages.len(), 4);
    }

    #[test]
    fn test_partition_invariant() {
        let input = vec![
            msg("1", "alice", 0),
            msg("2", "alice", 100_000),
            msg("3", "bob", 150_000),
            msg("4", "alice", 900_000),
            msg("5", "alice", 2_000_000),
        ];
        let groups = group_messages(&input);
        let flattened: Vec<Message> = groups.into_iter().flat_map(|g| g.messages).collect();
        assert_eq!(flattened, input);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let input = vec![
            msg("1", "alice", 0),
            msg("2", "bob", 10_000),
            msg("3", "bob", 20_000),
        ];
        assert_eq!(group_messages(&input), group_messages(&input));
    }

    #[test]
    fn test_incremental_push_matches_full_regroup() {
        let input = vec![
            msg("1", "alice", 0),
            msg("2", "alice", 100_000),
            msg("3", "bob", 200_000),
            msg("4", "bob", 600_000),
        ];
        let mut incremental = group_messages(&input[..2]);
        push_message(&mut incremental, input[2].clone());
        push_message(&mut incremental, input[3].clone());
        assert_eq!(incremental, group_messages(&input));
    }
}
