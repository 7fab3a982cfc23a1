//! Chat timeline engine for a collaborative editor's chat panel.
//!
//! Groups a flat, time-ordered message sequence into visually coherent
//! blocks, decides when a timestamp is shown, assigns stable per-author
//! colors, and tracks unread state across user interaction. Grouping,
//! formatting, and color assignment are pure and cheap enough to re-run on
//! every update; math typesetting is the only asynchronous boundary and is
//! modeled as cancellable background tasks delivering into per-chunk slots.

pub mod color;
pub mod grouping;
pub mod message;
pub mod renderer;
pub mod timestamp;
pub mod typeset;
pub mod unread;


pub use color::{AuthorColor, ColorAssigner, PALETTE};
pub use grouping::{group_messages, push_message, MessageGroup, GROUP_GAP_MILLIS};
pub use message::{ContentChunk, Message, RawMessage, FALLBACK_AUTHOR, FALLBACK_TIMESTAMP};
pub use renderer::{ChunkView, GroupView, InlineSpan, MessageView, TimelineSession, TimelineView};
pub use timestamp::{format_timestamp, FormatConfig, INVALID_DATE};
pub use typeset::{
    AsyncTypesetter, MathTypesetter, SlotId, TypesetOutcome, TypesetRequest, TypesetTask,
};
pub use unread::UnreadTracker;
