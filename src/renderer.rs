//! Timeline orchestration.
//!
//! `TimelineSession` is the session-scoped context for one chat panel: it
//! owns the color cache and the unread tracker, holds the locale
//! configuration, and tracks typesetting tasks in flight. It is created when
//! the panel mounts and dropped when it unmounts, which cancels whatever
//! typesetting is still pending.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::color::{AuthorColor, ColorAssigner};
use crate::grouping::group_messages;
use crate::message::{ContentChunk, Message};
use crate::timestamp::{format_timestamp, FormatConfig};
use crate::typeset::{MathTypesetter, SlotId, TypesetOutcome, TypesetRequest, TypesetTask};
use crate::unread::UnreadTracker;

/// Inline fragment of a rendered text chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineSpan {
    /// HTML-escaped text, safe to inject into presentation markup.
    Plain(String),
    /// A detected URL, rendered as a hyperlink by the presentation.
    Link(String),
}

/// A rendered content chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkView {
    Text(Vec<InlineSpan>),
    Math {
        slot: SlotId,
        /// Typeset markup, filled in once the background task completes.
        rendered: Option<String>,
        /// Escaped source text, shown while the slot is pending and kept if
        /// typesetting fails.
        fallback: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageView {
    pub id: String,
    pub chunks: Vec<ChunkView>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupView {
    pub author_id: String,
    pub color: AuthorColor,
    pub timestamp_label: String,
    /// Whether the group was authored by the current viewer, for
    /// presentation parity (own messages are styled differently).
    pub from_viewer: bool,
    pub messages: Vec<MessageView>,
}

/// Renderable structure for one pass over the message sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimelineView {
    pub viewer_id: String,
    pub groups: Vec<GroupView>,
}

/// Session-scoped context for one chat panel.
pub struct TimelineSession {
    viewer_id: String,
    config: FormatConfig,
    colors: ColorAssigner,
    unread: UnreadTracker,
    reset_callback: Box<dyn FnMut()>,
    outcome_tx: crossbeam_channel::Sender<TypesetOutcome>,
    outcome_rx: crossbeam_channel::Receiver<TypesetOutcome>,
    next_slot: u64,
    pending: Vec<TypesetTask>,
}

impl TimelineSession {
    pub fn new(
        viewer_id: impl Into<String>,
        config: FormatConfig,
        reset_callback: impl FnMut() + 'static,
    ) -> Self {
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();
        Self {
            viewer_id: viewer_id.into(),
            config,
            colors: ColorAssigner::new(),
            unread: UnreadTracker::new(),
            reset_callback: Box::new(reset_callback),
            outcome_tx,
            outcome_rx,
            next_slot: 0,
            pending: Vec::new(),
        }
    }

    /// Channel on which typesetting outcomes for this session are delivered.
    /// Hand a clone to the typesetting collaborator.
    pub fn outcome_sender(&self) -> crossbeam_channel::Sender<TypesetOutcome> {
        self.outcome_tx.clone()
    }

    /// Render one pass over the message sequence.
    ///
    /// Messages must already be sorted ascending by timestamp. Math chunks
    /// are scheduled with the typesetting collaborator and come back via
    /// [`apply_typeset_results`](Self::apply_typeset_results); until then the
    /// chunk shows its escaped source text.
    pub fn render(&mut self, messages: &[Message], typesetter: &dyn MathTypesetter) -> TimelineView {
        // Tasks from the previous pass target slots that no longer exist.
        self.cancel_pending();

        let groups = group_messages(messages);
        let mut group_views = Vec::with_capacity(groups.len());
        for group in groups {
            let color = self.colors.color_for(&group.author_id);
            let timestamp_label = format_timestamp(group.display_timestamp, &self.config);
            let from_viewer = group.author_id == self.viewer_id;
            let messages = group
                .messages
                .into_iter()
                .map(|message| self.render_message(message, typesetter))
                .collect();
            group_views.push(GroupView {
                author_id: group.author_id,
                color,
                timestamp_label,
                from_viewer,
                messages,
            });
        }
        TimelineView {
            viewer_id: self.viewer_id.clone(),
            groups: group_views,
        }
    }

    fn render_message(
        &mut self,
        message: Message,
        typesetter: &dyn MathTypesetter,
    ) -> MessageView {
        let chunks = message
            .contents
            .into_iter()
            .map(|chunk| match chunk {
                ContentChunk::Text(text) => ChunkView::Text(render_text(&text)),
                ContentChunk::Math { math } => {
                    let slot = self.allocate_slot();
                    let task = typesetter.render(TypesetRequest {
                        slot,
                        source: math.clone(),
                    });
                    self.pending.push(task);
                    ChunkView::Math {
                        slot,
                        rendered: None,
                        fallback: escape_html(&math),
                    }
                }
            })
            .collect();
        MessageView {
            id: message.id,
            chunks,
        }
    }

    /// Drain completed typesetting outcomes into the view.
    ///
    /// Outcomes land only in the slot that requested them; outcomes for
    /// slots the view does not contain (cancelled or superseded passes) are
    /// discarded. A failed chunk keeps its escaped-source fallback and does
    /// not affect sibling chunks.
    pub fn apply_typeset_results(&mut self, view: &mut TimelineView) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match outcome.result {
                Ok(markup) => {
                    if let Some(ChunkView::Math { rendered, .. }) = find_slot(view, outcome.slot) {
                        *rendered = Some(markup);
                    }
                }
                Err(err) => {
                    log::warn!("typesetting failed for {:?}: {}", outcome.slot, err);
                }
            }
        }
    }

    /// A message arrived while the panel was inactive.
    pub fn notify_unseen(&mut self) {
        self.unread.notify_unseen();
    }

    pub fn unread_count(&self) -> usize {
        self.unread.count()
    }

    /// Qualifying interaction on the timeline's interactive region: clears
    /// the unread count and fires the reset callback exactly once, even when
    /// the count was already zero.
    pub fn interaction(&mut self) {
        self.unread.reset();
        (self.reset_callback)();
    }

    fn allocate_slot(&mut self) -> SlotId {
        let slot = SlotId(self.next_slot);
        self.next_slot += 1;
        slot
    }

    fn cancel_pending(&mut self) {
        for task in self.pending.drain(..) {
            task.cancel();
        }
    }
}

impl Drop for TimelineSession {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

fn find_slot(view: &mut TimelineView, slot: SlotId) -> Option<&mut ChunkView> {
    view.groups
        .iter_mut()
        .flat_map(|group| group.messages.iter_mut())
        .flat_map(|message| message.chunks.iter_mut())
        .find(|chunk| matches!(chunk, ChunkView::Math { slot: s, .. } if *s == slot))
}

/// Split a plain-text chunk into inline spans, escaping text and detecting
/// URLs word by word.
pub(crate) fn render_text(text: &str) -> Vec<InlineSpan> {
    static URL_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^https?://\S+$").expect("URL regex pattern is valid"));

    let mut spans = Vec::new();
    let mut plain = String::new();
    for word in text.split_inclusive(char::is_whitespace) {
        let trimmed = word.trim_end();
        if !trimmed.is_empty() && URL_RE.is_match(trimmed) {
            if !plain.is_empty() {
                spans.push(InlineSpan::Plain(escape_html(&plain)));
                plain.clear();
            }
            spans.push(InlineSpan::Link(trimmed.to_string()));
            plain.push_str(&word[trimmed.len()..]);
        } else {
            plain.push_str(word);
        }
    }
    if !plain.is_empty() {
        spans.push(InlineSpan::Plain(escape_html(&plain)));
    }
    spans
}

/// Escape text for injection into presentation markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
