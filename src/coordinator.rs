use crate::types::ContentKind;

/// What an in-flight request was issued for. Travels with the request and is
/// checked against [`ModeState`] when the response lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTag {
    pub seq: u64,
    pub kind: ContentKind,
    pub keyword: String,
    pub page: u32,
}

/// Single source of truth for the active content kind.
///
/// The kind flips when a fetch is *started*, not when it completes; responses
/// are matched by tag so a slow request for the other kind, or an older
/// request for the same kind, cannot reach the accumulator.
#[derive(Debug)]
pub struct ModeState {
    kind: ContentKind,
    next_seq: u64,
    latest_tv: Option<u64>,
    latest_movie: Option<u64>,
}

impl Default for ModeState {
    fn default() -> Self { Self::new(ContentKind::Tv) }
}

impl ModeState {
    pub fn new(kind: ContentKind) -> Self { Self { kind, next_seq: 1, latest_tv: None, latest_movie: None } }

    pub fn current_kind(&self) -> ContentKind { self.kind }

    /// Activates `kind` and issues the tag for a new request.
    pub fn begin(&mut self, kind: ContentKind, keyword: &str, page: u32) -> RequestTag {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.kind = kind;
        *self.latest_slot(kind) = Some(seq);
        RequestTag { seq, kind, keyword: keyword.to_string(), page }
    }

    /// Latest request issued for `kind`, if any.
    pub fn latest(&self, kind: ContentKind) -> Option<u64> {
        match kind {
            ContentKind::Tv => self.latest_tv,
            ContentKind::Movie => self.latest_movie,
        }
    }

    /// The tag's kind is active and no newer request for it has been issued.
    pub fn is_current(&self, tag: &RequestTag) -> bool {
        tag.kind == self.kind && self.latest(tag.kind) == Some(tag.seq)
    }

    fn latest_slot(&mut self, kind: ContentKind) -> &mut Option<u64> {
        match kind {
            ContentKind::Tv => &mut self.latest_tv,
            ContentKind::Movie => &mut self.latest_movie,
        }
    }
}
