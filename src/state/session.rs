/// Per-image crop session state machine
///
/// Each loaded image gets a fresh `Session` that walks through two candidate
/// crops: EditingFirst -> EditingSecond -> Confirming. Pointer and zoom
/// events reshape the active rectangle; a primary click freezes the active
/// slot and moves on. All geometry goes through the pure functions in
/// `geometry`, so the machine itself holds no hidden drawing state.

use crate::geometry::{self, CropRect};

/// Which editing pass the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Shaping the first candidate crop (initial state on image load)
    EditingFirst,
    /// First crop frozen, shaping the second candidate
    EditingSecond,
    /// Both crops frozen; waiting for the operator to pick a variant
    Confirming,
}

/// A frozen candidate crop: the rectangle plus the zoom that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProposal {
    pub rect: CropRect,
    pub zoom: f32,
}

/// The fixed two-slot record of candidate crops.
///
/// An empty slot is a valid selection target: it falls back to saving the
/// unmodified original instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Proposals {
    pub first: Option<CropProposal>,
    pub second: Option<CropProposal>,
}

/// Identifies one of the two proposal preview surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalSlot {
    First,
    Second,
}

/// What the writer should persist for the current image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    First,
    Second,
    Original,
}

/// What happened on a primary click, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Proposal 1 frozen; zoom reset for the second pass
    FrozeFirst,
    /// Proposal 2 frozen; session now waits for a variant pick
    FrozeSecond,
    /// Click while confirming: save the original and advance
    SaveOriginal,
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    width: u32,
    height: u32,
    zoom: f32,
    pointer: (i32, i32),
    pub proposals: Proposals,
}

impl Session {
    /// Fresh session for a newly loaded image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            phase: SessionPhase::EditingFirst,
            width,
            height,
            zoom: 1.0,
            pointer: (0, 0),
            proposals: Proposals::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Track the pointer. Ignored while confirming: the frozen previews
    /// must not change under the operator's cursor.
    pub fn pointer_moved(&mut self, x: i32, y: i32) {
        if self.phase != SessionPhase::Confirming {
            self.pointer = (x, y);
        }
    }

    /// Step the zoom factor by `delta` (clamped to >= 1.0, 0.1 grid).
    pub fn adjust_zoom(&mut self, delta: f32) {
        if self.phase != SessionPhase::Confirming {
            self.zoom = geometry::clamp_zoom(self.zoom + delta);
        }
    }

    /// The rectangle currently under edit, recomputed from pointer and zoom.
    pub fn active_rect(&self) -> CropRect {
        geometry::compute_crop_rect(self.width, self.height, self.pointer.0, self.pointer.1, self.zoom)
    }

    /// Primary click on the editing surface: freeze the active slot and
    /// advance the phase. The pointer position carries over into the second
    /// pass but the zoom starts back at 1.0.
    pub fn primary_click(&mut self) -> ClickOutcome {
        match self.phase {
            SessionPhase::EditingFirst => {
                self.proposals.first = Some(CropProposal {
                    rect: self.active_rect(),
                    zoom: self.zoom,
                });
                self.phase = SessionPhase::EditingSecond;
                self.zoom = 1.0;
                ClickOutcome::FrozeFirst
            }
            SessionPhase::EditingSecond => {
                self.proposals.second = Some(CropProposal {
                    rect: self.active_rect(),
                    zoom: self.zoom,
                });
                self.phase = SessionPhase::Confirming;
                ClickOutcome::FrozeSecond
            }
            SessionPhase::Confirming => ClickOutcome::SaveOriginal,
        }
    }

    /// Map a click on a proposal surface to a persistence selection.
    /// An empty slot falls back to the original, in any phase.
    pub fn select_variant(&self, slot: ProposalSlot) -> Selection {
        match slot {
            ProposalSlot::First if self.proposals.first.is_some() => Selection::First,
            ProposalSlot::Second if self.proposals.second.is_some() => Selection::Second,
            _ => Selection::Original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_sequence_never_skips_a_phase() {
        let mut session = Session::new(100, 100);
        assert_eq!(session.phase(), SessionPhase::EditingFirst);

        assert_eq!(session.primary_click(), ClickOutcome::FrozeFirst);
        assert_eq!(session.phase(), SessionPhase::EditingSecond);
        assert!(session.proposals.first.is_some());
        assert!(session.proposals.second.is_none());

        assert_eq!(session.primary_click(), ClickOutcome::FrozeSecond);
        assert_eq!(session.phase(), SessionPhase::Confirming);
        assert!(session.proposals.second.is_some());

        // Further primary clicks keep requesting an original save
        assert_eq!(session.primary_click(), ClickOutcome::SaveOriginal);
        assert_eq!(session.phase(), SessionPhase::Confirming);
    }

    #[test]
    fn test_first_freeze_captures_zoom_then_resets_it() {
        let mut session = Session::new(100, 100);
        session.pointer_moved(50, 50);
        for _ in 0..5 {
            session.adjust_zoom(0.1);
        }
        assert_eq!(session.zoom(), 1.5);

        session.primary_click();
        let first = session.proposals.first.unwrap();
        assert_eq!(first.zoom, 1.5);
        assert_eq!(first.rect.width(), 66); // floor(100 / 1.5)

        // Second pass starts back at full frame
        assert_eq!(session.zoom(), 1.0);
        assert_eq!(session.active_rect().width(), 100);
    }

    #[test]
    fn test_zoom_never_drops_below_one() {
        let mut session = Session::new(100, 100);
        session.adjust_zoom(-0.1);
        session.adjust_zoom(-0.1);
        assert_eq!(session.zoom(), 1.0);
    }

    #[test]
    fn test_pointer_and_zoom_frozen_while_confirming() {
        let mut session = Session::new(100, 100);
        session.pointer_moved(30, 30);
        session.primary_click();
        session.primary_click();

        let before = session.proposals;
        session.pointer_moved(90, 90);
        session.adjust_zoom(0.1);
        assert_eq!(session.proposals, before);
        assert_eq!(session.zoom(), 1.0);
    }

    #[test]
    fn test_empty_slot_selection_falls_back_to_original() {
        let mut session = Session::new(100, 100);
        assert_eq!(session.select_variant(ProposalSlot::First), Selection::Original);
        assert_eq!(session.select_variant(ProposalSlot::Second), Selection::Original);

        session.primary_click();
        assert_eq!(session.select_variant(ProposalSlot::First), Selection::First);
        assert_eq!(session.select_variant(ProposalSlot::Second), Selection::Original);

        session.primary_click();
        assert_eq!(session.select_variant(ProposalSlot::Second), Selection::Second);
    }
}
