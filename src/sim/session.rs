//! Card session
//!
//! Owns every piece of card state and advances it one frame at a time. The
//! host feeds input events between frames, calls [`CardSession::step`] once
//! per animation frame, paints the returned [`Frame`], and drains side
//! effects into its [`EffectSink`].

use glam::Vec2;

use super::card::{CardEvent, CardMachine, CardState, Transition};
use super::chain::Chain;
use super::choreography;
use super::dodge::{Dodge, DodgeBudget, DodgeController};
use super::effects::{
    CONFETTI_OPEN, CONFETTI_YES, Celebration, EffectSink, SideEffect, VIBRATE_OPEN, VIBRATE_SAD,
    VIBRATE_YES,
};
use super::pointer::{DragUpdate, PointerInput, PointerTracker};
use super::ribbon::{RibbonFrame, ribbon_frame};
use super::timeline::{Property, Sample, Target, TimelinePlayer};
use crate::layout::{Layout, Rect};
use crate::tuning::Tuning;

/// Output of one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Cord transforms, `None` once the cord is hidden
    pub ribbon: Option<RibbonFrame>,
    /// Animated values to apply, in order
    pub samples: Vec<Sample>,
}

/// One card, from first paint until the page goes away
#[derive(Debug)]
pub struct CardSession {
    tuning: Tuning,
    layout: Layout,
    chain: Chain,
    pointer: PointerTracker,
    machine: CardMachine,
    dodge: DodgeController,
    /// Translation the decline button settles at once its slide ends
    decline_offset: Vec2,
    /// Translation the decline button is showing this frame
    decline_shown: Vec2,
    player: TimelinePlayer,
    celebration: Option<Celebration>,
    pending: Vec<SideEffect>,
    disposed: bool,
}

impl CardSession {
    /// Start a fresh card. `seed` drives the dodge randomness.
    pub fn create(layout: Layout, tuning: Tuning, seed: u64) -> Self {
        log::info!(
            "Card session created ({}x{}, seed {})",
            layout.viewport.width,
            layout.viewport.height,
            seed
        );
        Self {
            chain: Chain::new(layout.anchor(), &tuning),
            machine: CardMachine::new(tuning.max_dodges),
            dodge: DodgeController::new(seed),
            tuning,
            layout,
            pointer: PointerTracker::new(),
            decline_offset: Vec2::ZERO,
            decline_shown: Vec2::ZERO,
            player: TimelinePlayer::new(),
            celebration: None,
            pending: Vec::new(),
            disposed: false,
        }
    }

    pub fn state(&self) -> CardState {
        self.machine.state()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn dodge_budget(&self) -> &DodgeBudget {
        self.machine.dodge_budget()
    }

    pub fn decline_offset(&self) -> Vec2 {
        self.decline_offset
    }

    /// Decline button translation as of the last frame, mid-slide included
    pub fn decline_shown(&self) -> Vec2 {
        self.decline_shown
    }

    pub fn ribbon_visible(&self) -> bool {
        self.chain.is_visible()
    }

    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    /// Whether the host should suppress native scroll/drag right now
    pub fn should_prevent_default(&self) -> bool {
        self.pointer.should_prevent_default()
    }

    /// Whether the decline button accepts a direct click
    pub fn decline_armed(&self) -> bool {
        self.machine.dodge_budget().is_exhausted()
    }

    /// Cord transforms for the current positions
    pub fn ribbon(&self) -> RibbonFrame {
        ribbon_frame(self.chain.points(), self.layout.anchor())
    }

    /// Pointer pressed on the plug
    pub fn on_drag_start(&mut self, input: Option<&PointerInput>) -> Option<Transition> {
        if self.disposed {
            return None;
        }
        let sample = input.and_then(PointerInput::sample);
        if self.pointer.on_drag_start(sample) != DragUpdate::Started {
            return None;
        }
        if self.machine.state().is_closed() {
            self.player.play(choreography::grab(true));
        }
        self.machine.handle(CardEvent::DragStart)
    }

    /// Pointer moved anywhere on the page
    pub fn on_drag_move(&mut self, input: &PointerInput) -> Option<Transition> {
        if self.disposed {
            return None;
        }
        let sample = input.sample()?;
        let DragUpdate::Moved(sample) = self.pointer.on_drag_move(sample.pos.x, sample.pos.y)
        else {
            return None;
        };
        self.chain.pin(sample.pos);

        let depth = sample.pos.y - self.layout.card_top();
        let threshold = self.tuning.pull_threshold(self.layout.viewport.height);
        let transition = self.machine.handle(CardEvent::Pulled { depth, threshold })?;
        self.open();
        Some(transition)
    }

    /// Pointer released anywhere on the page
    pub fn on_drag_end(&mut self) -> Option<Transition> {
        if self.disposed || self.pointer.on_drag_end() != DragUpdate::Ended {
            return None;
        }
        self.chain.release();
        if self.machine.state().is_closed() {
            self.player.play(choreography::grab(false));
        }
        self.machine.handle(CardEvent::DragEnd)
    }

    /// Page geometry changed (already debounced by the host).
    ///
    /// An active drag keeps going.
    pub fn on_resize(&mut self, layout: Layout) {
        if self.disposed {
            return;
        }
        log::debug!(
            "Relayout to {}x{}, card top {}",
            layout.viewport.width,
            layout.viewport.height,
            layout.card_top()
        );
        self.layout = layout;
        self.chain.relayout(layout.anchor(), self.tuning.cord_length);
    }

    /// Card moved without a viewport change (e.g. while shaking)
    pub fn set_card_rect(&mut self, card: Rect) {
        self.layout.card = card;
    }

    /// Pointer entered or touched the decline button.
    ///
    /// `button` is the box as currently displayed, including any slide still
    /// in flight. The returned rect is where the button settles.
    pub fn on_approach_decline(&mut self, button: Rect) -> Option<Dodge> {
        if self.disposed {
            return None;
        }
        let budget = self.machine.dodge_budget_mut()?;
        let dodge = self
            .dodge
            .on_approach(budget, button, self.layout.viewport, &self.tuning)?;

        let to = self.decline_shown + dodge.applied;
        self.player
            .play(choreography::dodge_move(self.decline_shown, to));
        self.decline_offset = to;
        if self.machine.dodge_budget().is_exhausted() {
            log::info!("Decline button gave up dodging");
        }
        Some(dodge)
    }

    /// Affirmative button selected
    pub fn select_affirm(&mut self) -> Option<Transition> {
        if self.disposed {
            return None;
        }
        let transition = self.machine.handle(CardEvent::Affirm)?;
        self.pending.push(SideEffect::Vibrate(VIBRATE_YES));
        self.pending.push(SideEffect::Confetti(CONFETTI_YES));
        self.celebration = Some(Celebration::yes());
        self.play_answer(transition.to);
        Some(transition)
    }

    /// Decline button selected; ignored until it stops dodging
    pub fn select_decline(&mut self) -> Option<Transition> {
        if self.disposed {
            return None;
        }
        let transition = self.machine.handle(CardEvent::Decline)?;
        self.pending.push(SideEffect::Vibrate(VIBRATE_SAD));
        self.play_answer(transition.to);
        Some(transition)
    }

    /// Advance one animation frame
    pub fn step(&mut self, dt: f32) -> Frame {
        if self.disposed {
            return Frame::default();
        }

        self.chain.step(dt);
        let samples = self.player.advance(dt);
        self.track_decline(&samples);

        let celebrated = match &mut self.celebration {
            Some(celebration) => {
                let bursts = celebration.advance(dt);
                self.pending.extend(bursts.into_iter().map(SideEffect::Confetti));
                celebration.is_done()
            }
            None => false,
        };
        if celebrated {
            log::debug!("Celebration finished");
            self.celebration = None;
        }

        Frame {
            ribbon: self.chain.is_visible().then(|| self.ribbon()),
            samples,
        }
    }

    /// Hand queued side effects to the host
    pub fn drain_effects(&mut self, sink: &mut impl EffectSink) {
        for effect in self.pending.drain(..) {
            sink.fire(effect);
        }
    }

    /// Stop all animation and ignore further input
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pointer.on_drag_end();
        self.chain.release();
        self.player.clear();
        self.celebration = None;
        self.pending.clear();
        self.disposed = true;
        log::info!("Card session disposed in state {}", self.state().as_str());
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Follow the decline button's slide; later samples win, as on the page
    fn track_decline(&mut self, samples: &[Sample]) {
        for sample in samples {
            if let Sample::Value {
                target: Target::DeclineButton,
                property,
                value,
            } = *sample
            {
                match property {
                    Property::X => self.decline_shown.x = value,
                    Property::Y => self.decline_shown.y = value,
                    _ => {}
                }
            }
        }
    }

    fn open(&mut self) {
        self.chain.set_visible(false);
        self.pending.push(SideEffect::Vibrate(VIBRATE_OPEN));
        self.pending.push(SideEffect::Confetti(CONFETTI_OPEN));
        self.player.play(choreography::opening());
    }

    fn play_answer(&mut self, outcome: CardState) {
        let size = self.tuning.answer_card_size(self.layout.viewport.width);
        self.player
            .play(choreography::answer(outcome, self.layout.card, size));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Viewport;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn desktop() -> CardSession {
        let layout = Layout::new(
            Viewport::new(1024.0, 768.0),
            Rect::new(312.0, 200.0, 400.0, 260.0),
        );
        CardSession::create(layout, Tuning::default(), 42)
    }

    fn mouse(x: f32, y: f32) -> PointerInput {
        PointerInput::Mouse { x, y }
    }

    fn open(session: &mut CardSession) {
        session.on_drag_start(Some(&mouse(512.0, 350.0)));
        session.on_drag_move(&mouse(512.0, 200.0 + 301.0));
        assert_eq!(session.state(), CardState::Opened);
    }

    #[test]
    fn test_pull_past_threshold_opens_card() {
        let mut s = desktop();
        assert!(s.ribbon_visible());
        let t = s.on_drag_start(Some(&mouse(512.0, 350.0))).unwrap();
        assert_eq!(t.to, CardState::Dragging);
        assert!(s.should_prevent_default());

        assert_eq!(s.on_drag_move(&mouse(512.0, 500.0)), None);
        let t = s.on_drag_move(&mouse(512.0, 501.0)).unwrap();
        assert_eq!(t.from, CardState::Dragging);
        assert_eq!(t.to, CardState::Opened);
        assert!(!s.ribbon_visible());
        assert!(s.step(DT).ribbon.is_none());

        let mut effects: Vec<SideEffect> = Vec::new();
        s.drain_effects(&mut effects);
        assert_eq!(
            effects,
            vec![
                SideEffect::Vibrate(VIBRATE_OPEN),
                SideEffect::Confetti(CONFETTI_OPEN)
            ]
        );
    }

    #[test]
    fn test_repeated_crossing_opens_once() {
        let mut s = desktop();
        open(&mut s);
        assert_eq!(s.on_drag_move(&mouse(512.0, 300.0)), None);
        assert_eq!(s.on_drag_move(&mouse(512.0, 700.0)), None);
        s.on_drag_end();
        s.on_drag_start(None);
        assert_eq!(s.on_drag_move(&mouse(512.0, 700.0)), None);
        assert_eq!(s.state(), CardState::Opened);
    }

    #[test]
    fn test_short_viewport_uses_smaller_threshold() {
        let layout = Layout::new(
            Viewport::new(375.0, 560.0),
            Rect::new(20.0, 100.0, 335.0, 220.0),
        );
        let mut s = CardSession::create(layout, Tuning::default(), 1);
        s.on_drag_start(None);
        assert!(s.on_drag_move(&mouse(187.0, 301.0)).is_some());
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut s = desktop();
        let before = s.chain().free_end();
        assert_eq!(s.on_drag_move(&mouse(512.0, 900.0)), None);
        assert_eq!(s.chain().free_end(), before);
        assert_eq!(s.state(), CardState::Intro);
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let mut s = desktop();
        s.on_drag_start(None);
        let before = s.chain().free_end();
        assert_eq!(s.on_drag_move(&PointerInput::Touch { touches: vec![] }), None);
        assert_eq!(s.chain().free_end(), before);
    }

    #[test]
    fn test_release_returns_to_intro() {
        let mut s = desktop();
        s.on_drag_start(None);
        s.on_drag_move(&mouse(530.0, 380.0));
        let t = s.on_drag_end().unwrap();
        assert_eq!(t.to, CardState::Intro);
        assert!(!s.chain().is_pinned());
        assert!(!s.should_prevent_default());
    }

    #[test]
    fn test_resize_mid_drag_keeps_gesture() {
        let mut s = desktop();
        s.on_drag_start(None);
        s.on_drag_move(&mouse(512.0, 350.0));
        let layout = Layout::new(
            Viewport::new(800.0, 768.0),
            Rect::new(200.0, 180.0, 400.0, 260.0),
        );
        s.on_resize(layout);
        assert!(s.is_dragging());
        assert_eq!(s.chain().anchor(), Vec2::new(400.0, 180.0));
        // Threshold is measured from the new card top
        assert!(s.on_drag_move(&mouse(400.0, 481.0)).is_some());
    }

    #[test]
    fn test_decline_after_budget_exhausted() {
        let mut s = desktop();
        open(&mut s);
        let mut button = Rect::new(560.0, 420.0, 90.0, 44.0);
        assert_eq!(s.select_decline(), None);
        for _ in 0..20 {
            let d = s.on_approach_decline(button).unwrap();
            button = d.rect;
        }
        assert!(s.decline_armed());
        assert_eq!(s.on_approach_decline(button), None);
        assert_eq!(s.dodge_budget().used(), 20);

        let t = s.select_decline().unwrap();
        assert_eq!(t.to, CardState::AnsweredSad);
        let mut effects: Vec<SideEffect> = Vec::new();
        s.drain_effects(&mut effects);
        assert!(effects.contains(&SideEffect::Vibrate(VIBRATE_SAD)));
    }

    #[test]
    fn test_decline_offset_tracks_dodges() {
        let mut s = desktop();
        open(&mut s);
        let start = Rect::new(560.0, 420.0, 90.0, 44.0);
        let d1 = s.on_approach_decline(start).unwrap();
        for _ in 0..30 {
            s.step(DT);
        }
        assert!((s.decline_shown() - d1.applied).length() < 1e-3);

        let d2 = s.on_approach_decline(d1.rect).unwrap();
        assert!((s.decline_offset() - (d1.applied + d2.applied)).length() < 1e-3);
        assert!((d2.rect.origin() - (start.origin() + s.decline_offset())).length() < 1e-3);
    }

    #[test]
    fn test_dodge_mid_slide_settles_where_reported() {
        let layout = Layout::new(
            Viewport::new(375.0, 667.0),
            Rect::new(20.0, 150.0, 335.0, 220.0),
        );
        let viewport = layout.viewport;
        let margin = Tuning::default().dodge_margin;
        for seed in 0..12 {
            let mut s = CardSession::create(layout, Tuning::default(), seed);
            s.on_drag_start(None);
            s.on_drag_move(&mouse(187.0, 150.0 + 301.0));
            assert_eq!(s.state(), CardState::Opened);

            let base = Rect::new(200.0, 420.0, 90.0, 44.0);
            let mut shown = Vec2::ZERO;
            for _ in 0..19 {
                // Half a slide, then hover again, reading the offset off the frame
                for sample in s.step(0.15).samples {
                    if let Sample::Value {
                        target: Target::DeclineButton,
                        property,
                        value,
                    } = sample
                    {
                        match property {
                            Property::X => shown.x = value,
                            Property::Y => shown.y = value,
                            _ => {}
                        }
                    }
                }
                let d = s.on_approach_decline(base.translated(shown)).unwrap();
                let settled = base.translated(s.decline_offset());
                assert!(
                    (settled.origin() - d.rect.origin()).length() < 1e-2,
                    "seed {seed}: settled {settled:?} vs reported {:?}",
                    d.rect
                );
                assert!(
                    settled.within(viewport, margin - 1e-2),
                    "seed {seed}: {settled:?} left the viewport"
                );
            }
        }
    }

    #[test]
    fn test_overflowing_tuning_does_not_break_dodging() {
        let tuning = Tuning::from_json(r#"{"dodge_max": 1e40}"#).unwrap();
        let layout = Layout::new(
            Viewport::new(1024.0, 768.0),
            Rect::new(312.0, 200.0, 400.0, 260.0),
        );
        let mut s = CardSession::create(layout, tuning, 3);
        open(&mut s);
        let d = s.on_approach_decline(Rect::new(560.0, 420.0, 90.0, 44.0)).unwrap();
        assert!(d.rect.within(layout.viewport, 10.0));
    }

    #[test]
    fn test_yes_celebrates_for_thirty_seconds() {
        let mut s = desktop();
        open(&mut s);
        let mut effects: Vec<SideEffect> = Vec::new();
        s.drain_effects(&mut effects);
        effects.clear();

        assert_eq!(s.select_affirm().map(|t| t.to), Some(CardState::AnsweredYes));
        for _ in 0..(35 * 60) {
            s.step(DT);
        }
        s.drain_effects(&mut effects);
        let bursts = effects
            .iter()
            .filter(|e| matches!(e, SideEffect::Confetti(b) if *b == CONFETTI_YES))
            .count();
        // One immediately, then every five seconds for thirty
        assert!((6..=7).contains(&bursts), "bursts {bursts}");
        assert!(effects.contains(&SideEffect::Vibrate(VIBRATE_YES)));
    }

    #[test]
    fn test_answered_card_ignores_everything() {
        let mut s = desktop();
        open(&mut s);
        s.select_affirm();
        assert_eq!(s.select_decline(), None);
        assert_eq!(s.select_affirm(), None);
        assert_eq!(s.on_drag_start(None), None);
        assert_eq!(s.on_drag_move(&mouse(0.0, 2000.0)), None);
        assert_eq!(s.on_approach_decline(Rect::new(10.0, 10.0, 50.0, 20.0)), None);
        assert_eq!(s.state(), CardState::AnsweredYes);
    }

    #[test]
    fn test_opening_hides_ribbon_element() {
        let mut s = desktop();
        open(&mut s);
        let mut hidden = false;
        for _ in 0..120 {
            for sample in s.step(DT).samples {
                if sample
                    == (Sample::Display {
                        target: Target::Ribbon,
                        shown: false,
                    })
                {
                    hidden = true;
                }
            }
        }
        assert!(hidden);
    }

    #[test]
    fn test_dispose_stops_everything() {
        let mut s = desktop();
        s.on_drag_start(None);
        s.dispose();
        assert!(s.is_disposed());
        assert!(!s.is_dragging());
        assert_eq!(s.step(DT), Frame::default());
        assert_eq!(s.on_drag_start(None), None);
    }

    #[derive(Debug, Clone)]
    enum Input {
        Start,
        Move(f32, f32),
        End,
        Approach,
        Yes,
        No,
        Step,
    }

    fn any_input() -> impl Strategy<Value = Input> {
        prop_oneof![
            Just(Input::Start),
            (0.0f32..1024.0, 0.0f32..768.0).prop_map(|(x, y)| Input::Move(x, y)),
            Just(Input::End),
            Just(Input::Approach),
            Just(Input::Yes),
            Just(Input::No),
            Just(Input::Step),
        ]
    }

    proptest! {
        #[test]
        fn prop_terminal_states_absorb(inputs in proptest::collection::vec(any_input(), 0..200)) {
            let mut s = desktop();
            let mut button = Rect::new(560.0, 420.0, 90.0, 44.0);
            let mut terminal: Option<CardState> = None;
            for input in inputs {
                match input {
                    Input::Start => { s.on_drag_start(None); }
                    Input::Move(x, y) => { s.on_drag_move(&mouse(x, y)); }
                    Input::End => { s.on_drag_end(); }
                    Input::Approach => {
                        if let Some(d) = s.on_approach_decline(button) {
                            button = d.rect;
                        }
                    }
                    Input::Yes => { s.select_affirm(); }
                    Input::No => { s.select_decline(); }
                    Input::Step => { s.step(DT); }
                }
                if let Some(t) = terminal {
                    prop_assert_eq!(s.state(), t);
                } else if s.state().is_terminal() {
                    terminal = Some(s.state());
                }
                prop_assert_eq!(s.chain().anchor(), Vec2::new(512.0, 200.0));
            }
        }
    }
}
