//! Card state machine
//!
//! Intro ⇄ Dragging → Opened → AnsweredYes | AnsweredSad
//!
//! Everything after Opened is one-way: once the card opens it never closes,
//! and both answers are terminal.

use super::dodge::DodgeBudget;

/// Current phase of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    /// Closed card, cord hanging
    Intro,
    /// Cord is being pulled
    Dragging,
    /// Card open, question and buttons shown
    Opened,
    /// Said yes
    AnsweredYes,
    /// Managed to click no
    AnsweredSad,
}

impl CardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::Intro => "Intro",
            CardState::Dragging => "Dragging",
            CardState::Opened => "Opened",
            CardState::AnsweredYes => "AnsweredYes",
            CardState::AnsweredSad => "AnsweredSad",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CardState::AnsweredYes | CardState::AnsweredSad)
    }

    /// Still closed (cord interaction allowed)
    pub fn is_closed(&self) -> bool {
        matches!(self, CardState::Intro | CardState::Dragging)
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardEvent {
    DragStart,
    DragEnd,
    /// Free end is `depth` px below the card top; opens past `threshold`
    Pulled { depth: f32, threshold: f32 },
    /// Affirmative button selected
    Affirm,
    /// Decline button selected directly
    Decline,
}

/// A state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CardState,
    pub to: CardState,
}

/// Owns the card state and the decline button's dodge budget
#[derive(Debug, Clone)]
pub struct CardMachine {
    state: CardState,
    /// Set on first open, never cleared
    opened: bool,
    dodge: DodgeBudget,
}

impl CardMachine {
    pub fn new(max_dodges: u32) -> Self {
        Self {
            state: CardState::Intro,
            opened: false,
            dodge: DodgeBudget::new(max_dodges),
        }
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn has_opened(&self) -> bool {
        self.opened
    }

    pub fn dodge_budget(&self) -> &DodgeBudget {
        &self.dodge
    }

    /// Budget to spend on an approach; `None` once answered
    pub fn dodge_budget_mut(&mut self) -> Option<&mut DodgeBudget> {
        if self.state.is_terminal() {
            None
        } else {
            Some(&mut self.dodge)
        }
    }

    /// Apply an event, returning the transition it caused (if any)
    pub fn handle(&mut self, event: CardEvent) -> Option<Transition> {
        let next = match (self.state, event) {
            (CardState::Intro, CardEvent::DragStart) => CardState::Dragging,
            (CardState::Dragging, CardEvent::DragEnd) => CardState::Intro,
            (state, CardEvent::Pulled { depth, threshold })
                if state.is_closed() && !self.opened && depth > threshold =>
            {
                CardState::Opened
            }
            (CardState::Opened, CardEvent::Affirm) => CardState::AnsweredYes,
            (CardState::Opened, CardEvent::Decline) if self.dodge.is_exhausted() => {
                CardState::AnsweredSad
            }
            _ => return None,
        };

        let transition = Transition {
            from: self.state,
            to: next,
        };
        if next == CardState::Opened {
            self.opened = true;
        }
        self.state = next;
        log::info!("Card {} -> {}", transition.from.as_str(), transition.to.as_str());
        Some(transition)
    }
}
