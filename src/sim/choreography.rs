//! The card's scripted animations
//!
//! Durations are in seconds.

use glam::Vec2;

use super::card::CardState;
use super::timeline::{Ease, Effect, Property, Target, Timeline, Tween};
use crate::layout::Rect;

const FADE: f32 = 0.5;

fn tween(target: Target, property: Property, from: f32, to: f32) -> Effect {
    Effect::Tween(Tween::new(target, property, from, to))
}

fn eased(target: Target, property: Property, from: f32, to: f32, ease: Ease) -> Effect {
    Effect::Tween(Tween::new(target, property, from, to).ease(ease))
}

/// Plug grows slightly while held
pub fn grab(pressed: bool) -> Timeline {
    let (from, to) = if pressed { (1.0, 1.1) } else { (1.1, 1.0) };
    Timeline::new().then(0.2, tween(Target::Plug, Property::Scale, from, to))
}

/// Card pitches back and forth after opening
fn wobble() -> Timeline {
    Timeline::new()
        .then(0.2, tween(Target::Card, Property::RotateX, 0.0, -10.0))
        .then(0.1, tween(Target::Card, Property::RotateX, -10.0, 0.0))
        .then(0.14, tween(Target::Card, Property::RotateX, 0.0, 10.0))
        .then(0.05, tween(Target::Card, Property::RotateX, 10.0, 0.0))
        .repeat(2)
}

/// Everything that happens visually when the card opens
pub fn opening() -> Timeline {
    let shake = Tween::new(Target::Card, Property::Y, 0.0, 20.0).yoyo(5);

    Timeline::new()
        .at(0.0, 0.05, Effect::Tween(shake))
        .at(0.0, FADE, eased(Target::PlugShape, Property::Morph, 0.0, 1.0, Ease::Power2InOut))
        .at(0.3, FADE, tween(Target::CardContent, Property::Opacity, 0.0, 1.0))
        .at(0.5, 0.0, Effect::Show(Target::Message))
        .at(0.5, 0.0, Effect::Show(Target::Buttons))
        .at(0.5, FADE, tween(Target::Message, Property::Opacity, 0.0, 1.0))
        .at(0.5, FADE, tween(Target::Buttons, Property::Opacity, 0.0, 1.0))
        .at(0.0, FADE, tween(Target::CordWrapper, Property::Opacity, 1.0, 0.0))
        .at(0.0, FADE, tween(Target::Ribbon, Property::Opacity, 1.0, 0.0))
        .at(FADE, 0.0, Effect::Hide(Target::CordWrapper))
        .at(FADE, 0.0, Effect::Hide(Target::Ribbon))
        .at(0.0, FADE, tween(Target::IntroText, Property::Opacity, 1.0, 0.0))
        .at(FADE, 0.0, Effect::Hide(Target::IntroText))
        .with(wobble())
}

/// Question fades out, the outcome panel fades in and the card grows to
/// `size`. `outcome` is one of the answered states.
pub fn answer(outcome: CardState, card: Rect, size: (f32, f32)) -> Timeline {
    let panel = if outcome == CardState::AnsweredSad {
        Target::Sad
    } else {
        Target::Congrats
    };

    let base = Timeline::new()
        .at(0.0, FADE, tween(Target::Message, Property::Opacity, 1.0, 0.0))
        .at(0.0, FADE, tween(Target::Buttons, Property::Opacity, 1.0, 0.0))
        .at(FADE, 0.0, Effect::Hide(Target::Message))
        .at(FADE, 0.0, Effect::Hide(Target::Buttons))
        .at(FADE, 0.0, Effect::Show(panel))
        .at(FADE, FADE, tween(panel, Property::Opacity, 0.0, 1.0))
        .at(0.0, 1.0, eased(Target::Card, Property::WidthPx, card.width, size.0, Ease::Power2In))
        .at(0.0, 1.0, eased(Target::Card, Property::HeightPx, card.height, size.1, Ease::Power2In));

    match outcome {
        CardState::AnsweredSad => base
            .at(1.0, 0.3, tween(Target::Sad, Property::WidthPct, 0.0, 100.0))
            .at(1.0, 0.3, tween(Target::Sad, Property::HeightPct, 0.0, 100.0))
            .at(1.3, 0.7, tween(Target::SadImage, Property::WidthPct, 0.0, 90.0))
            .at(1.3, 0.7, tween(Target::SadImage, Property::HeightPct, 0.0, 100.0)),
        _ => base
            .at(1.0, 1.0, tween(Target::Congrats, Property::WidthPct, 0.0, 100.0))
            .at(1.0, 1.0, tween(Target::Congrats, Property::HeightPct, 0.0, 100.0)),
    }
}

/// Decline button slides from one offset to another
pub fn dodge_move(from: Vec2, to: Vec2) -> Timeline {
    Timeline::new()
        .at(0.0, 0.3, eased(Target::DeclineButton, Property::X, from.x, to.x, Ease::Power2Out))
        .at(0.0, 0.3, eased(Target::DeclineButton, Property::Y, from.y, to.y, Ease::Power2Out))
}
