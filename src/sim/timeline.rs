//! Scripted timelines
//!
//! A timeline is an ordered list of steps, each `{delay, duration, effect}`.
//! Timelines are data: the player samples them against a clock and the host
//! applies the resulting values however it likes.

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    Linear,
    #[default]
    Power1Out,
    Power2In,
    Power2Out,
    Power2InOut,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Page elements the card animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Card,
    CardContent,
    IntroText,
    Message,
    Buttons,
    CordWrapper,
    Ribbon,
    Plug,
    PlugShape,
    DeclineButton,
    Congrats,
    Sad,
    SadImage,
}

/// Animatable properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Opacity,
    Scale,
    /// Horizontal translation (px)
    X,
    /// Vertical translation (px)
    Y,
    /// Rotation about the x axis (degrees)
    RotateX,
    WidthPx,
    HeightPx,
    WidthPct,
    HeightPct,
    /// Shape morph progress (0 = rest shape, 1 = open shape)
    Morph,
}

/// Interpolates one property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub target: Target,
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub ease: Ease,
    /// Extra plays after the first
    pub repeat: u32,
    /// Alternate direction on every repeat
    pub yoyo: bool,
}

impl Tween {
    pub fn new(target: Target, property: Property, from: f32, to: f32) -> Self {
        Self {
            target,
            property,
            from,
            to,
            ease: Ease::default(),
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn yoyo(mut self, repeat: u32) -> Self {
        self.repeat = repeat;
        self.yoyo = true;
        self
    }

    /// Value at `local` seconds into a step of `duration` seconds per play
    fn value_at(&self, local: f32, duration: f32) -> f32 {
        let plays = self.repeat + 1;
        let progress = if duration <= 0.0 {
            plays as f32
        } else {
            (local / duration).clamp(0.0, plays as f32)
        };

        let (cycle, mut t) = if progress >= plays as f32 {
            (plays - 1, 1.0)
        } else {
            let cycle = progress.floor();
            (cycle as u32, progress - cycle)
        };
        if self.yoyo && cycle % 2 == 1 {
            t = 1.0 - t;
        }

        let eased = self.ease.apply(t);
        self.from + (self.to - self.from) * eased
    }
}

/// What a step does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Tween(Tween),
    /// Make an element displayed
    Show(Target),
    /// Remove an element from display
    Hide(Target),
}

/// One scheduled effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Seconds from timeline start
    pub delay: f32,
    /// Seconds per play (zero for instant effects)
    pub duration: f32,
    pub effect: Effect,
}

impl Step {
    /// Seconds from timeline start until the step is done
    pub fn end(&self) -> f32 {
        let plays = match self.effect {
            Effect::Tween(t) => t.repeat + 1,
            _ => 1,
        };
        self.delay + self.duration * plays as f32
    }
}

/// A value produced by sampling a timeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Value {
        target: Target,
        property: Property,
        value: f32,
    },
    Display {
        target: Target,
        shown: bool,
    },
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    steps: Vec<Step>,
    /// End of the most recently appended step, where `then` continues from
    cursor: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step at an absolute offset from the timeline start
    pub fn at(mut self, delay: f32, duration: f32, effect: Effect) -> Self {
        let step = Step {
            delay,
            duration,
            effect,
        };
        self.cursor = step.end();
        self.steps.push(step);
        self
    }

    /// Add a step starting when the previously added step ends
    pub fn then(self, duration: f32, effect: Effect) -> Self {
        let delay = self.cursor;
        self.at(delay, duration, effect)
    }

    /// Play the whole timeline `count` more times back to back
    pub fn repeat(mut self, count: u32) -> Self {
        let period = self.duration();
        let original = self.steps.clone();
        for n in 1..=count {
            let shift = period * n as f32;
            self.steps.extend(original.iter().map(|s| Step {
                delay: s.delay + shift,
                ..*s
            }));
        }
        self.cursor = self.duration();
        self
    }

    /// Run `other` alongside this timeline, both starting at zero
    pub fn with(mut self, other: Timeline) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Seconds until every step is done
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(Step::end).fold(0.0, f32::max)
    }

    pub fn is_finished(&self, elapsed: f32) -> bool {
        elapsed >= self.duration()
    }

    /// Current value of every started step, in step order.
    ///
    /// Later steps on the same target/property overwrite earlier ones when
    /// applied in order.
    pub fn sample(&self, elapsed: f32) -> Vec<Sample> {
        self.steps
            .iter()
            .filter(|s| elapsed >= s.delay)
            .map(|s| match s.effect {
                Effect::Tween(t) => Sample::Value {
                    target: t.target,
                    property: t.property,
                    value: t.value_at(elapsed - s.delay, s.duration),
                },
                Effect::Show(target) => Sample::Display {
                    target,
                    shown: true,
                },
                Effect::Hide(target) => Sample::Display {
                    target,
                    shown: false,
                },
            })
            .collect()
    }
}

/// Plays timelines against a running clock
#[derive(Debug, Clone, Default)]
pub struct TimelinePlayer {
    clock: f32,
    running: Vec<(f32, Timeline)>,
}

impl TimelinePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `timeline` now
    pub fn play(&mut self, timeline: Timeline) {
        self.running.push((self.clock, timeline));
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Advance the clock and return the samples for this frame.
    ///
    /// Finished timelines yield their final values once more and are dropped.
    pub fn advance(&mut self, dt: f32) -> Vec<Sample> {
        if dt.is_finite() && dt > 0.0 {
            self.clock += dt;
        }
        let clock = self.clock;
        let samples = self
            .running
            .iter()
            .flat_map(|(start, tl)| tl.sample(clock - start))
            .collect();
        self.running.retain(|(start, tl)| !tl.is_finished(clock - start));
        samples
    }

    pub fn clear(&mut self) {
        self.running.clear();
    }
}
