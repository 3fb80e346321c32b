//! Card simulation module
//!
//! All card logic lives here. This module is platform-free:
//! - Explicit `dt` only, no wall clock
//! - Seeded RNG only
//! - No DOM or rendering dependencies

pub mod card;
pub mod chain;
pub mod choreography;
pub mod dodge;
pub mod effects;
pub mod pointer;
pub mod ribbon;
pub mod session;
pub mod timeline;

pub use card::{CardEvent, CardMachine, CardState, Transition};
pub use chain::{Chain, ChainParams, ChainPoint, Constraint};
pub use dodge::{Dodge, DodgeBudget, DodgeController};
pub use effects::{Celebration, ConfettiBurst, EffectSink, SideEffect};
pub use pointer::{DragUpdate, PointerInput, PointerSample, PointerTracker};
pub use ribbon::{PlugTransform, RibbonFrame, SegmentTransform, ribbon_frame};
pub use session::{CardSession, Frame};
pub use timeline::{Ease, Effect, Property, Sample, Step, Target, Timeline, TimelinePlayer, Tween};
