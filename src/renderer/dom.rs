//! Applies ribbon frames and timeline samples to page elements
//!
//! Each animated element keeps its own transform components so that tweens
//! on different properties (and the per-frame ribbon placement) compose into
//! one `transform` string.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::sim::{Frame, Property, RibbonFrame, Sample, Target};

/// Plug outline before opening and after; both have the same vertex count
const PLUG_CLOSED: [(f32, f32); 6] = [
    (35.0, 0.0),
    (65.0, 0.0),
    (75.0, 30.0),
    (75.0, 100.0),
    (25.0, 100.0),
    (25.0, 30.0),
];
const PLUG_OPEN: [(f32, f32); 6] = [
    (30.0, 0.0),
    (70.0, 0.0),
    (85.0, 30.0),
    (85.0, 120.0),
    (15.0, 120.0),
    (15.0, 30.0),
];

/// CSS selector for each animated element
fn selector(target: Target) -> &'static str {
    match target {
        Target::Card => ".card",
        Target::CardContent => ".card-content",
        Target::IntroText => ".text-intro",
        Target::Message => ".valentine-text",
        Target::Buttons => ".buttons",
        Target::CordWrapper => ".cord-wrapper",
        Target::Ribbon => ".ribbon",
        Target::Plug => ".plug",
        Target::PlugShape => ".plug path",
        Target::DeclineButton => ".buttons .no",
        Target::Congrats => ".valentine-congrats",
        Target::Sad => ".valentine-sad",
        Target::SadImage => ".sad",
    }
}

const TARGETS: [Target; 13] = [
    Target::Card,
    Target::CardContent,
    Target::IntroText,
    Target::Message,
    Target::Buttons,
    Target::CordWrapper,
    Target::Ribbon,
    Target::Plug,
    Target::PlugShape,
    Target::DeclineButton,
    Target::Congrats,
    Target::Sad,
    Target::SadImage,
];

/// SVG path for the plug at morph progress `t`
pub fn plug_path(t: f32) -> String {
    let t = t.clamp(0.0, 1.0);
    let mut d = String::new();
    for (i, (a, b)) in PLUG_CLOSED.iter().zip(PLUG_OPEN.iter()).enumerate() {
        let x = a.0 + (b.0 - a.0) * t;
        let y = a.1 + (b.1 - a.1) * t;
        d.push_str(if i == 0 { "M" } else { " L" });
        d.push_str(&format!("{x:.1},{y:.1}"));
    }
    d.push_str(" Z");
    d
}

/// Transform components of one element
#[derive(Debug, Clone, Copy)]
struct TransformState {
    x: f32,
    y: f32,
    rotate: f32,
    rotate_x: f32,
    scale: f32,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotate: 0.0,
            rotate_x: 0.0,
            scale: 1.0,
        }
    }
}

impl TransformState {
    fn css(&self, perspective: bool) -> String {
        let mut css = String::new();
        if perspective {
            css.push_str("perspective(1000px) ");
        }
        css.push_str(&format!(
            "translate({:.2}px, {:.2}px) rotate({:.2}deg) rotateX({:.2}deg) scale({:.3})",
            self.x, self.y, self.rotate, self.rotate_x, self.scale
        ));
        css
    }
}

/// Cached element handles plus their transform state
pub struct DomRenderer {
    elements: HashMap<Target, Vec<Element>>,
    transforms: HashMap<Target, TransformState>,
}

impl DomRenderer {
    /// Look up every animated element once. Missing elements are skipped.
    pub fn new(document: &Document) -> Self {
        let mut elements = HashMap::new();
        for target in TARGETS {
            let found: Vec<Element> = document
                .query_selector_all(selector(target))
                .map(|list| {
                    (0..list.length())
                        .filter_map(|i| list.item(i))
                        .filter_map(|node| node.dyn_into::<Element>().ok())
                        .collect()
                })
                .unwrap_or_default();
            if found.is_empty() {
                log::warn!("No element for {}", selector(target));
            }
            elements.insert(target, found);
        }

        let mut renderer = Self {
            elements,
            transforms: HashMap::new(),
        };
        renderer.set_style(Target::Plug, "transform-origin", "50% 0%");
        renderer.set_style(Target::Ribbon, "transform-origin", "50% 0%");
        renderer.apply_transform(Target::Card);
        renderer
    }

    /// Paint one session frame
    pub fn apply(&mut self, frame: &Frame) {
        if let Some(ribbon) = &frame.ribbon {
            self.apply_ribbon(ribbon);
        }
        for sample in &frame.samples {
            self.apply_sample(*sample);
        }
    }

    pub fn set_cursor(&self, target: Target, cursor: &str) {
        self.set_style(target, "cursor", cursor);
    }

    pub fn add_class(&self, target: Target, class: &str) {
        for el in self.elements.get(&target).into_iter().flatten() {
            let _ = el.class_list().add_1(class);
        }
    }

    fn apply_ribbon(&mut self, ribbon: &RibbonFrame) {
        // A single ribbon element follows the final segment
        if let Some(seg) = ribbon.last_segment() {
            self.set_style(Target::Ribbon, "height", &format!("{:.2}px", seg.length));
            let t = self.transforms.entry(Target::Ribbon).or_default();
            t.x = seg.translate.x;
            t.y = seg.translate.y;
            t.rotate = seg.rotation_deg();
            self.apply_transform(Target::Ribbon);
        }
        if let Some(plug) = ribbon.plug {
            let t = self.transforms.entry(Target::Plug).or_default();
            t.x = plug.translate.x;
            t.y = plug.translate.y;
            t.rotate = plug.rotation_deg;
            self.apply_transform(Target::Plug);
        }
    }

    fn apply_sample(&mut self, sample: Sample) {
        match sample {
            Sample::Display { target, shown } => {
                self.set_style(target, "display", if shown { "block" } else { "none" });
            }
            Sample::Value {
                target,
                property,
                value,
            } => match property {
                Property::Opacity => self.set_style(target, "opacity", &format!("{value:.3}")),
                Property::WidthPx => self.set_style(target, "width", &format!("{value:.1}px")),
                Property::HeightPx => self.set_style(target, "height", &format!("{value:.1}px")),
                Property::WidthPct => self.set_style(target, "width", &format!("{value:.1}%")),
                Property::HeightPct => self.set_style(target, "height", &format!("{value:.1}%")),
                Property::Morph => {
                    let d = plug_path(value);
                    for el in self.elements.get(&target).into_iter().flatten() {
                        let _ = el.set_attribute("d", &d);
                    }
                }
                Property::X | Property::Y | Property::Scale | Property::RotateX => {
                    let t = self.transforms.entry(target).or_default();
                    match property {
                        Property::X => t.x = value,
                        Property::Y => t.y = value,
                        Property::Scale => t.scale = value,
                        _ => t.rotate_x = value,
                    }
                    self.apply_transform(target);
                }
            },
        }
    }

    fn apply_transform(&mut self, target: Target) {
        let state = *self.transforms.entry(target).or_default();
        let css = state.css(target == Target::Card);
        self.set_style(target, "transform", &css);
    }

    fn set_style(&self, target: Target, property: &str, value: &str) {
        for el in self.elements.get(&target).into_iter().flatten() {
            if let Some(html) = el.dyn_ref::<HtmlElement>() {
                let _ = html.style().set_property(property, value);
            } else {
                // SVG elements: fall back to presentation attributes
                let _ = el.set_attribute(property, value);
            }
        }
    }
}
