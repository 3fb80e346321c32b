//! Browser platform layer
//!
//! Handles browser specifics for:
//! - Event listener registration
//! - Mouse/touch event decoding
//! - Viewport and element geometry
//! - Haptics and confetti (best-effort, silent when unsupported)

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Element, Event, EventTarget, MouseEvent, TouchEvent};

use crate::layout::{Rect, Viewport};
use crate::sim::{ConfettiBurst, EffectSink, PointerInput};

#[wasm_bindgen(inline_js = "
    export function try_vibrate(pattern) {
        if (typeof navigator === 'undefined' || typeof navigator.vibrate !== 'function') {
            return false;
        }
        return navigator.vibrate(Array.from(pattern));
    }

    export function try_confetti(count, spread, origin_y) {
        if (typeof window.confetti !== 'function') {
            return false;
        }
        window.confetti({
            particleCount: count,
            spread: spread,
            origin: { y: origin_y },
            zIndex: 9999,
        });
        return true;
    }
")]
extern "C" {
    fn try_vibrate(pattern: &[u32]) -> bool;
    fn try_confetti(count: u32, spread: f32, origin_y: f32) -> bool;
}

/// Side effects backed by `navigator.vibrate` and the page's `confetti` function
#[derive(Debug, Default)]
pub struct WebEffects {
    warned_vibrate: bool,
    warned_confetti: bool,
}

impl EffectSink for WebEffects {
    fn vibrate(&mut self, pattern: &'static [u32]) {
        if !try_vibrate(pattern) && !self.warned_vibrate {
            log::warn!("Vibration unsupported - haptics disabled");
            self.warned_vibrate = true;
        }
    }

    fn confetti(&mut self, burst: ConfettiBurst) {
        if !try_confetti(burst.count, burst.spread, burst.origin_y) && !self.warned_confetti {
            log::warn!("No confetti() on the page - celebration skipped");
            self.warned_confetti = true;
        }
    }
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
///
/// `passive: Some(false)` is required for handlers that call `preventDefault`
/// on touch events.
pub fn listen<F>(target: &EventTarget, event: &str, passive: Option<bool>, handler: F)
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(_)>::new(handler);
    let result = match passive {
        Some(passive) => {
            let options = AddEventListenerOptions::new();
            options.set_passive(passive);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
        }
        None => target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()),
    };
    if result.is_err() {
        log::error!("Failed to listen for {event}");
    }
    closure.forget();
}

/// Decode a mouse or touch event into pointer input
pub fn pointer_input(event: &Event) -> Option<PointerInput> {
    if let Some(touch) = event.dyn_ref::<TouchEvent>() {
        let list = touch.touches();
        let touches = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|t| (t.client_x() as f32, t.client_y() as f32))
            .collect();
        return Some(PointerInput::Touch { touches });
    }
    event
        .dyn_ref::<MouseEvent>()
        .map(|m| PointerInput::Mouse {
            x: m.client_x() as f32,
            y: m.client_y() as f32,
        })
}

/// Current window inner size
pub fn viewport() -> Option<Viewport> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some(Viewport::new(width as f32, height as f32))
}

/// Bounding client rect of an element
pub fn rect_of(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Vertical scroll offset of the page
pub fn scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or_default()
}
