//! Event bus for the explorer.
//!
//! Callers subscribe to UI and data events via [`EventController`]. Each
//! event carries a set of [`EventKind`] flags so one occurrence can match
//! several categories (a click that changes the selection is both `CLICK`
//! and `SELECTION_CHANGED`).
//!
//! Subscribers pass an [`EventFilter`]; an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::data::dataset::PointId;

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

/// Bitflags describing the categories an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u64);

impl EventKind {
    // ── Pointer / interaction ────────────────────────────────────────────
    /// The hovered point changed (including to none).
    pub const HOVER: Self = Self(1 << 0);
    /// A primary click on the scatter canvas.
    pub const CLICK: Self = Self(1 << 1);
    /// The selected set or its order changed.
    pub const SELECTION_CHANGED: Self = Self(1 << 2);

    // ── View ────────────────────────────────────────────────────────────
    pub const ZOOM: Self = Self(1 << 3);
    pub const PAN: Self = Self(1 << 4);
    /// The view was fit to the data bounds (auto or requested).
    pub const FIT_TO_VIEW: Self = Self(1 << 5);
    /// The canvas changed size or pixel density.
    pub const RESIZE: Self = Self(1 << 6);
    /// A draw pass finished.
    pub const DRAW: Self = Self(1 << 7);

    // ── Data ────────────────────────────────────────────────────────────
    /// A dataset replaced the previous one.
    pub const DATASET_LOADED: Self = Self(1 << 8);
    /// Scheme, color mode or cluster filter changed.
    pub const FILTER_CHANGED: Self = Self(1 << 9);

    // ── Export ──────────────────────────────────────────────────────────
    pub const EXPORT: Self = Self(1 << 10);

    /// Wildcard: matches every event kind.
    pub const ALL: Self = Self(u64::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// At least one bit in common.
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// String conversions
// ─────────────────────────────────────────────────────────────────────────────

const KIND_NAMES: &[(EventKind, &str)] = &[
    (EventKind::HOVER, "HOVER"),
    (EventKind::CLICK, "CLICK"),
    (EventKind::SELECTION_CHANGED, "SELECTION_CHANGED"),
    (EventKind::ZOOM, "ZOOM"),
    (EventKind::PAN, "PAN"),
    (EventKind::FIT_TO_VIEW, "FIT_TO_VIEW"),
    (EventKind::RESIZE, "RESIZE"),
    (EventKind::DRAW, "DRAW"),
    (EventKind::DATASET_LOADED, "DATASET_LOADED"),
    (EventKind::FILTER_CHANGED, "FILTER_CHANGED"),
    (EventKind::EXPORT, "EXPORT"),
];

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let mut names = Vec::new();
        let mut known_bits: u64 = 0;
        for (kind, name) in KIND_NAMES {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Metadata – per-event-type payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Pointer position in device pixels and in embedding space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerMeta {
    pub screen: Option<(f64, f64)>,
    pub world: Option<(f64, f64)>,
    /// Item under the pointer, if any.
    pub point_id: Option<PointId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionMeta {
    /// Selected ids in recency order.
    pub ids: Vec<PointId>,
}

/// Transform after a zoom / pan / fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewChangeMeta {
    pub scale: f64,
    pub translate: (f64, f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMeta {
    /// Device pixels.
    pub width: f64,
    pub height: f64,
    pub pixels_per_point: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawMeta {
    pub point_count: usize,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMeta {
    pub name: String,
    pub method: String,
    pub point_count: usize,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterMeta {
    pub scheme: String,
    pub color_mode: String,
    /// Canonical key of the active filter value.
    pub value: Option<String>,
    pub displayed: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportMeta {
    pub format: String,
    pub path: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// ExplorerEvent – the top-level event type
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ExplorerEvent {
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,

    pub pointer: Option<PointerMeta>,
    pub selection: Option<SelectionMeta>,
    pub view_change: Option<ViewChangeMeta>,
    pub resize: Option<ResizeMeta>,
    pub draw: Option<DrawMeta>,
    pub dataset: Option<DatasetMeta>,
    pub filter: Option<FilterMeta>,
    pub export: Option<ExportMeta>,
}

impl ExplorerEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0, // set by controller
            pointer: None,
            selection: None,
            view_change: None,
            resize: None,
            draw: None,
            dataset: None,
            filter: None,
            export: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

/// OR-mask over event kinds.
#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &ExplorerEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<ExplorerEvent>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

/// Collects and distributes UI events to subscribers.
///
/// Attach it to [`ExplorerConfig`](crate::config::ExplorerConfig) before
/// launching the UI, then [`subscribe`](Self::subscribe) to receive events
/// on an `mpsc` channel.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EventCtrlInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<ExplorerEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        self.lock().subscribers.push(Subscriber { filter, sender: tx });
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<ExplorerEvent> {
        self.subscribe(EventFilter::all())
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Deliver `event` to every subscriber whose filter matches. Subscribers
    /// whose receiver was dropped are pruned on their next match.
    pub fn emit(&self, mut event: ExplorerEvent) {
        let mut inner = self.lock();
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        log::trace!("event {}", event.kinds);
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_union_and_intersection() {
        let combined = EventKind::CLICK | EventKind::SELECTION_CHANGED;
        assert!(combined.contains(EventKind::CLICK));
        assert!(combined.contains(EventKind::SELECTION_CHANGED));
        assert!(!EventKind::ZOOM.intersects(combined));
        assert_eq!(EventKind::PAN.union(EventKind::ZOOM), EventKind::PAN | EventKind::ZOOM);
    }

    #[test]
    fn controller_routes_by_filter() {
        let ctrl = EventController::new();
        let rx_all = ctrl.subscribe_all();
        let rx_sel = ctrl.subscribe(EventFilter::only(EventKind::SELECTION_CHANGED));
        let rx_zoom = ctrl.subscribe(EventFilter::only(EventKind::ZOOM));

        let mut evt = ExplorerEvent::new(EventKind::CLICK | EventKind::SELECTION_CHANGED);
        evt.selection = Some(SelectionMeta { ids: vec![9] });
        ctrl.emit(evt);

        assert!(rx_all.try_recv().is_ok());
        let got = rx_sel.try_recv().unwrap();
        assert_eq!(got.selection.unwrap().ids, vec![9]);
        assert!(rx_zoom.try_recv().is_err());
    }

    #[test]
    fn timestamp_set_on_emit() {
        let ctrl = EventController::new();
        let rx = ctrl.subscribe_all();
        std::thread::sleep(std::time::Duration::from_millis(5));
        ctrl.emit(ExplorerEvent::new(EventKind::DRAW));
        assert!(rx.try_recv().unwrap().timestamp > 0.0);
    }

    #[test]
    fn display_names() {
        assert_eq!(EventKind::HOVER.to_string(), "HOVER");
        assert_eq!(
            (EventKind::CLICK | EventKind::SELECTION_CHANGED).to_string(),
            "CLICK|SELECTION_CHANGED"
        );
        assert_eq!(EventKind::ALL.to_string(), "ALL");
        assert_eq!(EventKind(0).to_string(), "EMPTY");
        assert!(EventKind(1 << 63).to_string().starts_with("0x"));
    }

    #[test]
    fn kinds_do_not_overlap() {
        for (i, (a, _)) in KIND_NAMES.iter().enumerate() {
            for (j, (b, _)) in KIND_NAMES.iter().enumerate() {
                if i != j {
                    assert!(!a.intersects(*b), "{} overlaps {}", a, b);
                }
            }
        }
    }

    #[test]
    fn dropped_receiver_is_pruned() {
        let ctrl = EventController::new();
        let rx1 = ctrl.subscribe_all();
        let rx2 = ctrl.subscribe_all();
        drop(rx1);
        ctrl.emit(ExplorerEvent::new(EventKind::PAN));
        assert!(rx2.try_recv().is_ok());
        assert_eq!(ctrl.subscriber_count(), 1);
    }
}
