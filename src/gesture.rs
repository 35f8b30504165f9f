use tracing::{debug, trace};

use crate::collision::{
    CollisionStrategy, ContainerFirst, DroppableRegion, DroppableSet, Point, RegionKind,
};
use crate::item::ContentItem;
use crate::locate::locate;
use crate::repository::{ContentRepository, Mutation, SectionId, Zone};

/// Low-level drop target as delivered by the pointer/keyboard event source:
/// the element id under the pointer plus whatever container metadata the
/// droppable carries.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub id: String,
    pub container: Option<Zone>,
    pub is_container: bool,
}

impl DropTarget {
    pub fn container_target(zone: Zone) -> Self {
        Self {
            id: zone.as_str().to_string(),
            container: Some(zone),
            is_container: true,
        }
    }

    pub fn item_target(id: impl Into<String>, container: Option<Zone>) -> Self {
        Self {
            id: id.into(),
            container,
            is_container: false,
        }
    }
}

impl From<&DroppableRegion> for DropTarget {
    fn from(region: &DroppableRegion) -> Self {
        match &region.kind {
            RegionKind::Container { zone } => DropTarget::container_target(*zone),
            RegionKind::Item { id, zone } => DropTarget::item_target(id.clone(), Some(*zone)),
        }
    }
}

/// Ephemeral per-gesture state. Created on drag-start, destroyed on drag-end
/// or cancel; never persisted.
#[derive(Debug, Clone)]
pub struct DragSession {
    pub active_item_id: String,
    pub snapshot: ContentItem,
    pub source_section: SectionId,
    pub hovered_zone: Option<Zone>,
}

#[derive(Debug, Default)]
enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What a completed gesture did. Every resolution failure degrades to
/// `NoOp`; partial drag information never corrupts collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Reordered,
    Moved,
    NoOp,
}

/// Owns the pointer/keyboard drag session and turns low-level drop signals
/// into repository operations.
///
/// Sessions are strictly sequential: the event source guarantees
/// single-pointer gesture ownership, so a drag-start while one is active is
/// ignored rather than modeled.
pub struct GestureController {
    state: DragState,
    strategy: Box<dyn CollisionStrategy + Send>,
}

impl Default for GestureController {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureController {
    pub fn new() -> Self {
        Self::with_strategy(ContainerFirst)
    }

    pub fn with_strategy(strategy: impl CollisionStrategy + Send + 'static) -> Self {
        Self {
            state: DragState::Idle,
            strategy: Box::new(strategy),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(s) => Some(s),
            DragState::Idle => None,
        }
    }

    /// Begin a gesture: snapshot the item and its owning collection. A drag
    /// start for an id no collection owns leaves the controller idle.
    pub fn on_drag_start(&mut self, repo: &ContentRepository, active_id: &str) -> bool {
        if self.is_dragging() {
            trace!(active_id, "drag start while dragging, ignored");
            return false;
        }
        let Some(found) = locate(repo, active_id) else {
            debug!(active_id, "drag start for unknown item, ignored");
            return false;
        };
        debug!(
            active_id,
            source = found.section.as_str(),
            "drag session started"
        );
        self.state = DragState::Dragging(DragSession {
            active_item_id: active_id.to_string(),
            snapshot: found.item.clone(),
            source_section: found.section,
            hovered_zone: None,
        });
        true
    }

    /// Re-resolve the hover target for visual feedback. No data mutation.
    pub fn on_drag_over(&mut self, pointer: Point, droppables: &DroppableSet) {
        let hovered = droppables
            .resolve(pointer, self.strategy.as_ref())
            .map(|region| match &region.kind {
                RegionKind::Container { zone } => *zone,
                RegionKind::Item { zone, .. } => *zone,
            });
        if let DragState::Dragging(session) = &mut self.state {
            if session.hovered_zone != hovered {
                trace!(?hovered, "hover target changed");
                session.hovered_zone = hovered;
            }
        }
    }

    pub fn hovered_zone(&self) -> Option<Zone> {
        self.session().and_then(|s| s.hovered_zone)
    }

    /// Complete the gesture against the given drop target. Classification of
    /// source and destination happens before any repository mutation, since
    /// the move itself changes collection membership.
    pub fn on_drag_end(
        &mut self,
        repo: &mut ContentRepository,
        over: Option<DropTarget>,
    ) -> GestureOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return GestureOutcome::NoOp;
        };
        let Some(over) = over else {
            debug!(active_id = %session.active_item_id, "drop with no target, discarded");
            return GestureOutcome::NoOp;
        };
        if over.id == session.active_item_id {
            return GestureOutcome::NoOp;
        }
        let Some(dest_zone) = resolve_destination(repo, &over) else {
            debug!(over_id = %over.id, "unresolvable drop target, discarded");
            return GestureOutcome::NoOp;
        };
        let source_zone = session.source_section.zone();
        if source_zone == dest_zone {
            let mutation = if dest_zone == Zone::Trending {
                repo.reorder_trending(&session.active_item_id, &over.id)
            } else {
                repo.reorder(session.source_section, &session.active_item_id, &over.id)
            };
            match mutation {
                Mutation::Reordered => GestureOutcome::Reordered,
                _ => GestureOutcome::NoOp,
            }
        } else {
            let to = dest_zone.section_for(session.snapshot.variant());
            match repo.move_between(&session.active_item_id, session.source_section, to) {
                Mutation::Moved => GestureOutcome::Moved,
                _ => GestureOutcome::NoOp,
            }
        }
    }

    /// Drag-end variant that resolves the drop target from pointer geometry
    /// through the collision strategy first.
    pub fn on_drag_end_at(
        &mut self,
        repo: &mut ContentRepository,
        pointer: Point,
        droppables: &DroppableSet,
    ) -> GestureOutcome {
        let over = droppables
            .resolve(pointer, self.strategy.as_ref())
            .map(DropTarget::from);
        self.on_drag_end(repo, over)
    }

    /// Pure state reset: pointer left the tracking surface or an external
    /// event aborted the gesture. Never mutates the repository.
    pub fn on_drag_cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag session cancelled");
        }
        self.state = DragState::Idle;
    }
}

/// Ordered destination resolution: explicit container metadata on the
/// target, then the target's own containing zone, then a literal match
/// against known zone names, then locator lookup of the target id.
fn resolve_destination(repo: &ContentRepository, over: &DropTarget) -> Option<Zone> {
    if let Some(zone) = over.container {
        return Some(zone);
    }
    if let Some(zone) = Zone::parse(&over.id) {
        return Some(zone);
    }
    locate(repo, &over.id).map(|found| found.section.zone())
}
