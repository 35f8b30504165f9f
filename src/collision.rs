use crate::repository::Zone;

/// Pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounding box of a droppable region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// What a registered droppable region represents: a whole section panel or
/// one sortable item slot inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionKind {
    Container { zone: Zone },
    Item { id: String, zone: Zone },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppableRegion {
    pub kind: RegionKind,
    pub rect: Rect,
}

impl DroppableRegion {
    pub fn container(zone: Zone, rect: Rect) -> Self {
        Self { kind: RegionKind::Container { zone }, rect }
    }

    pub fn item(id: impl Into<String>, zone: Zone, rect: Rect) -> Self {
        Self { kind: RegionKind::Item { id: id.into(), zone }, rect }
    }
}

/// Pluggable collision detection: given pointer geometry and the registered
/// droppable regions, pick the most relevant drop target.
pub trait CollisionStrategy {
    fn resolve<'a>(
        &self,
        pointer: Point,
        regions: &'a [DroppableRegion],
    ) -> Option<&'a DroppableRegion>;
}

/// Default strategy: container-level collisions win over item-level ones.
///
/// Containers under the pointer are matched first (smallest area wins, so a
/// nested panel beats its parent); only when the pointer is inside no
/// container do item slots compete by nearest center. This guarantees a
/// sensible target anywhere inside a populated or empty section.
#[derive(Debug, Default)]
pub struct ContainerFirst;

impl CollisionStrategy for ContainerFirst {
    fn resolve<'a>(
        &self,
        pointer: Point,
        regions: &'a [DroppableRegion],
    ) -> Option<&'a DroppableRegion> {
        let best_container = regions
            .iter()
            .filter(|r| matches!(r.kind, RegionKind::Container { .. }))
            .filter(|r| r.rect.contains(pointer))
            .min_by(|a, b| a.rect.area().total_cmp(&b.rect.area()));
        if best_container.is_some() {
            return best_container;
        }
        regions
            .iter()
            .filter(|r| matches!(r.kind, RegionKind::Item { .. }))
            .min_by(|a, b| {
                pointer
                    .distance_to(a.rect.center())
                    .total_cmp(&pointer.distance_to(b.rect.center()))
            })
    }
}

/// Registry of currently-droppable regions, maintained by the view layer as
/// panels and cards mount and unmount.
#[derive(Debug, Default)]
pub struct DroppableSet {
    regions: Vec<DroppableRegion>,
}

impl DroppableSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, region: DroppableRegion) {
        self.regions.push(region);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn regions(&self) -> &[DroppableRegion] {
        &self.regions
    }

    pub fn resolve<'a>(
        &'a self,
        pointer: Point,
        strategy: &dyn CollisionStrategy,
    ) -> Option<&'a DroppableRegion> {
        strategy.resolve(pointer, &self.regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set() -> DroppableSet {
        let mut set = DroppableSet::new();
        set.register(DroppableRegion::container(
            Zone::News,
            Rect::new(0.0, 0.0, 200.0, 400.0),
        ));
        set.register(DroppableRegion::container(
            Zone::Music,
            Rect::new(220.0, 0.0, 200.0, 400.0),
        ));
        set.register(DroppableRegion::item(
            "n1",
            Zone::News,
            Rect::new(10.0, 10.0, 180.0, 80.0),
        ));
        set.register(DroppableRegion::item(
            "m1",
            Zone::Music,
            Rect::new(230.0, 10.0, 180.0, 80.0),
        ));
        set
    }

    #[test]
    fn container_wins_over_item_under_pointer() {
        let set = set();
        // Pointer over both the news panel and the n1 card.
        let hit = set.resolve(Point::new(50.0, 50.0), &ContainerFirst).unwrap();
        assert_eq!(hit.kind, RegionKind::Container { zone: Zone::News });
    }

    #[test]
    fn empty_space_inside_panel_still_resolves() {
        let set = set();
        let hit = set
            .resolve(Point::new(100.0, 350.0), &ContainerFirst)
            .unwrap();
        assert_eq!(hit.kind, RegionKind::Container { zone: Zone::News });
    }

    #[test]
    fn outside_all_containers_falls_back_to_nearest_item_center() {
        let set = set();
        // In the gap between the two panels, closer to the music card.
        let hit = set.resolve(Point::new(215.0, 50.0), &ContainerFirst).unwrap();
        match &hit.kind {
            RegionKind::Item { id, zone } => {
                assert_eq!(id, "m1");
                assert_eq!(*zone, Zone::Music);
            }
            other => panic!("expected item hit, got {other:?}"),
        }
    }

    #[test]
    fn nested_container_prefers_most_specific() {
        let mut set = set();
        set.register(DroppableRegion::container(
            Zone::Trending,
            Rect::new(20.0, 100.0, 100.0, 100.0),
        ));
        let hit = set
            .resolve(Point::new(50.0, 150.0), &ContainerFirst)
            .unwrap();
        assert_eq!(hit.kind, RegionKind::Container { zone: Zone::Trending });
    }

    #[test]
    fn no_regions_means_no_target() {
        let set = DroppableSet::new();
        assert!(set.resolve(Point::new(0.0, 0.0), &ContainerFirst).is_none());
    }
}
