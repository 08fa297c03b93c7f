use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Geometry, LatLng, Ring};
use crate::geometry::point_in_polygon;

/// Shape of a draft editor object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum DraftShape {
    Point(LatLng),
    PolyLine(Ring),
    Polygon(Ring),
}

impl DraftShape {
    fn points(&self) -> &[LatLng] {
        match self {
            DraftShape::Point(p) => std::slice::from_ref(p),
            DraftShape::PolyLine(ring) | DraftShape::Polygon(ring) => ring,
        }
    }
}

/// What selected points are joined into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniteInto {
    PolyLine,
    Polygon,
}

/// Unsaved object sketched on the map
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftObject {
    pub id: Uuid,
    pub shape: DraftShape,
    pub selected: bool,
    /// Readonly drafts can be selected but not deleted
    pub readonly: bool,
}

/// Draft objects in creation order
#[derive(Debug, Clone, Default)]
pub struct DraftBoard {
    objects: Vec<DraftObject>,
}

impl DraftBoard {
    /// Add a selected, deletable draft
    pub fn add(&mut self, shape: DraftShape) -> Uuid {
        self.add_with(shape, true, false)
    }

    pub fn add_with(&mut self, shape: DraftShape, selected: bool, readonly: bool) -> Uuid {
        let id = Uuid::new_v4();
        self.objects.push(DraftObject {
            id,
            shape,
            selected,
            readonly,
        });
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&DraftObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn objects(&self) -> &[DraftObject] {
        &self.objects
    }

    pub fn selected(&self) -> impl Iterator<Item = &DraftObject> {
        self.objects.iter().filter(|o| o.selected)
    }

    /// Flip the selection flag; returns false for unknown ids
    pub fn toggle_select(&mut self, id: Uuid) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(object) => {
                object.selected = !object.selected;
                true
            }
            None => false,
        }
    }

    /// Remove a draft unless it is readonly; returns true if removed
    pub fn delete(&mut self, id: Uuid) -> bool {
        let Some(pos) = self.objects.iter().position(|o| o.id == id) else {
            return false;
        };
        if self.objects[pos].readonly {
            tracing::debug!("Refusing to delete readonly draft {}", id);
            return false;
        }
        self.objects.remove(pos);
        true
    }

    /// Join the selected point drafts into a new line or polygon draft
    ///
    /// Needs at least two selected points.
    pub fn unite_selected_points(&mut self, into: UniteInto) -> Option<Uuid> {
        let points: Ring = self
            .selected()
            .filter_map(|o| match o.shape {
                DraftShape::Point(p) => Some(p),
                _ => None,
            })
            .collect();

        if points.len() < 2 {
            return None;
        }

        let shape = match into {
            UniteInto::PolyLine => DraftShape::PolyLine(points),
            UniteInto::Polygon => DraftShape::Polygon(points),
        };
        Some(self.add(shape))
    }

    /// Drafts lying entirely inside the clipping geometry's outer boundary
    ///
    /// Geometries without an area (points, lines) do not clip anything.
    pub fn clipped(&self, clip: &Geometry) -> Vec<&DraftObject> {
        let boundary = match clip {
            Geometry::Polygon(rings) => rings.first(),
            Geometry::MultiPolygon(polygons) => polygons.first().and_then(|p| p.first()),
            Geometry::Point(_) | Geometry::PolyLine(_) => None,
        };

        match boundary {
            Some(outer) => self
                .objects
                .iter()
                .filter(|o| o.shape.points().iter().all(|&p| point_in_polygon(p, outer)))
                .collect(),
            None => self.objects.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_toggle() {
        let mut board = DraftBoard::default();
        let id = board.add(DraftShape::Point((1.0, 1.0)));
        assert!(board.get(id).unwrap().selected);

        assert!(board.toggle_select(id));
        assert!(!board.get(id).unwrap().selected);
        assert!(!board.toggle_select(Uuid::new_v4()));
    }

    #[test]
    fn test_readonly_not_deleted() {
        let mut board = DraftBoard::default();
        let locked = board.add_with(DraftShape::Point((1.0, 1.0)), false, true);
        let free = board.add(DraftShape::Point((2.0, 2.0)));

        assert!(!board.delete(locked));
        assert!(board.delete(free));
        assert_eq!(board.objects().len(), 1);
    }

    #[test]
    fn test_unite_selected_points() {
        let mut board = DraftBoard::default();
        board.add(DraftShape::Point((0.0, 0.0)));
        board.add(DraftShape::Point((0.0, 1.0)));
        board.add(DraftShape::Point((1.0, 1.0)));
        board.add_with(DraftShape::Point((5.0, 5.0)), false, false);

        let id = board.unite_selected_points(UniteInto::Polygon).unwrap();
        assert_eq!(
            board.get(id).unwrap().shape,
            DraftShape::Polygon(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)])
        );
    }

    #[test]
    fn test_unite_needs_two_points() {
        let mut board = DraftBoard::default();
        board.add(DraftShape::Point((0.0, 0.0)));
        assert!(board.unite_selected_points(UniteInto::PolyLine).is_none());
    }

    #[test]
    fn test_clipped_filters_outside() {
        let mut board = DraftBoard::default();
        board.add(DraftShape::Point((5.0, 5.0)));
        board.add(DraftShape::PolyLine(vec![(1.0, 1.0), (20.0, 20.0)]));

        let clip = Geometry::Polygon(vec![vec![
            (0.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
            (10.0, 0.0),
            (0.0, 0.0),
        ]]);
        let inside = board.clipped(&clip);
        assert_eq!(inside.len(), 1);
        assert_eq!(inside[0].shape, DraftShape::Point((5.0, 5.0)));

        assert_eq!(board.clipped(&Geometry::Point((0.0, 0.0))).len(), 2);
    }

    #[test]
    fn test_draft_json_shape() {
        let mut board = DraftBoard::default();
        let id = board.add(DraftShape::Point((1.0, 2.0)));
        let value = serde_json::to_value(board.get(id).unwrap()).unwrap();
        assert_eq!(value["shape"]["type"], "Point");
        assert_eq!(value["shape"]["coordinates"][1], 2.0);
        assert_eq!(value["selected"], true);
    }
}
