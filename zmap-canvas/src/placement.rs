//! World geometry for a bumped column

use crate::long_item::{ItemId, LongItems, Shape};
use serde::Serialize;
use zmap_core::{FeatureId, FeatureSet};

/// Where one visible feature is drawn, in world coordinates. `y1`/`y2` are
/// the feature's first and last base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeaturePlacement {
    pub id: FeatureId,
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl FeaturePlacement {
    pub fn shape(&self) -> Shape {
        Shape::Box {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnPlacement {
    pub name: String,
    /// Left edge of the column.
    pub x: f64,
    pub width: f64,
    pub features: Vec<FeaturePlacement>,
}

impl ColumnPlacement {
    /// Place every visible feature of `set`.
    ///
    /// Unbumped features are centred in the column. Bumped features sit at
    /// their lane offset, centred within the lane unless the column is a
    /// graph.
    pub fn compute(set: &FeatureSet) -> Self {
        let style = set.style();
        let bumped = set.is_bumped();

        let features = set
            .features()
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.is_hidden())
            .map(|(id, f)| {
                let slot = if bumped {
                    set.lanes()
                        .get(f.lane as usize)
                        .map_or(f.width, |lane| lane.width)
                } else {
                    style.width
                };
                let centring = if style.graph { 0.0 } else { (slot - f.width) / 2.0 };
                let x1 = style.dx + f.lane_offset + centring;
                FeaturePlacement {
                    id,
                    x1,
                    x2: x1 + f.width,
                    y1: f.start() as f64,
                    y2: f.end() as f64,
                }
            })
            .collect();

        Self {
            name: set.name().to_string(),
            x: style.dx,
            width: set.display_width(),
            features,
        }
    }

    pub fn get(&self, id: FeatureId) -> Option<&FeaturePlacement> {
        self.features.iter().find(|p| p.id == id)
    }

    /// Register the column's features with the long item table, keyed by
    /// `base + feature id`. Returns how many were long.
    pub fn register_long_items(&self, long_items: &mut LongItems, base: ItemId) -> usize {
        self.features
            .iter()
            .filter(|p| long_items.check(base + p.id as ItemId, p.shape()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zmap_core::{
        BumpContext, BumpMode, BumpSettings, ColumnStyle, CompressionScope, FeatureInterval,
        HiddenFlags, NoopListener,
    };

    fn column(graph: bool) -> FeatureSet {
        let mut set = FeatureSet::new(
            "genes",
            ColumnStyle {
                width: 10.0,
                dx: 100.0,
                graph,
                ..ColumnStyle::default()
            },
        );
        set.add_features(vec![
            FeatureInterval::new(10, 20, 4.0).unwrap(),
            FeatureInterval::new(15, 25, 6.0).unwrap(),
            FeatureInterval::new(30, 40, 2.0).unwrap(),
        ]);
        set
    }

    fn bump(set: &mut FeatureSet) {
        let mut ctx = BumpContext::new(BumpSettings {
            spacing: 2.0,
            ..BumpSettings::default()
        });
        set.bump(&mut ctx, BumpMode::PackByOverlap, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
    }

    #[test]
    fn test_unbumped_features_are_centred_in_column() {
        let set = column(false);
        let placement = ColumnPlacement::compute(&set);
        assert_eq!(placement.width, 10.0);
        let first = placement.get(0).unwrap();
        assert_eq!((first.x1, first.x2), (103.0, 107.0));
        assert_eq!((first.y1, first.y2), (10.0, 20.0));
    }

    #[test]
    fn test_bumped_features_are_centred_in_lane() {
        let mut set = column(false);
        bump(&mut set);
        let placement = ColumnPlacement::compute(&set);

        // lane 0 holds widths 4 and 2, lane 1 holds 6
        assert_eq!(placement.width, 12.0);
        assert_eq!(placement.get(0).unwrap().x1, 100.0);
        assert_eq!(placement.get(2).unwrap().x1, 101.0);
        assert_eq!(placement.get(1).unwrap().x1, 106.0);
    }

    #[test]
    fn test_graph_columns_are_not_centred() {
        let mut set = column(true);
        bump(&mut set);
        let placement = ColumnPlacement::compute(&set);
        assert_eq!(placement.get(2).unwrap().x1, 100.0);
    }

    #[test]
    fn test_hidden_features_are_not_placed() {
        let mut set = column(false);
        set.set_hidden(1, HiddenFlags::USER_HIDE).unwrap();
        let placement = ColumnPlacement::compute(&set);
        assert_eq!(placement.features.len(), 2);
        assert!(placement.get(1).is_none());
    }

    #[test]
    fn test_register_long_items() {
        let mut set = FeatureSet::new("contigs", ColumnStyle::default());
        set.add_features(vec![
            FeatureInterval::new(1, 100, 8.0).unwrap(),
            FeatureInterval::new(1, 1_000_000, 8.0).unwrap(),
        ]);
        let placement = ColumnPlacement::compute(&set);
        let mut long_items = LongItems::new(8.0);
        assert_eq!(placement.register_long_items(&mut long_items, 1000), 1);
        assert!(long_items.original(1001).is_some());
    }
}
