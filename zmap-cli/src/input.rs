//! JSON column dumps and layout output

use serde::{Deserialize, Serialize};
use std::path::Path;
use zmap_canvas::{ColumnPlacement, FeaturePlacement, LongItems};
use zmap_core::{
    BumpOutcome, ColumnStyle, FeatureInterval, FeatureSet, GenomicPos, HiddenFlags, Lane, SubColumn,
};

use crate::error::{CliError, CliResult};

/// One column as dumped by the display layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFile {
    pub name: String,
    #[serde(default)]
    pub style: ColumnStyle,
    pub features: Vec<FeatureRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub start: Option<GenomicPos>,
    #[serde(default)]
    pub end: Option<GenomicPos>,
    /// Defaults to the column width.
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub group: Option<String>,
    /// Exons or alignment blocks of a composite feature.
    #[serde(default)]
    pub parts: Vec<PartRecord>,
    #[serde(default)]
    pub summarised: bool,
    #[serde(default)]
    pub user_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartRecord {
    pub start: GenomicPos,
    pub end: GenomicPos,
    #[serde(default)]
    pub width: Option<f64>,
}

impl ColumnFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CliError::parse(path.display().to_string(), e.to_string()))
    }

    pub fn into_feature_set(self) -> CliResult<FeatureSet> {
        let column_width = self.style.width;
        let mut set = FeatureSet::new(self.name, self.style);

        for (n, record) in self.features.into_iter().enumerate() {
            let width = record.width.unwrap_or(column_width);
            let group = record.group.as_deref().map(|name| set.intern_group(name));
            let with_group = |f: FeatureInterval| match group {
                Some(key) => f.with_group(key),
                None => f,
            };

            let ids = if record.parts.is_empty() {
                let (start, end) = match (record.start, record.end) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(CliError::invalid_format(format!(
                            "feature {} has neither start/end nor parts",
                            n
                        )))
                    }
                };
                let feature = FeatureInterval::new(start, end, width)
                    .map_err(|e| CliError::invalid_format(format!("feature {}: {}", n, e)))?;
                vec![set.add_feature(with_group(feature))]
            } else {
                let parts = record
                    .parts
                    .iter()
                    .map(|p| {
                        FeatureInterval::new(p.start, p.end, p.width.unwrap_or(width)).map(with_group)
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| CliError::invalid_format(format!("feature {}: {}", n, e)))?;
                set.add_composite(parts)
                    .map_err(|e| CliError::invalid_format(format!("feature {}: {}", n, e)))?
            };

            for id in ids {
                if record.summarised {
                    set.set_hidden(id, HiddenFlags::SUMMARISED)
                        .map_err(|e| CliError::validation(e.to_string()))?;
                }
                if record.user_hidden {
                    set.set_hidden(id, HiddenFlags::USER_HIDE)
                        .map_err(|e| CliError::validation(e.to_string()))?;
                }
            }
        }

        Ok(set)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureLayout {
    pub id: usize,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub lane: u32,
    pub offset: f64,
    pub hidden: bool,
    /// World x extent, absent for hidden features.
    pub x: Option<(f64, f64)>,
}

/// What `zmap bump` writes.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutFile {
    pub name: String,
    pub outcome: BumpOutcome,
    pub width: f64,
    pub lanes: Vec<Lane>,
    pub sub_columns: Vec<SubColumn>,
    /// Features too long to draw whole at maximum zoom.
    pub long_features: Vec<usize>,
    pub features: Vec<FeatureLayout>,
}

impl LayoutFile {
    pub fn new(set: &FeatureSet, outcome: BumpOutcome, long_items: &mut LongItems) -> Self {
        let placement = ColumnPlacement::compute(set);
        placement.register_long_items(long_items, 0);
        let long_features = placement
            .features
            .iter()
            .filter(|p| long_items.original(p.id as u64).is_some())
            .map(|p| p.id)
            .collect();
        let features = set
            .features()
            .iter()
            .enumerate()
            .map(|(id, f)| FeatureLayout {
                id,
                start: f.start(),
                end: f.end(),
                lane: f.lane,
                offset: f.lane_offset,
                hidden: f.is_hidden(),
                x: placement.get(id).map(|p: &FeaturePlacement| (p.x1, p.x2)),
            })
            .collect();

        Self {
            name: set.name().to_string(),
            outcome,
            width: placement.width,
            lanes: set.lanes().to_vec(),
            sub_columns: set.sub_columns().to_vec(),
            long_features,
            features,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CliResult<FeatureSet> {
        let file: ColumnFile = serde_json::from_str(json).unwrap();
        file.into_feature_set()
    }

    #[test]
    fn test_simple_and_composite_features() {
        let set = parse(
            r#"{
                "name": "genes",
                "style": { "width": 6.0 },
                "features": [
                    { "start": 10, "end": 20, "group": "est" },
                    { "parts": [ { "start": 300, "end": 310 }, { "start": 100, "end": 110, "width": 2.0 } ] },
                    { "start": 5, "end": 9, "summarised": true }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(set.len(), 4);
        assert_eq!(set.feature(0).unwrap().width, 6.0);
        assert_eq!(set.group_name(set.feature(0).unwrap().group_key.unwrap()), Some("est"));
        assert_eq!(set.feature(1).unwrap().start(), 100);
        assert_eq!(set.feature(1).unwrap().width, 2.0);
        assert_eq!(set.feature(1).unwrap().right, Some(2));
        assert!(set.feature(3).unwrap().hidden.contains(HiddenFlags::SUMMARISED));
    }

    #[test]
    fn test_layout_lists_long_features() {
        let mut set = parse(
            r#"{ "name": "clones", "features": [ { "start": 1, "end": 100 }, { "start": 1, "end": 900000 } ] }"#,
        )
        .unwrap();
        let outcome = set.unbump(&mut zmap_core::BumpContext::default()).unwrap();
        let layout = LayoutFile::new(&set, outcome, &mut LongItems::new(8.0));
        assert_eq!(layout.long_features, vec![1]);
        assert_eq!(layout.features[0].x, Some((0.0, 8.0)));
    }

    #[test]
    fn test_feature_without_coordinates_is_rejected() {
        let err = parse(r#"{ "name": "x", "features": [ { "start": 10 } ] }"#).unwrap_err();
        assert!(matches!(err, CliError::InvalidFormat { .. }));

        let err = parse(r#"{ "name": "x", "features": [ { "start": 10, "end": 5 } ] }"#).unwrap_err();
        assert!(err.to_string().contains("feature 0"));
    }
}
