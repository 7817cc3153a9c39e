use proptest::prelude::*;
use zmap_core::{
    BumpContext, BumpMode, ColumnStyle, CompressionScope, FeatureInterval, FeatureSet, GenomicPos,
    HiddenFlags, NoopListener, Span,
};

fn spans() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((1u64..2_000, 0u64..300), 0..120)
        .prop_map(|v| v.into_iter().map(|(start, len)| (start, start + len)).collect())
}

fn column(spans: &[(u64, u64)]) -> FeatureSet {
    let mut set = FeatureSet::new("prop", ColumnStyle::default());
    set.add_features(
        spans
            .iter()
            .enumerate()
            .map(|(i, &(s, e))| FeatureInterval::new(s, e, 1.0 + (i % 4) as f64).unwrap()),
    );
    set
}

fn bump(set: &mut FeatureSet, mode: BumpMode, scope: CompressionScope) -> usize {
    let mut ctx = BumpContext::default();
    set.bump(&mut ctx, mode, scope, &mut NoopListener).unwrap().lanes
}

/// Lane and extent of every chain, walked from its head.
fn chains(set: &FeatureSet) -> Vec<(u32, GenomicPos, GenomicPos)> {
    set.features()
        .iter()
        .filter(|f| f.is_chain_head())
        .map(|head| {
            let (mut start, mut end) = (head.start(), head.end());
            let mut next = head.right;
            while let Some(id) = next {
                let part = &set.features()[id];
                start = start.min(part.start());
                end = end.max(part.end());
                next = part.right;
            }
            (head.lane, start, end)
        })
        .collect()
}

fn layout(set: &FeatureSet) -> (Vec<(u32, f64, HiddenFlags)>, f64, usize) {
    let features = set.features().iter().map(|f| (f.lane, f.lane_offset, f.hidden)).collect();
    (features, set.bump_width(), set.lanes().len())
}

/// Deepest point of overlap between closed intervals.
fn max_depth(spans: &[(u64, u64)]) -> usize {
    spans
        .iter()
        .map(|&(pos, _)| spans.iter().filter(|&&(s, e)| s <= pos && pos <= e).count())
        .max()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn no_two_features_in_a_lane_overlap(input in spans()) {
        let mut set = column(&input);
        bump(&mut set, BumpMode::PackByOverlap, CompressionScope::WholeSequence);

        let features = set.features();
        for (i, a) in features.iter().enumerate() {
            for b in &features[i + 1..] {
                if a.lane == b.lane {
                    prop_assert!(!a.span.overlaps(&b.span));
                }
            }
        }
    }

    #[test]
    fn linked_and_composite_chains_never_share_a_lane(
        input in spans(),
        links in prop::collection::vec((0usize..150, 0usize..150), 0..60),
        exons in prop::collection::vec(prop::collection::vec((1u64..2_000, 1u64..200), 1..5), 0..10),
    ) {
        let mut set = column(&input);
        for parts in &exons {
            let parts = parts
                .iter()
                .map(|&(s, len)| FeatureInterval::new(s, s + len, 2.0).unwrap())
                .collect();
            set.add_composite(parts).unwrap();
        }
        for (left, right) in links {
            if left < set.len() && right < set.len() {
                // out of order, cyclic or already linked pairs are refused
                let _ = set.link(left, right);
            }
        }

        let mut ctx = BumpContext::default();
        let outcome = set
            .bump(&mut ctx, BumpMode::PackByOverlap, CompressionScope::WholeSequence, &mut NoopListener)
            .unwrap();
        prop_assert_eq!(outcome.skipped_chains, 0);

        for f in set.features() {
            let mut head = f;
            while let Some(left) = head.left {
                head = &set.features()[left];
            }
            prop_assert_eq!(f.lane, head.lane);
        }

        let chains = chains(&set);
        for (i, a) in chains.iter().enumerate() {
            for b in &chains[i + 1..] {
                if a.0 == b.0 {
                    prop_assert!(a.2 < b.1 || b.2 < a.1, "chains {:?} and {:?} share a lane", a, b);
                }
            }
        }
    }

    #[test]
    fn rebumping_after_another_mode_starts_from_scratch(
        input in spans(),
        first_mode in 0usize..5,
        other_mode in 0usize..5,
        mark in (1u64..2_000, 0u64..800),
    ) {
        let mode = BumpMode::ALL[first_mode];
        let mut set = column(&input);
        let mut ctx = BumpContext::default();

        set.bump(&mut ctx, mode, CompressionScope::WholeSequence, &mut NoopListener).unwrap();
        let before = layout(&set);

        let scope = CompressionScope::MarkedRegion(Span::new(mark.0, mark.0 + mark.1).unwrap());
        set.bump(&mut ctx, BumpMode::ALL[other_mode], scope, &mut NoopListener).unwrap();
        set.bump(&mut ctx, mode, CompressionScope::WholeSequence, &mut NoopListener).unwrap();
        prop_assert_eq!(layout(&set), before);
    }

    #[test]
    fn lane_count_is_the_overlap_depth(input in spans()) {
        let mut set = column(&input);
        let lanes = bump(&mut set, BumpMode::PackByOverlap, CompressionScope::WholeSequence);
        prop_assert_eq!(lanes, max_depth(&input));
    }

    #[test]
    fn bumping_is_deterministic(input in spans(), mode_index in 0usize..5) {
        let mode = BumpMode::ALL[mode_index];
        let mut first = column(&input);
        let mut second = column(&input);
        bump(&mut first, mode, CompressionScope::WholeSequence);
        bump(&mut second, mode, CompressionScope::WholeSequence);

        let layout = |set: &FeatureSet| -> Vec<(u32, f64)> {
            set.features().iter().map(|f| (f.lane, f.lane_offset)).collect()
        };
        prop_assert_eq!(layout(&first), layout(&second));
        prop_assert_eq!(first.bump_width(), second.bump_width());
    }

    #[test]
    fn composite_parts_move_together(
        exons in prop::collection::vec(prop::collection::vec((1u64..5_000, 1u64..200), 1..6), 1..20),
        mode_index in 1usize..5,
    ) {
        let mode = BumpMode::ALL[mode_index];
        let mut set = FeatureSet::new("transcripts", ColumnStyle::default());
        let mut composites = Vec::new();
        for parts in &exons {
            let parts = parts
                .iter()
                .map(|&(s, len)| FeatureInterval::new(s, s + len, 2.0).unwrap())
                .collect();
            composites.push(set.add_composite(parts).unwrap());
        }
        bump(&mut set, mode, CompressionScope::WholeSequence);

        for ids in composites {
            let head = set.feature(ids[0]).unwrap();
            for id in &ids[1..] {
                let part = set.feature(*id).unwrap();
                prop_assert_eq!(part.lane, head.lane);
                prop_assert_eq!(part.lane_offset, head.lane_offset);
            }
        }
    }

    #[test]
    fn unbump_restores_every_feature(
        input in spans(),
        hides in prop::collection::vec(0u8..4, 120),
        mode_index in 1usize..5,
        mark in (1u64..2_000, 0u64..800),
    ) {
        let mut set = column(&input);
        for id in 0..set.len() {
            let reason = match hides[id] {
                1 => HiddenFlags::SUMMARISED,
                2 => HiddenFlags::USER_HIDE,
                3 => HiddenFlags::HIDE_FILTER,
                _ => continue,
            };
            set.set_hidden(id, reason).unwrap();
        }
        let before: Vec<HiddenFlags> = set.features().iter().map(|f| f.hidden).collect();

        let scope = CompressionScope::MarkedRegion(Span::new(mark.0, mark.0 + mark.1).unwrap());
        let mut ctx = BumpContext::default();
        set.bump(&mut ctx, BumpMode::ALL[mode_index], scope, &mut NoopListener).unwrap();
        set.unbump(&mut ctx).unwrap();

        let after: Vec<HiddenFlags> = set.features().iter().map(|f| f.hidden).collect();
        prop_assert_eq!(before, after);
        prop_assert!(set.features().iter().all(|f| f.lane == 0 && f.lane_offset == 0.0));
    }

    #[test]
    fn more_features_never_need_fewer_lanes(input in spans(), cut in 0usize..120) {
        let cut = cut.min(input.len());
        let mut fewer = column(&input[..cut]);
        let mut more = column(&input);
        let fewer_lanes = bump(&mut fewer, BumpMode::PackByOverlap, CompressionScope::WholeSequence);
        let more_lanes = bump(&mut more, BumpMode::PackByOverlap, CompressionScope::WholeSequence);
        prop_assert!(more_lanes >= fewer_lanes);
    }
}
