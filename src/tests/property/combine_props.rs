//! Property-based tests for combining rumors

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::rumors::{CombineOptions, NewRumor, RumorSource, RumorStatus};
use crate::tests::common::Campaign;

fn arb_references() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("(npc|loc)-[a-e]", 0..6)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn combined_references_are_deduplicated_union(
        npc_lists in prop::collection::vec(arb_references(), 2..5),
        location_lists in prop::collection::vec(arb_references(), 2..5),
        existing_notes in prop::collection::vec(0usize..3, 2..5),
    ) {
        let (merged, sources) = block_on(async {
            let campaign = Campaign::in_memory();
            let mut ids = Vec::new();
            for (i, npcs) in npc_lists.iter().enumerate() {
                let locations = location_lists.get(i).cloned().unwrap_or_default();
                let id = campaign
                    .rumors
                    .add(
                        NewRumor::new(format!("Rumor {i}"), "content", RumorSource::traveler("A stranger"))
                            .with_related_npcs(npcs.clone())
                            .with_related_locations(locations),
                    )
                    .await
                    .unwrap();
                for n in 0..existing_notes.get(i).copied().unwrap_or(0) {
                    campaign.rumors.add_note(&id, &format!("note {n}")).await.unwrap();
                }
                ids.push(id);
            }
            let outcome = campaign
                .rumors
                .combine(&ids, CombineOptions::default())
                .await
                .unwrap();
            let merged = campaign.rumors.get_by_id(&outcome.rumor_id).unwrap();
            let sources: Vec<_> = ids.iter().map(|id| campaign.rumors.get_by_id(id).unwrap()).collect();
            (merged, sources)
        });

        let expected_npcs: HashSet<&String> = npc_lists.iter().flatten().collect();
        let actual_npcs: HashSet<&String> = merged.related_npcs.iter().collect();
        prop_assert_eq!(actual_npcs.len(), merged.related_npcs.len());
        prop_assert_eq!(actual_npcs, expected_npcs);

        let used_locations = &location_lists[..npc_lists.len().min(location_lists.len())];
        let expected_locations: HashSet<&String> = used_locations.iter().flatten().collect();
        let actual_locations: HashSet<&String> = merged.related_locations.iter().collect();
        prop_assert_eq!(actual_locations.len(), merged.related_locations.len());
        prop_assert_eq!(actual_locations, expected_locations);

        for (i, source) in sources.into_iter().enumerate() {
            let original = existing_notes.get(i).copied().unwrap_or(0);
            prop_assert_eq!(source.status, RumorStatus::Confirmed);
            prop_assert_eq!(source.notes.len(), original + 1);
            for (n, note) in source.notes[..original].iter().enumerate() {
                prop_assert_eq!(&note.content, &format!("note {n}"));
            }
        }
    }
}
