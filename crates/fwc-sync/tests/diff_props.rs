//! Property tests for the edit-set algebra

use fwc_model::{
    CanonicalKey, LogDestinationConfig, LogDestinationType, LogType, LoggingConfiguration,
};
use fwc_sync::edit_set;
use proptest::prelude::*;
use std::collections::HashSet;

fn config_strategy() -> impl Strategy<Value = LogDestinationConfig> {
    (
        prop::collection::hash_map("[a-c]{1,3}", "[a-c]{1,3}", 0..3),
        prop_oneof![
            Just(LogDestinationType::S3),
            Just(LogDestinationType::CloudWatchLogs),
            Just(LogDestinationType::KinesisDataFirehose),
        ],
        prop_oneof![Just(LogType::Alert), Just(LogType::Flow), Just(LogType::Tls)],
    )
        .prop_map(|(log_destination, log_destination_type, log_type)| LogDestinationConfig {
            log_destination,
            log_destination_type,
            log_type,
        })
}

fn key_set(configs: &[LogDestinationConfig]) -> HashSet<CanonicalKey> {
    configs
        .iter()
        .map(|c| CanonicalKey::of(c).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn edit_set_is_sound_minimal_and_idempotent(
        desired in prop::collection::vec(config_strategy(), 0..6),
        observed in prop::collection::vec(config_strategy(), 0..6),
    ) {
        let desired_collection = LoggingConfiguration::from(desired.clone());
        let observed_collection = LoggingConfiguration::from(observed.clone());
        let edits = edit_set(&desired_collection, &observed_collection).unwrap();

        let desired_keys = key_set(&desired);
        let observed_keys = key_set(&observed);

        // Minimality: nothing present on both sides is ever touched.
        for config in &edits.additions {
            let key = CanonicalKey::of(config).unwrap();
            prop_assert!(desired_keys.contains(&key));
            prop_assert!(!observed_keys.contains(&key));
        }
        for config in &edits.removals {
            let key = CanonicalKey::of(config).unwrap();
            prop_assert!(observed_keys.contains(&key));
            prop_assert!(!desired_keys.contains(&key));
        }

        // Soundness: (observed \ removals) ∪ additions is set-equal to desired.
        let removal_keys = key_set(&edits.removals);
        let mut converged: Vec<LogDestinationConfig> = observed
            .iter()
            .filter(|c| !removal_keys.contains(&CanonicalKey::of(c).unwrap()))
            .cloned()
            .collect();
        converged.extend(edits.additions.iter().cloned());
        prop_assert_eq!(key_set(&converged), desired_keys);

        // Idempotence: re-diffing after the apply yields nothing.
        let follow_up = edit_set(
            &desired_collection,
            &LoggingConfiguration::from(converged),
        )
        .unwrap();
        prop_assert!(follow_up.is_empty());
    }

    #[test]
    fn permuting_a_collection_never_produces_edits(
        (original, shuffled) in prop::collection::vec(config_strategy(), 0..6)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle())),
    ) {
        let edits = edit_set(
            &LoggingConfiguration::from(original),
            &LoggingConfiguration::from(shuffled),
        )
        .unwrap();
        prop_assert!(edits.is_empty());
    }
}
