//! Integration tests for repeated catalog merges

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use crate::app::catalog::{StationCandidate, StationCatalog};

    fn station(name: &str) -> StationCandidate {
        StationCandidate {
            name: name.to_string(),
            lat: 41.88,
            lng: -87.63,
            state: "Illinois".to_string(),
            primary_neighborhood: "Loop".to_string(),
            secondary_neighborhood: "Loop".to_string(),
        }
    }

    fn stations(names: &[&str]) -> Vec<StationCandidate> {
        names.iter().map(|name| station(name)).collect()
    }

    /// Test a disjoint second merge and an idempotent re-merge.
    ///
    /// Purpose: Verifies new names get contiguous ids starting at max + 1 and
    /// that merging the same batch again writes nothing.
    /// Benefit: Ensures ids stay compact and reruns are harmless.
    #[tokio::test]
    async fn test_disjoint_merge_then_remerge() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = StationCatalog::from_data_root(temp_dir.path());

        catalog.merge(&stations(&["A", "B", "C"])).await.unwrap();

        let report = catalog.merge(&stations(&["D", "E"])).await.unwrap();
        assert_eq!(
            report.assigned,
            vec![("D".to_string(), 4), ("E".to_string(), 5)]
        );
        assert!(report.master_written);
        assert!(report.mapping_written);

        let master_before = std::fs::read(catalog.master_path()).unwrap();
        let mapping_before = std::fs::read(catalog.mapping_path()).unwrap();

        let again = catalog.merge(&stations(&["D", "E"])).await.unwrap();
        assert_eq!(again.new_stations, 0);
        assert!(again.assigned.is_empty());
        assert!(!again.master_written);
        assert!(!again.mapping_written);

        assert_eq!(std::fs::read(catalog.master_path()).unwrap(), master_before);
        assert_eq!(std::fs::read(catalog.mapping_path()).unwrap(), mapping_before);
    }

    /// Test id stability across many merges.
    ///
    /// Purpose: Verifies that once a name has an id, no later merge (including
    /// supersets, reorderings and overlaps) changes it.
    /// Benefit: Ensures the trip ledger's station ids stay valid forever.
    #[tokio::test]
    async fn test_ids_stable_across_merges() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = StationCatalog::from_data_root(temp_dir.path());

        let batches: Vec<Vec<&str>> = vec![
            vec!["Clark & Lake", "State & Madison"],
            vec!["State & Madison", "Wells & Elm", "Clark & Lake"],
            vec!["Halsted & Roscoe"],
            vec!["Wells & Elm", "Canal & Adams", "Halsted & Roscoe", "Clark & Lake"],
            vec!["Clark & Lake"],
        ];

        let mut first_ids = std::collections::HashMap::new();
        for batch in &batches {
            catalog.merge(&stations(batch)).await.unwrap();
            let mapping = catalog.mapping().await.unwrap();

            for name in batch {
                let id = mapping.id_of(name).unwrap();
                let first = *first_ids.entry(name.to_string()).or_insert(id);
                assert_eq!(id, first, "id of {} changed", name);
            }
        }

        let mapping = catalog.mapping().await.unwrap();
        assert_eq!(mapping.len(), 5);
        assert_eq!(mapping.id_of("Clark & Lake"), Some(1));
        assert_eq!(mapping.id_of("State & Madison"), Some(2));
        assert_eq!(mapping.id_of("Wells & Elm"), Some(3));
        assert_eq!(mapping.id_of("Halsted & Roscoe"), Some(4));
        assert_eq!(mapping.id_of("Canal & Adams"), Some(5));
    }

    /// Test that new names keep their first-seen order.
    ///
    /// Purpose: Verifies ids follow candidate order, not name order.
    /// Benefit: Ensures id assignment is deterministic for a given input.
    #[tokio::test]
    async fn test_new_names_in_first_seen_order() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = StationCatalog::from_data_root(temp_dir.path());

        catalog.merge(&stations(&["M"])).await.unwrap();
        let report = catalog
            .merge(&stations(&["Z", "M", "A", "Z"]))
            .await
            .unwrap();

        assert_eq!(report.duplicate_candidates, 1);
        assert_eq!(
            report.assigned,
            vec![("Z".to_string(), 2), ("A".to_string(), 3)]
        );

        let master = catalog.master().await.unwrap();
        let names: Vec<&str> = master.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["M", "Z", "A"]);
    }
}
