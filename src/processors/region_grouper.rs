use crate::models::GeoRecord;
use std::collections::BTreeMap;

/// Partition records by region name. Regions come out sorted; records keep
/// their input order within each region.
pub fn group_by_region(records: Vec<GeoRecord>) -> BTreeMap<String, Vec<GeoRecord>> {
    let mut groups: BTreeMap<String, Vec<GeoRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.kommune.clone())
            .or_default()
            .push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NormalizedRecord;

    fn geo(row: usize, region: &str) -> GeoRecord {
        GeoRecord::from_normalized(
            NormalizedRecord::new(row, 592_000.0, 6_137_000.0, region.to_string()),
            10.45,
            55.37,
            "unknown",
        )
    }

    #[test]
    fn test_groups_sorted_by_region() {
        let groups = group_by_region(vec![
            geo(1, "Odense"),
            geo(2, "Assens"),
            geo(3, "Odense"),
        ]);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["Assens", "Odense"]);
        assert_eq!(groups["Odense"].len(), 2);
        assert_eq!(groups["Assens"].len(), 1);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(group_by_region(Vec::new()).is_empty());
    }
}
