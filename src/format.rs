use std::collections::BTreeMap;

use crate::request::ObjectIds;

/// Drops any package prefix: `ome.model.containers.Dataset` -> `Dataset`.
pub fn short_type_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Sorts ids and collapses consecutive runs: `[5, 1, 3, 2]` -> `1-3,5`.
pub fn order_and_range_ids(ids: &[i64]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut parts = Vec::new();
    let mut index = 0;
    while index < sorted.len() {
        let start = sorted[index];
        let mut end = start;
        while index + 1 < sorted.len() && sorted[index + 1] == end + 1 {
            index += 1;
            end = sorted[index];
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{start}-{end}"));
        }
        index += 1;
    }
    parts.join(",")
}

/// Printable id list per short type name, ordered by the full type name.
pub fn format_object_ids(ids: &ObjectIds) -> Vec<(String, String)> {
    ids.iter()
        .map(|(name, values)| {
            (
                short_type_name(name).to_string(),
                order_and_range_ids(values),
            )
        })
        .collect()
}

pub fn format_targets(targets: &BTreeMap<String, Vec<i64>>) -> String {
    format_object_ids(targets)
        .into_iter()
        .map(|(name, ids)| format!("{name}:{ids}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_package() {
        assert_eq!(short_type_name("ome.model.containers.Dataset"), "Dataset");
    }

    #[test]
    fn short_type_name_plain() {
        assert_eq!(short_type_name("Image"), "Image");
    }

    #[test]
    fn range_single() {
        assert_eq!(order_and_range_ids(&[60]), "60");
    }

    #[test]
    fn range_empty() {
        assert_eq!(order_and_range_ids(&[]), "");
    }

    #[test]
    fn range_pair() {
        assert_eq!(order_and_range_ids(&[102, 101]), "101-102");
    }

    #[test]
    fn range_mixed() {
        assert_eq!(order_and_range_ids(&[5, 1, 3, 2, 9, 10]), "1-3,5,9-10");
    }

    #[test]
    fn range_ignores_repeats() {
        assert_eq!(order_and_range_ids(&[4, 4, 7]), "4,7");
    }

    #[test]
    fn format_object_ids_orders_by_full_name() {
        let ids = ObjectIds::from([
            ("ome.model.core.Image".to_string(), vec![3, 4]),
            ("ome.model.containers.Dataset".to_string(), vec![60]),
        ]);
        assert_eq!(
            format_object_ids(&ids),
            vec![
                ("Dataset".to_string(), "60".to_string()),
                ("Image".to_string(), "3-4".to_string()),
            ]
        );
    }

    #[test]
    fn format_targets_joins_types() {
        let targets = BTreeMap::from([
            ("Dataset".to_string(), vec![50]),
            ("Image".to_string(), vec![1, 2]),
        ]);
        assert_eq!(format_targets(&targets), "Dataset:50 Image:1-2");
    }
}
