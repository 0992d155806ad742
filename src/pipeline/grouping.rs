//! Clustering of source records into duplicate groups

use std::collections::HashMap;

use super::record::{GroupKey, MeasurementRecord};

/// Records sharing a [`GroupKey`], in source read order
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    pub key: GroupKey,
    pub entries: Vec<MeasurementRecord>,
}

impl DuplicateGroup {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group records by (lower-cased name, adduct, rounded m/z).
///
/// Every record lands in exactly one group. Groups are returned in order of
/// their key's first appearance, and entries keep their read order.
pub fn group_records(records: Vec<MeasurementRecord>) -> Vec<DuplicateGroup> {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for record in records {
        let key = record.group_key();
        match index.get(&key) {
            Some(&i) => groups[i].entries.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(DuplicateGroup {
                    key,
                    entries: vec![record],
                });
            }
        }
    }

    groups
}

/// Number of groups holding more than one record
pub fn count_duplicate_groups(groups: &[DuplicateGroup]) -> usize {
    groups.iter().filter(|g| g.len() > 1).count()
}
