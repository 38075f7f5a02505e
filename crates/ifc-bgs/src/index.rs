// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material index
//!
//! Groups written objects by declared class name and material label.

use ifc_bgs_model::ObjectId;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Declared class name -> material label -> object ids
///
/// Keys are the declared class (`IfcSlab` stays `IfcSlab` even when the
/// stream labels it `IfcRoof`).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MaterialIndex {
    entries: FxHashMap<String, FxHashMap<String, FxHashSet<ObjectId>>>,
}

impl MaterialIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an object under a class name and label
    ///
    /// Returns `false` if the object was already recorded there.
    pub fn record(&mut self, type_name: &str, label: &str, id: ObjectId) -> bool {
        self.entries
            .entry(type_name.to_string())
            .or_default()
            .entry(label.to_string())
            .or_default()
            .insert(id)
    }

    /// Objects recorded under a class name and label
    pub fn objects(&self, type_name: &str, label: &str) -> Option<&FxHashSet<ObjectId>> {
        self.entries.get(type_name)?.get(label)
    }

    /// Check if an object is recorded under a class name and label
    pub fn contains(&self, type_name: &str, label: &str, id: ObjectId) -> bool {
        self.objects(type_name, label)
            .is_some_and(|ids| ids.contains(&id))
    }

    /// Labels recorded for a class name
    pub fn labels(&self, type_name: &str) -> impl Iterator<Item = &str> {
        self.entries
            .get(type_name)
            .into_iter()
            .flat_map(|labels| labels.keys().map(String::as_str))
    }

    /// Class names with at least one record
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of recorded (class, label, object) triples
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .flat_map(|labels| labels.values())
            .map(|ids| ids.len())
            .sum()
    }

    /// Check if nothing is recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all records
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sorted view of the index, for stable output
    pub fn to_sorted(&self) -> BTreeMap<&str, BTreeMap<&str, BTreeSet<u64>>> {
        self.entries
            .iter()
            .map(|(type_name, labels)| {
                let labels = labels
                    .iter()
                    .map(|(label, ids)| (label.as_str(), ids.iter().map(|id| id.0).collect()))
                    .collect();
                (type_name.as_str(), labels)
            })
            .collect()
    }

    /// Serialize as JSON with sorted keys and ids
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_sorted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut index = MaterialIndex::new();
        assert!(index.is_empty());

        assert!(index.record("IfcWall", "Brick", ObjectId(1)));
        assert!(index.record("IfcWall", "Brick", ObjectId(2)));
        assert!(index.record("IfcWall", "Glass", ObjectId(3)));
        assert!(!index.record("IfcWall", "Brick", ObjectId(1)));

        assert_eq!(index.len(), 3);
        assert!(index.contains("IfcWall", "Brick", ObjectId(2)));
        assert!(!index.contains("IfcWall", "Glass", ObjectId(2)));
        assert!(index.objects("IfcSlab", "Brick").is_none());

        let mut labels: Vec<_> = index.labels("IfcWall").collect();
        labels.sort_unstable();
        assert_eq!(labels, vec!["Brick", "Glass"]);
        assert_eq!(index.labels("IfcDoor").count(), 0);
    }

    #[test]
    fn test_same_label_under_different_classes() {
        let mut index = MaterialIndex::new();
        index.record("IfcSlab", "Concrete", ObjectId(7));
        index.record("IfcWall", "Concrete", ObjectId(8));

        let mut types: Vec<_> = index.type_names().collect();
        types.sort_unstable();
        assert_eq!(types, vec!["IfcSlab", "IfcWall"]);
        assert_eq!(index.objects("IfcSlab", "Concrete").unwrap().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut index = MaterialIndex::new();
        index.record("IfcWall", "Brick", ObjectId(1));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_json_is_sorted() {
        let mut index = MaterialIndex::new();
        index.record("IfcWall", "Glass", ObjectId(9));
        index.record("IfcWall", "Brick", ObjectId(3));
        index.record("IfcWall", "Brick", ObjectId(1));
        index.record("IfcBeam", "Steel", ObjectId(5));

        assert_eq!(
            index.to_json().unwrap(),
            r#"{"IfcBeam":{"Steel":[5]},"IfcWall":{"Brick":[1,3],"Glass":[9]}}"#
        );
    }
}
