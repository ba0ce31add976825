use crate::record::{SliceId, TransactionRecord};
use std::collections::HashMap;

/// An owned table of transaction records, the input of every analysis.
///
/// The [`Dataset`] does not interpret its rows; it only owns them and hands
/// out per-slice groups. Groups come back in first-seen order — the order
/// slice identifiers first appear in the table — so reports are stable for
/// a given input file. Every statistic computed downstream is
/// order-insensitive within a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<TransactionRecord>,
}

/// One slice's rows, borrowed from a [`Dataset`].
#[derive(Debug, Clone)]
pub struct SliceGroup<'a> {
    /// The slice identifier shared by all records of the group.
    pub id: &'a SliceId,
    /// The group's records; never empty.
    pub records: Vec<&'a TransactionRecord>,
}

impl Dataset {
    /// create a dataset from a list of records.
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    /// all records, in table order.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    /// number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// the distinct slice identifiers, in first-seen order.
    pub fn slice_ids(&self) -> Vec<&SliceId> {
        self.group_by_slice().into_iter().map(|g| g.id).collect()
    }

    /// group the records by slice, in first-seen order.
    ///
    /// Every returned group holds at least one record.
    ///
    /// ```
    /// # use slicescope_core::{Dataset, generate::{self, GeneratorConfig}};
    /// let dataset = generate::generate(&GeneratorConfig::default());
    /// let groups = dataset.group_by_slice();
    /// assert!(groups.iter().all(|group| !group.records.is_empty()));
    /// ```
    pub fn group_by_slice(&self) -> Vec<SliceGroup<'_>> {
        let mut groups: Vec<SliceGroup<'_>> = Vec::new();
        let mut index: HashMap<&SliceId, usize> = HashMap::new();

        for record in &self.records {
            match index.get(&record.slice) {
                Some(at) => groups[*at].records.push(record),
                None => {
                    index.insert(&record.slice, groups.len());
                    groups.push(SliceGroup {
                        id: &record.slice,
                        records: vec![record],
                    });
                }
            }
        }

        groups
    }
}
