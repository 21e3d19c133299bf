//! # Hierarchical ID allocation
//!
//! Rows are read top to bottom. Blank rows split the stream into point
//! groups; each group gets a point ID `{prefix}-P{nn}`, each distinct
//! equipment name inside it an equipment ID `{point}E{nn}`, and each item an
//! item ID `{equipment}I{nn}`. State never crosses a blank row.
//!
//! Irregular rows are never rejected. Each anomaly has a fallback, reported
//! as a [`Recovery`] next to the annotated rows.
use crate::allocator::group::PointGroup;
use crate::allocator::group::Resolution;
use std::fmt::Display;

mod group;

/// One table row: the names read from the sheet and the IDs derived for them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    /// Raw point column text; usually empty, or a point ID from an earlier run
    pub point_name: String,
    pub equipment_name: String,
    pub item_name: String,
    pub point_id: Option<String>,
    pub equipment_id: Option<String>,
    pub item_id: Option<String>,
}

impl Row {
    /// Creates a row with no derived IDs.
    pub fn new(point_name: &str, equipment_name: &str, item_name: &str) -> Self {
        Self {
            point_name: point_name.to_owned(),
            equipment_name: equipment_name.to_owned(),
            item_name: item_name.to_owned(),
            ..Self::default()
        }
    }

    /// A row whose point, equipment and item text are all empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.point_name.trim().is_empty()
            && self.equipment_name.trim().is_empty()
            && self.item_name.trim().is_empty()
    }
}

/// A soft inconsistency met during allocation and the fallback that was applied.
/// `row` is the zero-based position of the row in the input sequence.
#[derive(Clone, Debug, PartialEq)]
pub enum Recovery {
    /// An adjacent repeat of an equipment name had no ID on record; a new ID was allocated.
    MissingMapping {
        row: usize,
        equipment_name: String,
        equipment_id: String,
    },
    /// An item appeared with no equipment context; a placeholder equipment ID was allocated.
    OrphanItem {
        row: usize,
        item_name: String,
        equipment_id: String,
    },
    /// The point column held a value other than the current point ID; a new point group was started.
    PointValueConflict {
        row: usize,
        found: String,
        expected: String,
        point_id: String,
    },
}

impl Recovery {
    pub fn row(&self) -> usize {
        match self {
            Recovery::MissingMapping { row, .. }
            | Recovery::OrphanItem { row, .. }
            | Recovery::PointValueConflict { row, .. } => *row,
        }
    }
}

impl Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recovery::MissingMapping { row, equipment_name, equipment_id } => write!(
                f,
                "row {row}: equipment '{equipment_name}' repeated without a recorded ID, allocated {equipment_id}"
            ),
            Recovery::OrphanItem { row, item_name, equipment_id } => write!(
                f,
                "row {row}: item '{item_name}' has no equipment, allocated placeholder {equipment_id}"
            ),
            Recovery::PointValueConflict { row, found, expected, point_id } => write!(
                f,
                "row {row}: point value '{found}' differs from '{expected}', started {point_id}"
            ),
        }
    }
}

/// Result of a full allocation pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Allocation {
    /// Input rows with derived IDs filled in, same order and length as the input
    pub rows: Vec<Row>,
    /// Fallbacks applied during the pass, in row order
    pub recoveries: Vec<Recovery>,
    /// Number of point IDs allocated
    pub point_count: usize,
}

/// Single-pass allocator. Feed rows in table order with [`IdAllocator::assign`].
#[derive(Debug)]
pub struct IdAllocator {
    prefix: String,
    point_counter: usize,
    group: Option<PointGroup>,
    recoveries: Vec<Recovery>,
    rows_seen: usize,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            point_counter: 0,
            group: None,
            recoveries: Vec::new(),
            rows_seen: 0,
        }
    }

    /// Number of point IDs allocated so far.
    pub fn point_count(&self) -> usize {
        self.point_counter
    }

    /// Derives the IDs of the next row. Must be called in table order.
    pub fn assign(&mut self, mut row: Row) -> Row {
        let index = self.rows_seen;
        self.rows_seen += 1;

        if row.is_blank() {
            self.close_group();
            return row;
        }

        self.allocate_point(index, row.point_name.trim());
        let Some(group) = self.group.as_mut() else {
            return row;
        };
        row.point_id = Some(group.point_id().to_owned());

        let equipment_name = row.equipment_name.trim();
        let mut equipment_id = if equipment_name.is_empty() {
            group.inherited_equipment()
        } else {
            let (equipment_id, resolution) = group.resolve_equipment(equipment_name);
            if resolution == Resolution::Remapped {
                record(&mut self.recoveries, Recovery::MissingMapping {
                    row: index,
                    equipment_name: equipment_name.to_owned(),
                    equipment_id: equipment_id.to_owned(),
                });
            }
            Some(equipment_id)
        };

        let item_name = row.item_name.trim();
        if !item_name.is_empty() {
            let owner = match equipment_id.take() {
                Some(owner) => owner,
                None => {
                    let owner = group.orphan_equipment();
                    record(&mut self.recoveries, Recovery::OrphanItem {
                        row: index,
                        item_name: item_name.to_owned(),
                        equipment_id: owner.to_owned(),
                    });
                    owner
                }
            };
            row.item_id = Some(group.next_item_id(&owner));
            equipment_id = Some(owner);
        }
        row.equipment_id = equipment_id;
        row
    }

    /// Returns the recoveries collected over the pass.
    pub fn finish(mut self) -> Vec<Recovery> {
        self.close_group();
        self.recoveries
    }

    /// Opens a new group when none is active or when the point column
    /// disagrees with the active group's ID.
    fn allocate_point(&mut self, index: usize, point: &str) {
        let expected = match &self.group {
            None => None,
            Some(group) if point.is_empty() || point == group.point_id() => return,
            Some(group) => Some(group.point_id().to_owned()),
        };
        self.close_group();
        let point_id = self.open_group();
        if let Some(expected) = expected {
            record(&mut self.recoveries, Recovery::PointValueConflict {
                row: index,
                found: point.to_owned(),
                expected,
                point_id,
            });
        }
    }

    fn open_group(&mut self) -> String {
        self.point_counter += 1;
        let point_id = format!("{}-P{:02}", self.prefix, self.point_counter);
        log::debug!("opened point group {point_id}");
        self.group = Some(PointGroup::open(point_id.to_owned()));
        point_id
    }

    fn close_group(&mut self) {
        if let Some(group) = self.group.take() {
            log::debug!("closed point group {} with {} equipment", group.point_id(), group.equipment_count());
        }
    }
}

fn record(recoveries: &mut Vec<Recovery>, recovery: Recovery) {
    log::warn!("{recovery}");
    recoveries.push(recovery);
}

/// Runs a complete pass over `rows` with the given point ID prefix.
pub fn allocate(prefix: &str, rows: impl IntoIterator<Item = Row>) -> Allocation {
    let mut allocator = IdAllocator::new(prefix);
    let rows = rows.into_iter().map(|row| allocator.assign(row)).collect::<Vec<_>>();
    let point_count = allocator.point_count();
    Allocation {
        rows,
        recoveries: allocator.finish(),
        point_count,
    }
}
