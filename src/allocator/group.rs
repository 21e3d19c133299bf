use std::collections::HashMap;

/// How an equipment name was resolved to an ID within a point group.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Resolution {
    /// Same name as the previous named equipment; its ID is reused.
    Adjacent,
    /// Name seen earlier in the group with other equipment in between; its ID is reused.
    Revisited,
    /// First appearance of the name; a new ID was allocated.
    Allocated,
    /// Adjacent repeat whose ID was missing from the name map; a new ID was allocated.
    Remapped,
}

/// Allocation state of one point group, from a boundary to the next.
/// A fresh instance is built at every boundary; nothing is cleared in place.
#[derive(Debug)]
pub(crate) struct PointGroup {
    point_id: String,
    equipment_counter: usize,
    equipment_ids: HashMap<String, String>,
    last_equipment_name: Option<String>,
    item_counters: HashMap<String, usize>,
}

impl PointGroup {
    pub(crate) fn open(point_id: String) -> Self {
        Self {
            point_id,
            equipment_counter: 0,
            equipment_ids: HashMap::new(),
            last_equipment_name: None,
            item_counters: HashMap::new(),
        }
    }

    pub(crate) fn point_id(&self) -> &str {
        &self.point_id
    }

    /// Number of equipment IDs allocated so far, orphan placeholders included.
    pub(crate) fn equipment_count(&self) -> usize {
        self.equipment_counter
    }

    fn next_equipment_id(&mut self) -> String {
        self.equipment_counter += 1;
        format!("{}E{:02}", self.point_id, self.equipment_counter)
    }

    /// Maps an equipment name to its ID: adjacency first, then the whole group
    /// history, otherwise a new ID. The name becomes the last equipment name.
    pub(crate) fn resolve_equipment(&mut self, name: &str) -> (String, Resolution) {
        let adjacent = self.last_equipment_name.as_deref() == Some(name);
        let (equipment_id, resolution) = match self.equipment_ids.get(name).cloned() {
            Some(equipment_id) if adjacent => (equipment_id, Resolution::Adjacent),
            Some(equipment_id) => (equipment_id, Resolution::Revisited),
            None => {
                let equipment_id = self.next_equipment_id();
                self.equipment_ids.insert(name.to_owned(), equipment_id.to_owned());
                let resolution = if adjacent { Resolution::Remapped } else { Resolution::Allocated };
                (equipment_id, resolution)
            }
        };
        self.last_equipment_name = Some(name.to_owned());
        self.item_counters.entry(equipment_id.to_owned()).or_insert(0);
        (equipment_id, resolution)
    }

    /// ID of the most recently named equipment, for rows that only list an item.
    pub(crate) fn inherited_equipment(&self) -> Option<String> {
        let name = self.last_equipment_name.as_ref()?;
        self.equipment_ids.get(name).cloned()
    }

    /// Allocates an isolated equipment ID for an item with no equipment context.
    /// The ID is not bound to any name, so the next orphan gets its own.
    pub(crate) fn orphan_equipment(&mut self) -> String {
        let equipment_id = self.next_equipment_id();
        self.item_counters.insert(equipment_id.to_owned(), 0);
        equipment_id
    }

    /// Next item ID under an equipment, numbered from `I01`.
    pub(crate) fn next_item_id(&mut self, equipment_id: &str) -> String {
        let counter = self.item_counters.entry(equipment_id.to_owned()).or_insert(0);
        *counter += 1;
        format!("{}I{:02}", equipment_id, counter)
    }
}
