//! Reference tables derived from an annotated sheet.

use crate::layout::Layout;
use crate::spreadsheet::delimited::write_csv;
use crate::table::Table;
use anyhow::Context;
use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Status every equipment starts with.
pub const DEFAULT_STATUS: &str = "RUNNING";

/// One row per distinct equipment ID, first occurrence wins.
/// Header: `equipmentId, equipmentName, pointId`.
pub fn unique_equipments(sheet: &Table, layout: &Layout) -> Table {
    let mut table = Table::new("equipments", &["equipmentId", "equipmentName", "pointId"]);
    let mut seen = HashSet::new();
    for row in 0..sheet.len() {
        let equipment_id = sheet.cell(row, layout.equipment_id).trim();
        if equipment_id.is_empty() || !seen.insert(equipment_id) {
            continue;
        }
        table.push([
            equipment_id,
            sheet.cell(row, layout.equipment_name).trim(),
            sheet.cell(row, layout.point).trim(),
        ]);
    }
    table
}

/// One row per distinct point ID of an equipment table.
/// Header: `pointId, routeId`.
pub fn unique_points(equipments: &Table) -> Table {
    let suffix = Regex::new(r"-P\d{2}$").expect("Hardcode regex pattern");
    let mut table = Table::new("points", &["pointId", "routeId"]);
    let Some(points) = equipments.column("pointId") else {
        return table;
    };
    let mut seen = HashSet::new();
    for point_id in points.map(str::trim) {
        if point_id.is_empty() || !seen.insert(point_id) {
            continue;
        }
        table.push([point_id.to_owned(), suffix.replace(point_id, "").into_owned()]);
    }
    table
}

/// One row per sheet row carrying an item ID.
/// Header: `itemId, itemName, equipmentId`.
pub fn check_items(sheet: &Table, layout: &Layout) -> Table {
    let mut table = Table::new("check_items", &["itemId", "itemName", "equipmentId"]);
    for row in 0..sheet.len() {
        let item_id = sheet.cell(row, layout.item_id).trim();
        if item_id.is_empty() {
            continue;
        }
        table.push([
            item_id,
            sheet.cell(row, layout.item_name).trim(),
            sheet.cell(row, layout.equipment_id).trim(),
        ]);
    }
    table
}

/// Seeds a status row for every equipment.
/// Header: `equipmentId, status`.
pub fn equipment_status(equipments: &Table, status: &str) -> Table {
    let mut table = Table::new("equipment_status", &["equipmentId", "status"]);
    if let Some(ids) = equipments.column("equipmentId") {
        for equipment_id in ids.filter(|id| !id.trim().is_empty()) {
            table.push([equipment_id, status]);
        }
    }
    table
}

/// The four reference tables of one annotated sheet.
#[derive(Clone, Debug)]
pub struct ReferenceTables {
    pub points: Table,
    pub equipments: Table,
    pub check_items: Table,
    pub equipment_status: Table,
}

impl ReferenceTables {
    pub fn from_sheet(sheet: &Table, layout: &Layout) -> Self {
        let equipments = unique_equipments(sheet, layout);
        Self {
            points: unique_points(&equipments),
            check_items: check_items(sheet, layout),
            equipment_status: equipment_status(&equipments, DEFAULT_STATUS),
            equipments,
        }
    }

    fn tables(&self) -> [&Table; 4] {
        [&self.points, &self.equipments, &self.check_items, &self.equipment_status]
    }
}

/// Projects an annotated sheet and writes `points.csv`, `equipments.csv`,
/// `check_items.csv` and `equipment_status.csv` into `dir`.
pub fn write_reference_tables(dir: impl AsRef<Path>, sheet: &Table, layout: &Layout) -> Result<ReferenceTables> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let tables = ReferenceTables::from_sheet(sheet, layout);
    for table in tables.tables() {
        let path = dir.join(format!("{}.csv", table.name));
        write_csv(table, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(tables)
}
