//! # Patrol Sheet
//!
//! Assigns hierarchical IDs to inspection route sheets and derives the
//! reference tables an inspection system loads from them.
//!
//! ## Features
//!
//! - **Hierarchical IDs**: point `{prefix}-P01`, equipment `{point}E01`, item
//!   `{equipment}I01`, allocated top to bottom with blank rows as point
//!   boundaries
//! - **Soft recovery**: irregular rows are annotated with a fallback and
//!   reported, never rejected
//! - **Stable re-runs**: annotating an annotated sheet gives the same IDs
//! - **Workbook I/O**: reads `.xlsx` worksheets, writes annotated workbooks
//! - **Reference tables**: `points`, `equipments`, `check_items` and
//!   `equipment_status` CSV files
//! - **Integrity checks**: dangling references and duplicate keys across the
//!   reference tables
//!
//! ## Workflow
//!
//! ```no_run
//! use patrol_sheet::annotate::{annotate_workbook, AllocationCriteria};
//! use patrol_sheet::projection::write_reference_tables;
//! use patrol_sheet::verify::verify_dir;
//!
//! let criteria = AllocationCriteria::new("QH2-O");
//! let annotation = annotate_workbook("data.xlsx", "checkitems.xlsx", &criteria)?;
//! write_reference_tables("csv", &annotation.table, &criteria.layout)?;
//! println!("{}", verify_dir("csv"));
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod allocator;
pub mod annotate;
mod error;
mod helpers;
pub mod layout;
pub mod projection;
pub mod spreadsheet;
pub mod table;
pub mod verify;

pub use crate::allocator::allocate;
pub use crate::allocator::IdAllocator;
pub use crate::allocator::Recovery;
pub use crate::allocator::Row;
pub use crate::error::PatrolSheetError;
pub use crate::layout::Layout;
pub use crate::table::Table;
