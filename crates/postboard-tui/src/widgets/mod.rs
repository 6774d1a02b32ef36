pub mod dropdown;

pub use dropdown::{Dropdown, DropdownOutcome};
