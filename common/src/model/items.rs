use serde::{Deserialize, Serialize};

/// Canonical item names read from the `Item_Master` tab, used by the counting
/// form for autocomplete.
///
/// The list is read fresh on every request and keeps the order of the sheet.
/// An empty list is also what clients receive when the sheet could not be read.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ItemList {
    pub items: Vec<String>,
}
