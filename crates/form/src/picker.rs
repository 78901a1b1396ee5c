//! Multi-select over the speciality catalog.
//!
//! The picker holds no selection of its own. Every interaction returns the complete
//! desired selection, which the caller hands to
//! [`FormController::set_specialities`](crate::FormController::set_specialities).

use api_shared::SpecialitySelection;
use docdir_core::SpecialityCatalog;

/// One row of the picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickerOption<'a> {
    pub name: &'a str,
    pub checked: bool,
}

#[derive(Clone, Debug, Default)]
pub struct SpecialityPicker {
    catalog: SpecialityCatalog,
}

impl SpecialityPicker {
    pub fn new(catalog: SpecialityCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SpecialityCatalog {
        &self.catalog
    }

    /// Catalog entries in display order, each marked if currently selected.
    pub fn options<'a>(&'a self, selected: &SpecialitySelection) -> Vec<PickerOption<'a>> {
        self.catalog
            .names()
            .iter()
            .map(|name| PickerOption {
                name,
                checked: selected.contains(name),
            })
            .collect()
    }

    /// Returns the selection after clicking `name`.
    ///
    /// Selected entries are removed; unselected catalog entries are appended. Names outside
    /// the catalog leave the selection unchanged.
    pub fn toggle(&self, selected: &SpecialitySelection, name: &str) -> SpecialitySelection {
        if selected.contains(name) {
            return SpecialitySelection::new(selected.iter().filter(|s| *s != name));
        }
        if !self.catalog.contains(name) {
            return selected.clone();
        }
        SpecialitySelection::new(selected.iter().chain(std::iter::once(name)))
    }

    /// Text shown in the closed control.
    pub fn render_value(&self, selected: &SpecialitySelection) -> String {
        selected.display_label()
    }
}
