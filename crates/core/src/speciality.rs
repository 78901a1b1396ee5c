//! The fixed catalog of medical specialities a doctor can be listed under.

/// Names offered by the speciality picker, in display order.
pub const SPECIALITY_CATALOG: [&str; 8] = [
    "Alergologia",
    "Angiologia",
    "Buco maxilo",
    "Cardiologia clínca",
    "Cardiologia infantil",
    "Cirurgia cabeça e pescoço",
    "Cirurgia cardíaca",
    "Cirurgia de tórax",
];

/// An ordered catalog of speciality names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpecialityCatalog {
    names: Vec<String>,
}

impl SpecialityCatalog {
    /// The built-in catalog.
    pub fn standard() -> Self {
        Self::from_names(SPECIALITY_CATALOG)
    }

    /// Build a catalog from arbitrary names, dropping duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self { names: unique }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for SpecialityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
