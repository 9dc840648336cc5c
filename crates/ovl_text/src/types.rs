use derive_more::derive::{Constructor, Deref, DerefMut, IntoIterator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One localization record: a name, an optional integer and the text itself
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocalizationEntry {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub extra_int: Option<i64>,
    pub text: String,
}

/// Every localization record of an archive, in archive order
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut, IntoIterator)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
#[into_iterator(owned, ref)]
pub struct LocalizationTable(Vec<LocalizationEntry>);

impl FromIterator<LocalizationEntry> for LocalizationTable {
    fn from_iter<I: IntoIterator<Item = LocalizationEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
