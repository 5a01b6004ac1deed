//! Beast record and display-name composition.

pub type BeastId = u64;

/// Opposing combat entity. Health zero marks it defeated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Beast {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub id: BeastId,
    /// Base display name, e.g. "Balrog".
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub beast: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub health: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub tier: u8,
    pub special1: Option<String>,
    pub special2: Option<String>,
    pub special3: Option<String>,
}

impl Beast {
    pub fn null() -> Self {
        Self::default()
    }

    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    pub fn is_defeated(&self) -> bool {
        self.health == 0
    }

    /// Composite name from the base name and the two special parts.
    pub fn display_name(&self) -> String {
        compose_beast_name(
            &self.beast,
            self.special2.as_deref().unwrap_or_default(),
            self.special3.as_deref().unwrap_or_default(),
        )
    }
}

/// Compose a beast's display name.
///
/// The base name comes first, followed by every non-empty special part in
/// argument order, separated by single spaces.
///
/// ```
/// use survivor_core::compose_beast_name;
///
/// assert_eq!(compose_beast_name("Balrog", "", ""), "Balrog");
/// assert_eq!(compose_beast_name("Balrog", "of Flame", ""), "Balrog of Flame");
/// ```
pub fn compose_beast_name(base: &str, special2: &str, special3: &str) -> String {
    [base, special2, special3]
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
