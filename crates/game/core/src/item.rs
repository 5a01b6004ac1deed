//! Item record.

use crate::adventurer::AdventurerId;

pub type ItemId = u64;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct Item {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub id: ItemId,
    /// Item name, e.g. "Katana".
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub item: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub slot: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "type", deserialize_with = "crate::de::null_as_default")
    )]
    pub kind: String,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub tier: u8,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub greatness: u8,
    #[cfg_attr(feature = "serde", serde(deserialize_with = "crate::de::null_as_default"))]
    pub xp: u32,
    pub special1: Option<String>,
    pub special2: Option<String>,
    pub special3: Option<String>,
    pub equipped_adventurer_id: Option<AdventurerId>,
}

impl Item {
    /// Name with its prefixes, e.g. `"Agony Bane" Katana of Power`.
    pub fn display_name(&self) -> String {
        let mut name = String::new();
        let prefix = [self.special2.as_deref(), self.special3.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>();

        if !prefix.is_empty() {
            name.push('"');
            name.push_str(&prefix.join(" "));
            name.push_str("\" ");
        }
        name.push_str(&self.item);

        if let Some(suffix) = self.special1.as_deref().filter(|s| !s.trim().is_empty()) {
            name.push(' ');
            name.push_str(suffix);
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_includes_only_present_specials() {
        let plain = Item {
            item: "Club".into(),
            ..Item::default()
        };
        assert_eq!(plain.display_name(), "Club");

        let named = Item {
            item: "Katana".into(),
            special1: Some("of Power".into()),
            special2: Some("Agony".into()),
            special3: Some("Bane".into()),
            ..Item::default()
        };
        assert_eq!(named.display_name(), "\"Agony Bane\" Katana of Power");
    }
}
