use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Faction {
    Horde,
    Alliance,
}

/// The game versions a guild can play on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum WowVersion {
    Vanilla,
    #[serde(rename = "TBC")]
    Tbc,
    #[serde(rename = "WotLK")]
    Wotlk,
    Cataclysm,
    #[serde(rename = "MoP")]
    Mop,
    #[serde(rename = "WoD")]
    Wod,
    Legion,
    #[serde(rename = "BFA")]
    Bfa,
    Shadowlands,
    Dragonflight,
    #[serde(rename = "The War Within")]
    TheWarWithin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum WowClass {
    Warrior,
    Paladin,
    Hunter,
    Rogue,
    Priest,
    #[serde(rename = "Death Knight")]
    DeathKnight,
    Shaman,
    Mage,
    Warlock,
    Monk,
    Druid,
    #[serde(rename = "Demon Hunter")]
    DemonHunter,
    Evoker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Tank,
    Heal,
    #[serde(rename = "DPS")]
    Dps,
}

/// The kind of entry shown on the shared calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EventType {
    Raid,
    Donjon,
    #[serde(rename = "Event guilde")]
    GuildEvent,
    #[serde(rename = "Buff world")]
    WorldBuff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RaidStatus {
    Planned,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemQuality {
    Poor,
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// The one-time guild setup document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildConfig {
    pub name: String,
    pub faction: Faction,
    pub version: WowVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub setup_complete: bool,
}

impl Default for GuildConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            faction: Faction::Horde,
            version: WowVersion::Vanilla,
            description: None,
            setup_complete: false,
        }
    }
}

/// The guild profile document. The distribution fields are placeholders at
/// rest; the live values are derived from the roster when the profile is
/// served.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuildInfo {
    pub name: String,
    pub description: String,
    pub faction: Faction,
    pub version: WowVersion,
    pub member_count: usize,
    #[schema(value_type = Object)]
    pub class_distribution: BTreeMap<WowClass, usize>,
    #[schema(value_type = Object)]
    pub role_distribution: BTreeMap<Role, usize>,
}

impl Default for GuildInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            faction: Faction::Horde,
            version: WowVersion::Vanilla,
            member_count: 0,
            class_distribution: BTreeMap::new(),
            role_distribution: BTreeMap::new(),
        }
    }
}

/// A guild roster member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub class: WowClass,
    pub race: String,
    pub faction: Faction,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raid_attendance: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An entry on the shared calendar. Entries mirrored from a raid carry the
/// raid id so they can be removed together with it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raid_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RaidComposition {
    pub tanks: Vec<String>,
    pub healers: Vec<String>,
    pub dps: Vec<String>,
}

/// A scheduled raid.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Raid {
    pub id: String,
    pub name: String,
    pub instance: String,
    pub date: String,
    pub time: String,
    pub version: WowVersion,
    pub size: u32,
    pub status: RaidStatus,
    pub participants: Vec<String>,
    pub composition: RaidComposition,
}

/// A scheduled dungeon run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dungeon {
    pub id: String,
    pub name: String,
    pub instance: String,
    pub date: String,
    pub time: String,
    pub participants: Vec<String>,
}

/// A piece of loot assigned to a member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loot {
    pub id: String,
    pub item_name: String,
    pub quality: ItemQuality,
    pub raid_id: String,
    pub boss: String,
    pub assigned_to: String,
    pub date: DateTime<Utc>,
}

/// One record of the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub username: String,
    pub action: String,
    pub description: String,
    #[schema(value_type = Object)]
    pub details: Value,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn enums_keep_their_wire_names() {
        let json = serde_json::to_value(WowClass::DeathKnight).unwrap();
        assert_eq!(json, "Death Knight");

        let json = serde_json::to_value(Role::Dps).unwrap();
        assert_eq!(json, "DPS");

        let json = serde_json::to_value(RaidStatus::Planned).unwrap();
        assert_eq!(json, "planned");

        let version: WowVersion = serde_json::from_str("\"The War Within\"").unwrap();
        assert_eq!(version, WowVersion::TheWarWithin);
    }

    #[test]
    fn member_omits_absent_optionals() {
        let member = Member {
            id: "1".into(),
            name: "Thrall".into(),
            class: WowClass::Shaman,
            race: "Orc".into(),
            faction: Faction::Horde,
            role: Role::Heal,
            professions: None,
            specialization: None,
            raid_attendance: None,
            notes: None,
        };

        let json = serde_json::to_value(&member).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("professions"));
        assert!(!object.contains_key("notes"));
    }

    #[test]
    fn config_defaults_to_incomplete_setup() {
        let config = GuildConfig::default();

        assert_eq!(config.faction, Faction::Horde);
        assert_eq!(config.version, WowVersion::Vanilla);
        assert!(!config.setup_complete);
    }
}
