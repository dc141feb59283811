use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use guildhall_core::{
    Dungeon, EventType, Faction, GuildConfig, GuildInfo, ItemQuality, Loot, Member, Raid,
    RaidComposition, RaidStatus, Role, WowClass, WowVersion,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;
use validator::Validate;

/// Json extractor that also runs the schema's validation rules.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extracted_json: Json<T> = Json::from_request(req, state)
            .await
            .map_err(|_| (StatusCode::BAD_REQUEST, "JSON parse failed"))?;

        extracted_json
            .0
            .validate()
            .map_err(|_| (StatusCode::BAD_REQUEST, "Request body is invalid"))?;

        Ok(Self(extracted_json.0))
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetupSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub faction: Faction,
    pub version: WowVersion,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
}

impl SetupSchema {
    pub fn into_config(self) -> GuildConfig {
        GuildConfig {
            name: self.name,
            faction: self.faction,
            version: self.version,
            description: self.description,
            setup_complete: true,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateGuildSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    pub faction: Option<Faction>,
    pub version: Option<WowVersion>,
}

impl UpdateGuildSchema {
    /// Merges the provided fields into the stored profile.
    pub fn apply(self, info: &mut GuildInfo) {
        if let Some(name) = self.name {
            info.name = name;
        }
        if let Some(description) = self.description {
            info.description = description;
        }
        if let Some(faction) = self.faction {
            info.faction = faction;
        }
        if let Some(version) = self.version {
            info.version = version;
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewMemberSchema {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    pub class: WowClass,
    #[validate(length(min = 1, max = 64))]
    pub race: String,
    pub faction: Faction,
    pub role: Role,
    pub professions: Option<Vec<String>>,
    #[validate(length(max = 64))]
    pub specialization: Option<String>,
    pub raid_attendance: Option<u32>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

impl NewMemberSchema {
    pub fn into_member(self, id: String) -> Member {
        Member {
            id,
            name: self.name,
            class: self.class,
            race: self.race,
            faction: self.faction,
            role: self.role,
            professions: self.professions,
            specialization: self.specialization,
            raid_attendance: self.raid_attendance,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMemberSchema {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,
    pub class: Option<WowClass>,
    #[validate(length(min = 1, max = 64))]
    pub race: Option<String>,
    pub faction: Option<Faction>,
    pub role: Option<Role>,
    pub professions: Option<Vec<String>>,
    #[validate(length(max = 64))]
    pub specialization: Option<String>,
    pub raid_attendance: Option<u32>,
    #[validate(length(max = 1024))]
    pub notes: Option<String>,
}

impl UpdateMemberSchema {
    /// Merges the provided fields into an existing member. The id is never
    /// touched.
    pub fn apply(self, member: &mut Member) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(class) = self.class {
            member.class = class;
        }
        if let Some(race) = self.race {
            member.race = race;
        }
        if let Some(faction) = self.faction {
            member.faction = faction;
        }
        if let Some(role) = self.role {
            member.role = role;
        }
        if let Some(professions) = self.professions {
            member.professions = Some(professions);
        }
        if let Some(specialization) = self.specialization {
            member.specialization = Some(specialization);
        }
        if let Some(raid_attendance) = self.raid_attendance {
            member.raid_attendance = Some(raid_attendance);
        }
        if let Some(notes) = self.notes {
            member.notes = Some(notes);
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewEventSchema {
    #[validate(length(min = 1, max = 128))]
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub date: String,
    pub time: Option<String>,
    #[validate(length(max = 1024))]
    pub description: Option<String>,
    pub raid_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewRaidSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub instance: String,
    pub date: String,
    pub time: String,
    pub version: WowVersion,
    pub size: u32,
    pub status: RaidStatus,
    pub participants: Option<Vec<String>>,
    pub composition: Option<RaidComposition>,
}

impl NewRaidSchema {
    pub fn into_raid(self, id: String) -> Raid {
        Raid {
            id,
            name: self.name,
            instance: self.instance,
            date: self.date,
            time: self.time,
            version: self.version,
            size: self.size,
            status: self.status,
            participants: self.participants.unwrap_or_default(),
            composition: self.composition.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateRaidSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub instance: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub version: Option<WowVersion>,
    pub size: Option<u32>,
    pub status: Option<RaidStatus>,
    pub participants: Option<Vec<String>>,
    pub composition: Option<RaidComposition>,
}

impl UpdateRaidSchema {
    pub fn apply(self, raid: &mut Raid) {
        if let Some(name) = self.name {
            raid.name = name;
        }
        if let Some(instance) = self.instance {
            raid.instance = instance;
        }
        if let Some(date) = self.date {
            raid.date = date;
        }
        if let Some(time) = self.time {
            raid.time = time;
        }
        if let Some(version) = self.version {
            raid.version = version;
        }
        if let Some(size) = self.size {
            raid.size = size;
        }
        if let Some(status) = self.status {
            raid.status = status;
        }
        if let Some(participants) = self.participants {
            raid.participants = participants;
        }
        if let Some(composition) = self.composition {
            raid.composition = composition;
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewDungeonSchema {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub instance: String,
    pub date: String,
    pub time: String,
    pub participants: Option<Vec<String>>,
}

impl NewDungeonSchema {
    pub fn into_dungeon(self, id: String) -> Dungeon {
        Dungeon {
            id,
            name: self.name,
            instance: self.instance,
            date: self.date,
            time: self.time,
            participants: self.participants.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewLootSchema {
    #[validate(length(min = 1, max = 128))]
    pub item_name: String,
    pub quality: ItemQuality,
    pub raid_id: String,
    #[validate(length(max = 128))]
    pub boss: String,
    pub assigned_to: String,
}

impl NewLootSchema {
    pub fn into_loot(self, id: String) -> Loot {
        Loot {
            id,
            item_name: self.item_name,
            quality: self.quality,
            raid_id: self.raid_id,
            boss: self.boss,
            assigned_to: self.assigned_to,
            date: chrono::Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateLootSchema {
    #[validate(length(min = 1, max = 128))]
    pub item_name: Option<String>,
    pub quality: Option<ItemQuality>,
    pub raid_id: Option<String>,
    #[validate(length(max = 128))]
    pub boss: Option<String>,
    pub assigned_to: Option<String>,
}

impl UpdateLootSchema {
    pub fn apply(self, loot: &mut Loot) {
        if let Some(item_name) = self.item_name {
            loot.item_name = item_name;
        }
        if let Some(quality) = self.quality {
            loot.quality = quality;
        }
        if let Some(raid_id) = self.raid_id {
            loot.raid_id = raid_id;
        }
        if let Some(boss) = self.boss {
            loot.boss = boss;
        }
        if let Some(assigned_to) = self.assigned_to {
            loot.assigned_to = assigned_to;
        }
    }
}
