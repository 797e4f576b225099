use crate::celestial::orbit::OrbitParams;
use crate::system::error::{DescriptionError, DescriptionResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const OBJECTS_CATEGORY: &str = "system";
const HIERARCHY_CATEGORY: &str = "hierarchy";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExoType {
    Star,
    Planet,
    Satellite,
    #[serde(alias = "ring")]
    Rings,
}

impl ExoType {
    pub const ALL: [ExoType; 4] = [
        ExoType::Star,
        ExoType::Planet,
        ExoType::Satellite,
        ExoType::Rings,
    ];

    pub fn is_attached(self) -> bool {
        matches!(self, ExoType::Satellite | ExoType::Rings)
    }
}

/// One spatial object of a system file. Fields this crate does not read are
/// kept in `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialRecord {
    pub name: String,
    #[serde(rename = "exo_type")]
    pub exo_type: ExoType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory: Option<OrbitParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revolution_period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SpatialRecord {
    pub fn new(name: impl Into<String>, exo_type: ExoType) -> Self {
        Self {
            name: name.into(),
            exo_type,
            trajectory: None,
            diameter: None,
            temperature: None,
            revolution_period: None,
            parent_name: None,
            extra: Map::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Subsystem {
    pub name: String,
    pub members: Vec<String>,
}

impl Subsystem {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemDescription {
    objects: BTreeMap<String, SpatialRecord>,
    subsystems: Vec<Subsystem>,
}

impl SystemDescription {
    pub fn new(
        records: impl IntoIterator<Item = SpatialRecord>,
        subsystems: impl IntoIterator<Item = Subsystem>,
    ) -> Self {
        let mut desc = Self::default();
        for record in records {
            desc.objects.insert(record.name.clone(), record);
        }
        for subsystem in subsystems {
            desc.insert_subsystem(subsystem);
        }
        desc
    }

    pub fn from_json_str(json: &str) -> DescriptionResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> DescriptionResult<Self> {
        let root = value.as_object().ok_or(DescriptionError::NotAnObject)?;

        for category in [OBJECTS_CATEGORY, HIERARCHY_CATEGORY] {
            if !root.contains_key(category) {
                return Err(DescriptionError::MissingCategory(category));
            }
        }
        if let Some(other) = root
            .keys()
            .find(|k| *k != OBJECTS_CATEGORY && *k != HIERARCHY_CATEGORY)
        {
            return Err(DescriptionError::InvalidCategory(other.clone()));
        }

        let records = Vec::<SpatialRecord>::deserialize(&root[OBJECTS_CATEGORY])?;
        let entries = Vec::<Map<String, Value>>::deserialize(&root[HIERARCHY_CATEGORY])?;

        let mut subsystems = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut fields = entry.into_iter();
            let (name, members) = match (fields.next(), fields.next()) {
                (Some(only), None) => only,
                _ => {
                    return Err(DescriptionError::MalformedSubsystem(
                        "each hierarchy entry must hold exactly one subsystem".to_string(),
                    ))
                }
            };
            let members = Vec::<String>::deserialize(&members).map_err(|e| {
                DescriptionError::MalformedSubsystem(format!("`{name}`: {e}"))
            })?;
            subsystems.push(Subsystem { name, members });
        }

        Ok(Self::new(records, subsystems))
    }

    fn insert_subsystem(&mut self, subsystem: Subsystem) {
        // A repeated name replaces the members but keeps its original slot.
        match self.subsystems.iter_mut().find(|s| s.name == subsystem.name) {
            Some(existing) => existing.members = subsystem.members,
            None => self.subsystems.push(subsystem),
        }
    }

    pub fn object(&self, name: &str) -> Option<&SpatialRecord> {
        self.objects.get(name)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SpatialRecord> {
        self.objects.values()
    }

    pub fn subsystem(&self, name: &str) -> Option<&Subsystem> {
        self.subsystems.iter().find(|s| s.name == name)
    }

    pub fn subsystems(&self) -> &[Subsystem] {
        &self.subsystems
    }

    pub fn root(&self) -> Option<&Subsystem> {
        self.subsystems.last()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.subsystems.is_empty()
    }
}
