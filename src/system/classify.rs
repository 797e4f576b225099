use crate::system::description::{ExoType, SpatialRecord, Subsystem, SystemDescription};
use crate::system::error::{DescriptionError, DescriptionResult};
use log::{debug, warn};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ClassifiedSystem {
    pub star: Vec<SpatialRecord>,
    pub planet: Vec<SpatialRecord>,
    pub satellite: Vec<SpatialRecord>,
    pub rings: Vec<SpatialRecord>,
}

impl ClassifiedSystem {
    pub fn of_type(&self, exo_type: ExoType) -> &[SpatialRecord] {
        match exo_type {
            ExoType::Star => &self.star,
            ExoType::Planet => &self.planet,
            ExoType::Satellite => &self.satellite,
            ExoType::Rings => &self.rings,
        }
    }

    fn of_type_mut(&mut self, exo_type: ExoType) -> &mut Vec<SpatialRecord> {
        match exo_type {
            ExoType::Star => &mut self.star,
            ExoType::Planet => &mut self.planet,
            ExoType::Satellite => &mut self.satellite,
            ExoType::Rings => &mut self.rings,
        }
    }

    pub fn len(&self) -> usize {
        ExoType::ALL.iter().map(|t| self.of_type(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
struct GroupMembers {
    planets: Vec<usize>,
    attached: Vec<(ExoType, usize)>,
}

pub fn classify_system(
    desc: &SystemDescription,
    root: &str,
) -> DescriptionResult<ClassifiedSystem> {
    let group = desc
        .subsystem(root)
        .ok_or_else(|| DescriptionError::UnknownRoot(root.to_string()))?;

    let mut out = ClassifiedSystem::default();
    let mut path = Vec::new();
    classify_group(desc, group, &mut out, &mut path)?;
    Ok(out)
}

pub fn classify_from_root(desc: &SystemDescription) -> DescriptionResult<ClassifiedSystem> {
    let root = desc.root().ok_or(DescriptionError::EmptyHierarchy)?;
    classify_system(desc, &root.name)
}

fn classify_group<'a>(
    desc: &'a SystemDescription,
    group: &'a Subsystem,
    out: &mut ClassifiedSystem,
    path: &mut Vec<&'a str>,
) -> DescriptionResult<()> {
    if path.contains(&group.name.as_str()) {
        return Err(DescriptionError::CyclicHierarchy(group.name.clone()));
    }
    path.push(&group.name);

    let mut members = GroupMembers::default();
    for name in &group.members {
        // Objects shadow subsystems of the same name.
        if let Some(record) = desc.object(name) {
            let list = out.of_type_mut(record.exo_type);
            list.push(record.clone());
            let idx = list.len() - 1;
            match record.exo_type {
                ExoType::Planet => members.planets.push(idx),
                t if t.is_attached() => members.attached.push((t, idx)),
                _ => {}
            }
        } else if let Some(inner) = desc.subsystem(name) {
            classify_group(desc, inner, out, path)?;
        } else {
            return Err(DescriptionError::UnresolvedReference {
                name: name.clone(),
                subsystem: group.name.clone(),
            });
        }
    }

    if !members.attached.is_empty() {
        let planet_idx = *members
            .planets
            .first()
            .ok_or_else(|| DescriptionError::MissingParentPlanet(group.name.clone()))?;
        if members.planets.len() > 1 {
            warn!(
                "subsystem {} holds {} planets, attaching to the first",
                group.name,
                members.planets.len()
            );
        }

        let parent = out.planet[planet_idx].name.clone();
        for (exo_type, idx) in members.attached {
            out.of_type_mut(exo_type)[idx].parent_name = Some(parent.clone());
        }
    }

    debug!(
        "classified subsystem {} ({} members)",
        group.name,
        group.members.len()
    );
    path.pop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> SystemDescription {
        SystemDescription::from_value(&json!({
            "system": [
                { "name": "a", "exo_type": "planet" },
                { "name": "aa1", "exo_type": "satellite" },
                { "name": "aa2", "exo_type": "satellite" },
                { "name": "b", "exo_type": "planet" },
                { "name": "bb", "exo_type": "ring" },
                { "name": "s", "exo_type": "star" }
            ],
            "hierarchy": [
                { "gs1": ["a", "aa1", "aa2"] },
                { "gs2": ["b", "bb"] },
                { "gs3": ["gs1", "gs2", "s"] }
            ]
        }))
        .unwrap()
    }

    fn names(records: &[SpatialRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn satellites_and_rings_find_their_planet() {
        let system = classify_system(&sample(), "gs3").unwrap();

        assert_eq!(names(&system.star), ["s"]);
        assert_eq!(names(&system.planet), ["a", "b"]);
        assert_eq!(names(&system.satellite), ["aa1", "aa2"]);
        assert_eq!(names(&system.rings), ["bb"]);

        for satellite in &system.satellite {
            assert_eq!(satellite.parent_name.as_deref(), Some("a"));
        }
        assert_eq!(system.rings[0].parent_name.as_deref(), Some("b"));
        assert!(system.planet.iter().all(|p| p.parent_name.is_none()));
        assert_eq!(system.len(), 6);
    }

    #[test]
    fn classification_is_repeatable_and_leaves_input_alone() {
        let desc = sample();
        let before = desc.clone();

        let first = classify_from_root(&desc).unwrap();
        let second = classify_from_root(&desc).unwrap();

        assert_eq!(first, second);
        assert_eq!(desc, before);
        assert!(desc.object("aa1").unwrap().parent_name.is_none());
    }

    #[test]
    fn classifying_a_leaf_group_only_sees_its_members() {
        let system = classify_system(&sample(), "gs2").unwrap();
        assert!(system.star.is_empty());
        assert_eq!(names(&system.planet), ["b"]);
        assert_eq!(system.of_type(ExoType::Rings).len(), 1);
    }

    #[test]
    fn unresolved_names_are_errors() {
        let desc = SystemDescription::new(
            [SpatialRecord::new("s", ExoType::Star)],
            [Subsystem::new("root", ["s", "ghost"])],
        );
        let err = classify_from_root(&desc).unwrap_err();
        assert!(matches!(
            err,
            DescriptionError::UnresolvedReference { ref name, ref subsystem }
                if name == "ghost" && subsystem == "root"
        ));

        assert!(matches!(
            classify_system(&desc, "nowhere"),
            Err(DescriptionError::UnknownRoot(_))
        ));
        assert!(matches!(
            classify_from_root(&SystemDescription::default()),
            Err(DescriptionError::EmptyHierarchy)
        ));
    }

    #[test]
    fn cycles_are_detected() {
        let desc = SystemDescription::new(
            [SpatialRecord::new("s", ExoType::Star)],
            [
                Subsystem::new("g1", ["g2"]),
                Subsystem::new("g2", ["g1", "s"]),
            ],
        );
        assert!(matches!(
            classify_from_root(&desc),
            Err(DescriptionError::CyclicHierarchy(_))
        ));
    }

    #[test]
    fn moons_without_planet_are_rejected() {
        let desc = SystemDescription::new(
            [
                SpatialRecord::new("s", ExoType::Star),
                SpatialRecord::new("m", ExoType::Satellite),
            ],
            [Subsystem::new("root", ["s", "m"])],
        );
        assert!(matches!(
            classify_from_root(&desc),
            Err(DescriptionError::MissingParentPlanet(ref g)) if g == "root"
        ));
    }

    #[test]
    fn a_group_reused_twice_is_listed_twice() {
        let desc = SystemDescription::new(
            [
                SpatialRecord::new("p", ExoType::Planet),
                SpatialRecord::new("m", ExoType::Satellite),
            ],
            [
                Subsystem::new("moon", ["p", "m"]),
                Subsystem::new("root", ["moon", "moon"]),
            ],
        );
        let system = classify_from_root(&desc).unwrap();
        assert_eq!(names(&system.satellite), ["m", "m"]);
        assert!(system
            .satellite
            .iter()
            .all(|s| s.parent_name.as_deref() == Some("p")));
    }
}
