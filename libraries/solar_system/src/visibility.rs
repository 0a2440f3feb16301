//! Which scene entities take part in the scene for a given focus.

use crate::registry::BodyId;
use bevy::prelude::*;

/// How a scene entity relates to the bodies, for the purpose of focus filtering.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Component, Reflect)]
#[reflect(Component)]
pub enum SceneMember {
    /// The background starfield. Always shown.
    Starfield,
    /// A body itself.
    Body(BodyId),
    /// A decoration parented to a body, such as a ring.
    AttachedTo(BodyId),
    /// Anything else (orbit guides). Shown only when nothing is focused.
    Detached,
}

/// Participation flag written next to [`Visibility`]; hidden entities are also
/// excluded from picking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Component, Reflect)]
#[reflect(Component)]
pub struct SceneEnabled(pub bool);

impl Default for SceneEnabled {
    fn default() -> Self {
        Self(true)
    }
}

/// Whether `member` is enabled while `focus` is selected.
pub fn is_enabled(member: SceneMember, focus: Option<BodyId>) -> bool {
    match (member, focus) {
        (SceneMember::Starfield, _) => true,
        (_, None) => true,
        (SceneMember::Body(id) | SceneMember::AttachedTo(id), Some(focus)) => id == focus,
        (SceneMember::Detached, Some(_)) => false,
    }
}

/// Evaluates the policy for every entity.
pub fn evaluate<K>(
    members: impl IntoIterator<Item = (K, SceneMember)>,
    focus: Option<BodyId>,
) -> impl Iterator<Item = (K, bool)> {
    members
        .into_iter()
        .map(move |(key, member)| (key, is_enabled(member, focus)))
}

/// Writes one policy result to both flags so they never disagree.
pub fn apply(enabled: bool, visibility: &mut Visibility, scene_enabled: &mut SceneEnabled) {
    *visibility = if enabled {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    scene_enabled.0 = enabled;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::small_registry;

    fn members() -> Vec<(&'static str, SceneMember)> {
        let registry = small_registry();
        let earth = registry.lookup("Earth").unwrap();
        let saturn = registry.lookup("Saturn").unwrap();
        vec![
            ("stars", SceneMember::Starfield),
            ("Sun", SceneMember::Body(registry.star_id())),
            ("Earth", SceneMember::Body(earth)),
            ("Saturn", SceneMember::Body(saturn)),
            ("Saturn Rings", SceneMember::AttachedTo(saturn)),
            ("orbit_Earth", SceneMember::Detached),
        ]
    }

    fn enabled_names(focus: Option<BodyId>) -> Vec<&'static str> {
        evaluate(members(), focus)
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn unfocused_enables_everything() {
        assert!(evaluate(members(), None).all(|(_, enabled)| enabled));
    }

    #[test]
    fn focus_keeps_body_and_its_decorations() {
        let registry = small_registry();
        let saturn = registry.lookup("Saturn").unwrap();
        assert_eq!(
            enabled_names(Some(saturn)),
            ["stars", "Saturn", "Saturn Rings"]
        );
        let earth = registry.lookup("Earth").unwrap();
        assert_eq!(enabled_names(Some(earth)), ["stars", "Earth"]);
        assert_eq!(
            enabled_names(Some(registry.star_id())),
            ["stars", "Sun"]
        );
    }

    #[test]
    fn starfield_is_enabled_for_every_focus() {
        let registry = small_registry();
        let focuses = std::iter::once(None).chain(registry.iter().map(|(id, _)| Some(id)));
        for focus in focuses {
            assert!(is_enabled(SceneMember::Starfield, focus));
        }
    }

    #[test]
    fn apply_keeps_flags_consistent() {
        let mut visibility = Visibility::Visible;
        let mut enabled = SceneEnabled::default();
        for flag in [false, true, false, false, true] {
            apply(flag, &mut visibility, &mut enabled);
            assert_eq!(enabled.0, flag);
            assert_eq!(visibility != Visibility::Hidden, flag);
        }
    }
}
