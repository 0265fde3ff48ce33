//! Built-in catalog of breathing exercises.
//!
//! Each definition pairs the ordered phase sequence of an exercise with the
//! offset of the guide ball for every step of that sequence. Offsets are
//! indexed by step, not by phase name: the square exercise visits `hold`
//! twice and the ball sits in a different corner each time.

use crate::types::*;

/// A breathing exercise definition
#[derive(Clone, Debug)]
pub struct ExerciseDefinition {
    pub kind: ExerciseKind,
    pub name: &'static str,
    pub description: &'static str,
    pub phases: &'static [Phase],
    pub positions: &'static [Offset],
}

impl ExerciseDefinition {
    /// Ball offset for a step of this exercise's sequence
    pub fn position(&self, step_index: usize) -> Option<Offset> {
        self.positions.get(step_index).copied()
    }
}

/// The complete set of exercise definitions, one per kind
#[derive(Clone, Debug)]
pub struct Catalog {
    definitions: [ExerciseDefinition; 3],
}

static DEFAULT_CATALOG: Catalog = Catalog {
    definitions: [
        ExerciseDefinition {
            kind: ExerciseKind::Coherence,
            name: "Cardiac coherence",
            description: "Even inhale and exhale, the ball rises and falls",
            phases: &[Phase::Inspire, Phase::Expire],
            positions: &[Offset { x: 0, y: -80 }, Offset { x: 0, y: 80 }],
        },
        ExerciseDefinition {
            kind: ExerciseKind::Square,
            name: "Square breathing",
            description: "Inhale, hold, exhale, hold, the ball walks the corners",
            phases: &[Phase::Inspire, Phase::Hold, Phase::Expire, Phase::Hold],
            positions: &[
                Offset { x: 80, y: -80 },
                Offset { x: 80, y: 80 },
                Offset { x: -80, y: 80 },
                Offset { x: -80, y: -80 },
            ],
        },
        ExerciseDefinition {
            kind: ExerciseKind::Triangle,
            name: "Triangle breathing",
            description: "Inhale, hold, exhale around the three vertices",
            phases: &[Phase::Inspire, Phase::Hold, Phase::Expire],
            positions: &[
                Offset { x: 0, y: -100 },
                Offset { x: 87, y: 50 },
                Offset { x: -87, y: 50 },
            ],
        },
    ],
};

/// Get a reference to the built-in catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

impl Catalog {
    /// Definition for the given exercise kind
    pub fn definition(&self, kind: ExerciseKind) -> &ExerciseDefinition {
        &self.definitions[kind.index()]
    }

    /// Iterate over definitions in display order
    pub fn iter(&self) -> impl Iterator<Item = &ExerciseDefinition> {
        self.definitions.iter()
    }

    /// Check catalog consistency
    ///
    /// Returns a list of problems; empty when the catalog is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (idx, def) in self.definitions.iter().enumerate() {
            if def.kind.index() != idx {
                errors.push(format!(
                    "Definition '{}' stored in slot {} reserved for another kind",
                    def.kind, idx
                ));
            }

            if def.phases.is_empty() {
                errors.push(format!("Exercise '{}' has no phases", def.kind));
            }

            if def.positions.len() != def.phases.len() {
                errors.push(format!(
                    "Exercise '{}' has {} phases but {} ball positions",
                    def.kind,
                    def.phases.len(),
                    def.positions.len()
                ));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_validates() {
        let errors = get_default_catalog().validate();
        assert!(errors.is_empty(), "Catalog errors: {:?}", errors);
    }

    #[test]
    fn test_phase_sequences() {
        assert_eq!(
            ExerciseKind::Coherence.phases(),
            &[Phase::Inspire, Phase::Expire]
        );
        assert_eq!(
            ExerciseKind::Square.phases(),
            &[Phase::Inspire, Phase::Hold, Phase::Expire, Phase::Hold]
        );
        assert_eq!(
            ExerciseKind::Triangle.phases(),
            &[Phase::Inspire, Phase::Hold, Phase::Expire]
        );
    }

    #[test]
    fn test_square_holds_have_distinct_positions() {
        let square = get_default_catalog().definition(ExerciseKind::Square);

        assert_eq!(square.phases[1], Phase::Hold);
        assert_eq!(square.phases[3], Phase::Hold);
        assert_eq!(square.position(1), Some(Offset::new(80, 80)));
        assert_eq!(square.position(3), Some(Offset::new(-80, -80)));
    }

    #[test]
    fn test_definitions_in_display_order() {
        let kinds: Vec<_> = get_default_catalog().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, ExerciseKind::ALL.to_vec());
    }

    #[test]
    fn test_mismatched_positions_reported() {
        let mut catalog = get_default_catalog().clone();
        catalog.definitions[2].positions = &[Offset { x: 0, y: 0 }];

        let errors = catalog.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("triangle"));
    }
}
