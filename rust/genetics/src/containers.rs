//! Trait containers.
//!
//! A container is a plain struct of [`crate::traits::GeneticTrait`] fields declared through
//! [`trait_container!`], which emits the struct together with its
//! [`TraitSpec`] table. Random generation, inheritance, validation and the
//! flat serialized form all walk that one declaration.

use rand::Rng;

use crate::mutation::MutationParams;
use crate::traits::{TraitMeta, TraitSpec};

/// Uniform access to a declared set of traits.
pub trait TraitContainer: Sized + Clone {
    const SPECS: &'static [TraitSpec];

    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;

    /// Offspring container; see [`crate::inheritance::inherit_all`].
    fn inherit_fields<R: Rng + ?Sized>(
        parent1: &Self,
        parent2: &Self,
        weight1: f64,
        params: &MutationParams,
        rng: &mut R,
    ) -> Self;

    /// `(name, value, meta)` for every trait, in declaration order.
    fn entries(&self) -> Vec<(&'static str, f64, TraitMeta)>;

    /// Sets a trait value by name, clamped into its spec. Returns `false`
    /// for unknown names.
    fn set_value(&mut self, name: &str, value: f64) -> bool;

    fn set_meta(&mut self, name: &str, meta: TraitMeta) -> bool;

    /// `(name, discrete)` as implied by each field's allele type.
    fn allele_kinds() -> Vec<(&'static str, bool)>;

    fn spec(name: &str) -> Option<&'static TraitSpec> {
        Self::SPECS.iter().find(|s| s.name == name)
    }

    /// Human-readable invariant violations; empty when valid.
    fn violations(&self) -> Vec<String> {
        let mut out = Vec::new();
        for (spec, (name, value, meta)) in Self::SPECS.iter().zip(self.entries()) {
            if !spec.contains(value) {
                out.push(format!(
                    "{name} = {value} outside [{}, {}]",
                    spec.min, spec.max
                ));
            }
            if !meta.is_valid() {
                out.push(format!("{name} has out-of-range meta {meta:?}"));
            }
        }
        out
    }
}

/// Declares a trait container.
///
/// ```
/// use evohold_genetics::trait_container;
/// use evohold_genetics::containers::TraitContainer;
///
/// trait_container! {
///     /// Toy container.
///     pub struct Toy {
///         speed: f64 = continuous(0.0, 2.0),
///         legs: i64 = discrete(2, 8),
///     }
/// }
///
/// assert_eq!(Toy::SPECS.len(), 2);
/// assert!(Toy::SPECS[1].discrete);
/// ```
#[macro_export]
macro_rules! trait_container {
    (
        $(#[$attr:meta])*
        pub struct $name:ident {
            $( $field:ident : $ty:ty = $kind:ident ( $min:expr, $max:expr ) ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( pub $field: $crate::traits::GeneticTrait<$ty>, )*
        }

        impl $crate::containers::TraitContainer for $name {
            const SPECS: &'static [$crate::traits::TraitSpec] = &[
                $( $crate::traits::TraitSpec::$kind(stringify!($field), $min as f64, $max as f64), )*
            ];

            fn random<R: $crate::__rand::Rng + ?Sized>(rng: &mut R) -> Self {
                Self {
                    $( $field: $crate::traits::GeneticTrait::<$ty>::random(
                        &$crate::traits::TraitSpec::$kind(stringify!($field), $min as f64, $max as f64),
                        rng,
                    ), )*
                }
            }

            fn inherit_fields<R: $crate::__rand::Rng + ?Sized>(
                parent1: &Self,
                parent2: &Self,
                weight1: f64,
                params: &$crate::mutation::MutationParams,
                rng: &mut R,
            ) -> Self {
                Self {
                    $( $field: $crate::inheritance::inherit(
                        &$crate::traits::TraitSpec::$kind(stringify!($field), $min as f64, $max as f64),
                        &parent1.$field,
                        &parent2.$field,
                        weight1,
                        params,
                        rng,
                    ), )*
                }
            }

            fn entries(&self) -> Vec<(&'static str, f64, $crate::traits::TraitMeta)> {
                vec![
                    $( (
                        stringify!($field),
                        $crate::traits::Allele::to_f64(self.$field.value),
                        self.$field.meta,
                    ), )*
                ]
            }

            fn set_value(&mut self, name: &str, value: f64) -> bool {
                $(
                    if name == stringify!($field) {
                        let spec = $crate::traits::TraitSpec::$kind(
                            stringify!($field), $min as f64, $max as f64,
                        );
                        self.$field.value = <$ty as $crate::traits::Allele>::from_f64(value, &spec);
                        return true;
                    }
                )*
                false
            }

            fn set_meta(&mut self, name: &str, meta: $crate::traits::TraitMeta) -> bool {
                $(
                    if name == stringify!($field) {
                        self.$field.meta = meta.clamped();
                        return true;
                    }
                )*
                false
            }

            fn allele_kinds() -> Vec<(&'static str, bool)> {
                vec![ $( (stringify!($field), <$ty as $crate::traits::Allele>::DISCRETE), )* ]
            }
        }
    };
}

trait_container! {
    /// Body shape and appearance.
    pub struct PhysicalTraits {
        size_modifier: f64 = continuous(0.7, 1.3),
        fin_size: f64 = continuous(0.5, 2.0),
        tail_size: f64 = continuous(0.5, 2.0),
        body_aspect: f64 = continuous(0.7, 1.3),
        eye_size: f64 = continuous(0.7, 1.3),
        color_hue: f64 = continuous(0.0, 1.0),
        pattern_intensity: f64 = continuous(0.0, 1.0),
        lifespan_modifier: f64 = continuous(0.8, 1.2),
        template_id: i64 = discrete(0, 5),
        pattern_type: i64 = discrete(0, 5),
    }
}

trait_container! {
    /// Temperament and skill. `aggression` and `poker_engagement` also shape
    /// how often an entity seeks and contests poker games in the world.
    pub struct BehavioralTraits {
        aggression: f64 = continuous(0.0, 1.0),
        social_tendency: f64 = continuous(0.0, 1.0),
        pursuit_aggression: f64 = continuous(0.0, 1.0),
        prediction_skill: f64 = continuous(0.0, 1.0),
        hunting_stamina: f64 = continuous(0.0, 1.0),
        threat_detection_range: f64 = continuous(0.5, 2.0),
        risk_tolerance: f64 = continuous(0.0, 1.0),
        poker_engagement: f64 = continuous(0.0, 1.0),
        school_size_preference: i64 = discrete(1, 10),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn allele_kinds_match<C: TraitContainer>() {
        let kinds = C::allele_kinds();
        assert_eq!(kinds.len(), C::SPECS.len());
        for (spec, (name, discrete)) in C::SPECS.iter().zip(kinds) {
            assert_eq!(spec.name, name);
            assert_eq!(spec.discrete, discrete, "{name}");
        }
    }

    #[test]
    fn spec_flags_agree_with_field_types() {
        allele_kinds_match::<PhysicalTraits>();
        allele_kinds_match::<BehavioralTraits>();
    }

    #[test]
    fn random_containers_are_valid() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert!(PhysicalTraits::random(&mut rng).violations().is_empty());
            assert!(BehavioralTraits::random(&mut rng).violations().is_empty());
        }
    }

    #[test]
    fn set_value_clamps_and_rejects_unknown_names() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut p = PhysicalTraits::random(&mut rng);
        assert!(p.set_value("fin_size", 40.0));
        assert_eq!(p.fin_size.value, 2.0);
        assert!(p.set_value("template_id", 2.6));
        assert_eq!(p.template_id.value, 3);
        assert!(!p.set_value("wing_span", 1.0));
    }

    #[test]
    fn spec_lookup_by_name() {
        let spec = BehavioralTraits::spec("threat_detection_range").unwrap();
        assert_eq!((spec.min, spec.max), (0.5, 2.0));
        assert!(BehavioralTraits::spec("size_modifier").is_none());
    }
}
