//! The denoiser auxiliary pass (§4.7 "denoiser auxiliary pass"): composes
//! an existing [`TechniqueInfo`] by appending an info-buffer variant and
//! wrapping any previously-installed [`VariantSelector`].
//!
//! Open Question (b) (§9): when a technique already installs a selector
//! that itself returns only a subset of variants, this reproduces the
//! source's behavior of appending the new variant's index to whatever
//! the previous selector returned, rather than trying to merge selection
//! policies any more cleverly. Document this as a precondition on
//! `enable_ib`, not a general selector-composition law.

use std::sync::Arc;

use crate::info::{TechniqueInfo, TechniqueVariantInfo, VariantSelector};

/// Append an info-buffer variant (producing "Normals", "Albedo", "Depth")
/// to `info`, scheduling it on every iteration, or only the first, per
/// `only_first_iteration` (§4.7 "triggered by a variant selector that
/// schedules the infobuffer variant only on iterations where the
/// denoiser needs it").
pub fn enable_ib(mut info: TechniqueInfo, only_first_iteration: bool) -> TechniqueInfo {
    for name in ["Normals", "Albedo", "Depth"] {
        if !info.aov_names.iter().any(|n| n == name) {
            info.aov_names.push(name.to_owned());
        }
    }

    let ib_index = info.variants.len();
    info.variants.push(TechniqueVariantInfo::default());

    let previous = info.selector.clone();
    let sweep_len = ib_index;
    let selector: VariantSelector = Arc::new(move |iteration| {
        let mut active = match &previous {
            Some(selector) => selector(iteration),
            None => (0..sweep_len).collect(),
        };
        let schedule_ib = !only_first_iteration || iteration == 0;
        if schedule_ib {
            active.push(ib_index);
        }
        active
    });
    info.selector = Some(selector);
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::ShadowHandlingMode;

    fn path_like() -> TechniqueInfo {
        TechniqueInfo::single_variant(TechniqueVariantInfo {
            uses_lights: true,
            primary_payload_count: 6,
            shadow_handling_mode: ShadowHandlingMode::Simple,
            ..Default::default()
        })
    }

    #[test]
    fn enable_ib_adds_exactly_one_variant() {
        let info = enable_ib(path_like(), true);
        assert_eq!(info.variants.len(), 2);
        assert_eq!(info.aov_names, vec!["Normals".to_owned(), "Albedo".to_owned(), "Depth".to_owned()]);
    }

    #[test]
    fn only_first_iteration_schedules_ib_on_iteration_zero_only() {
        let info = enable_ib(path_like(), true);
        assert_eq!(info.active_variants(0), vec![0, 1]);
        assert_eq!(info.active_variants(1), vec![0]);
        assert_eq!(info.active_variants(42), vec![0]);
    }

    #[test]
    fn not_only_first_iteration_schedules_ib_every_iteration() {
        let info = enable_ib(path_like(), false);
        assert_eq!(info.active_variants(0), vec![0, 1]);
        assert_eq!(info.active_variants(7), vec![0, 1]);
    }

    #[test]
    fn composing_with_an_existing_selector_appends_to_its_output() {
        let mut info = path_like();
        info.variants.push(TechniqueVariantInfo::default());
        let previous: VariantSelector = Arc::new(|_iter| vec![1]);
        info.selector = Some(previous);
        let composed = enable_ib(info, false);
        assert_eq!(composed.active_variants(0), vec![1, 2]);
    }
}
