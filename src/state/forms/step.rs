//! Step gate: validation checkpoint before leaving a wizard step

use super::form_state::FormState;

/// Validate every field owned by `step`, recording each result in the
/// error map in one pass. Returns true iff all of them are valid.
pub fn can_advance(step: usize, state: &mut FormState) -> bool {
    let owned = match state.definition().step(step) {
        Some(def) => def.owned_fields.clone(),
        None => return true,
    };

    // No short-circuit: every invalid field gets its message now
    owned
        .iter()
        .map(|field| state.validate_field(field))
        .fold(true, |all, valid| all && valid)
}

/// Run the gate for every step, used before the final submission
pub fn can_submit(state: &mut FormState) -> bool {
    (1..=state.step_count())
        .map(|step| can_advance(step, state))
        .fold(true, |all, valid| all && valid)
}
