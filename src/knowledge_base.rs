//! Built-in health-assistant rule base.
//!
//! Ten triage rules mapping symptoms to suspected conditions and
//! recommendations. Store order matters: it decides trace order for forward
//! chaining and which proof path backward chaining tries first.

use crate::store::RuleDefinition;

/// `(conditions, conclusion, explanation)` in store order.
const HEALTH_ASSISTANT: &[(&[&str], &str, &str)] = &[
    (
        &["fever", "cough", "body_ache"],
        "flu_suspected",
        "Fever + cough + body ache ⇒ Flu suspected",
    ),
    (
        &["runny_nose", "sneezing", "no_fever"],
        "common_cold",
        "Runny nose + sneezing + no fever ⇒ Common cold",
    ),
    (
        &["itchy_eyes", "sneezing", "runny_nose"],
        "allergy",
        "Itchy eyes + sneezing + runny nose ⇒ Allergy",
    ),
    (
        &["dry_cough", "fever", "loss_of_smell"],
        "covid_suspected",
        "Dry cough + fever + loss of smell ⇒ COVID suspected",
    ),
    (
        &["covid_suspected"],
        "recommend_test",
        "If COVID suspected ⇒ Recommend COVID test",
    ),
    (
        &["flu_suspected"],
        "recommend_paracetamol",
        "If Flu suspected ⇒ Recommend paracetamol",
    ),
    (
        &["flu_suspected"],
        "see_doctor_if_persistent",
        "If Flu suspected ⇒ See doctor if symptoms persist",
    ),
    (
        &["common_cold"],
        "recommend_home_remedies",
        "If Common cold ⇒ Recommend home remedies",
    ),
    (
        &["sore_throat", "mild_fever"],
        "throat_infection",
        "Sore throat + mild fever ⇒ Throat infection",
    ),
    (
        &["throat_infection"],
        "recommend_warm_salts_gargle",
        "Throat infection ⇒ Warm salt-water gargle",
    ),
];

/// Returns the built-in rule base in its external definition shape.
#[must_use]
pub fn health_assistant_definitions() -> Vec<RuleDefinition> {
    HEALTH_ASSISTANT
        .iter()
        .map(|(conditions, conclusion, explanation)| RuleDefinition {
            conditions: conditions.iter().map(|c| (*c).to_string()).collect(),
            conclusion: (*conclusion).to_string(),
            explanation: (*explanation).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_definition_is_valid() {
        for (idx, def) in health_assistant_definitions().into_iter().enumerate() {
            assert!(def.into_rule().is_ok(), "builtin rule {idx} failed validation");
        }
    }

    #[test]
    fn builtin_has_ten_rules_in_declared_order() {
        let defs = health_assistant_definitions();
        assert_eq!(defs.len(), 10);
        assert_eq!(defs[0].conclusion, "flu_suspected");
        assert_eq!(defs[9].conclusion, "recommend_warm_salts_gargle");
    }
}
