use std::sync::Arc;
use std::thread;

use rulechain::{fact_set, prove_goal, Fact, FactSet, ProofEvent, Rule, RuleStore};

#[test]
fn covid_test_is_proved_through_intermediate_goal() {
    let store = RuleStore::health_assistant();
    let known = fact_set(["dry_cough", "fever", "loss_of_smell"]);

    let result = prove_goal(&Fact::new("recommend_test"), &known, store.as_slice());

    assert!(result.proved);
    assert_eq!(
        result.lines(),
        vec![
            "Trying rule: If COVID suspected ⇒ Recommend COVID test",
            "Trying rule: Dry cough + fever + loss of smell ⇒ COVID suspected",
            "'dry_cough' is already known.",
            "'fever' is already known.",
            "'loss_of_smell' is already known.",
            "Proved goal 'covid_suspected'.",
            "Proved goal 'recommend_test'.",
        ]
    );
    assert_eq!(result.proving_rule(), Some(4));
}

#[test]
fn allergy_fails_on_first_unprovable_symptom() {
    let store = RuleStore::health_assistant();

    let result = store.prove_goal(&Fact::new("allergy"), &FactSet::new());

    assert!(!result.proved);
    assert_eq!(
        result.lines(),
        vec![
            "Trying rule: Itchy eyes + sneezing + runny nose ⇒ Allergy",
            "No rules conclude 'itchy_eyes'.",
            "Failed to prove 'itchy_eyes'.",
            "Could not prove 'allergy'.",
        ]
    );
}

#[test]
fn allergy_conditions_each_fail_with_no_rule_note() {
    let store = RuleStore::health_assistant();

    // Supplying earlier symptoms pushes the failure to each later one.
    for (known, missing) in [
        (FactSet::new(), "itchy_eyes"),
        (fact_set(["itchy_eyes"]), "sneezing"),
        (fact_set(["itchy_eyes", "sneezing"]), "runny_nose"),
    ] {
        let result = store.prove_goal(&Fact::new("allergy"), &known);
        assert!(!result.proved);
        let lines = result.lines();
        assert!(lines.contains(&format!("No rules conclude '{missing}'.")));
        assert!(lines.contains(&format!("Failed to prove '{missing}'.")));
    }
}

#[test]
fn throat_infection_needs_only_immediate_conditions() {
    let store = RuleStore::health_assistant();
    let known = fact_set(["sore_throat", "mild_fever"]);

    let result = store.prove_goal(&Fact::new("throat_infection"), &known);

    assert!(result.proved);
    assert_eq!(
        result.lines(),
        vec![
            "Trying rule: Sore throat + mild fever ⇒ Throat infection",
            "'sore_throat' is already known.",
            "'mild_fever' is already known.",
            "Proved goal 'throat_infection'.",
        ]
    );
    assert!(result.trace.iter().all(|s| s.depth <= 1));
}

#[test]
fn known_goal_is_proved_immediately() {
    let store = RuleStore::health_assistant();
    let result = store.prove_goal(&Fact::new("flu_suspected"), &fact_set(["flu_suspected"]));
    assert!(result.proved);
    assert_eq!(result.lines(), vec!["'flu_suspected' is already known."]);
}

#[test]
fn goal_outside_vocabulary_fails_gracefully() {
    let store = RuleStore::health_assistant();
    let result = store.prove_goal(&Fact::new("broken_leg"), &fact_set(["fever"]));
    assert!(!result.proved);
    assert_eq!(
        result.trace.last().map(|s| &s.event),
        Some(&ProofEvent::NoRuleConcludes { goal: Fact::new("broken_leg") })
    );
}

#[test]
fn two_rule_cycle_terminates_unproved() {
    let rules = vec![
        Rule::from_tokens(["b"], "a", "B implies A").unwrap(),
        Rule::from_tokens(["a"], "b", "A implies B").unwrap(),
    ];

    for goal in ["a", "b"] {
        let result = prove_goal(&Fact::new(goal), &FactSet::new(), &rules);
        assert!(!result.proved);
        assert!(result
            .trace
            .iter()
            .any(|s| matches!(&s.event, ProofEvent::CycleAvoided { goal: g } if g.as_str() == goal)));
    }
}

#[test]
fn proofs_are_deterministic() {
    let store = RuleStore::health_assistant();
    let known = fact_set(["fever", "cough", "body_ache"]);
    let goal = Fact::new("see_doctor_if_persistent");

    let a = store.prove_goal(&goal, &known);
    let b = store.prove_goal(&goal, &known);

    assert_eq!(a, b);
    assert!(a.proved);
}

#[test]
fn known_facts_are_not_extended_by_proof() {
    let store = RuleStore::health_assistant();
    let known = fact_set(["sore_throat", "mild_fever"]);
    let before = known.clone();

    let result = store.prove_goal(&Fact::new("recommend_warm_salts_gargle"), &known);

    assert!(result.proved);
    assert_eq!(known, before);
}

#[test]
fn concurrent_proofs_share_one_store() {
    let store = Arc::new(RuleStore::health_assistant());
    let cases = vec![
        ("recommend_test", fact_set(["dry_cough", "fever", "loss_of_smell"]), true),
        ("allergy", FactSet::new(), false),
        ("throat_infection", fact_set(["sore_throat", "mild_fever"]), true),
        ("recommend_home_remedies", fact_set(["runny_nose", "sneezing"]), false),
    ];

    thread::scope(|scope| {
        for (goal, known, expected) in &cases {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                let result = store.prove_goal(&Fact::new(*goal), known);
                assert_eq!(result.proved, *expected, "goal {goal}");
            });
        }
    });
}
