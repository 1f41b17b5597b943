use crate::converter::cost::{CostFunction, ModelCost};
use crate::converter::testutil::toy_model;

#[test]
fn test_unseen_context_falls_back_to_default_row() {
    let model = toy_model();
    let cost = ModelCost::new(&model);
    let default = &model.losses()[&model.default_context()];

    // "z" never appears as a context in the training corpus.
    assert!(!model.losses().contains_key("z"));
    assert_eq!(cost.transition("z", 'a'), default[&'a']);
    assert_eq!(cost.transition("z", 'b'), default[&'b']);
}

#[test]
fn test_unseen_character_in_known_context_falls_back() {
    let model = toy_model();
    let cost = ModelCost::new(&model);
    let default = &model.losses()[&model.default_context()];

    // Context "b" was observed, but only 'a' ever follows it.
    let row = &model.losses()["b"];
    assert!(row.contains_key(&'a'));
    assert!(!row.contains_key(&'c'));
    assert_eq!(cost.transition("b", 'c'), default[&'c']);
}

#[test]
fn test_stored_pairs_are_served_verbatim() {
    let model = toy_model();
    let cost = ModelCost::new(&model);
    assert_eq!(cost.transition("a", 'b'), model.losses()["a"][&'b']);
}

#[test]
fn test_character_outside_universe_gets_finite_loss() {
    let model = toy_model();
    let cost = ModelCost::new(&model);
    // 'z' is not in the accepted universe at all; the lookup must still
    // return something finite rather than poisoning path sums.
    let loss = cost.transition("a", 'z');
    assert!(loss.is_finite());
    assert!(loss > model.losses()[&model.default_context()][&'c']);
}
