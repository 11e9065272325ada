use proptest::prelude::*;
use tracelink_links::{AggregationFunction, ConnectionState, Confidence, MappingKind, NounMapping, RecommendedInstance};
use tracelink_model::{Claimant, ModelInstance, Word};

const CLAIMANTS: [&str; 3] = ["extractor", "phrases", "connector"];

/// `(candidate index, model index, claimant index, probability)`
type Call = (usize, usize, usize, f64);

fn candidates() -> Vec<RecommendedInstance> {
    ["Cache", "Database", "Logic"]
        .iter()
        .enumerate()
        .map(|(sentence, name)| {
            let mapping = NounMapping::new(
                name.to_lowercase(),
                [Word::new(*name, sentence, 0)],
                MappingKind::Name,
                Claimant::fixed("extractor"),
                0.5,
            )
            .unwrap();
            RecommendedInstance::new(*name, "Component", Claimant::fixed("extractor"), 0.5)
                .unwrap()
                .with_name_mapping(mapping)
        })
        .collect()
}

fn models() -> Vec<ModelInstance> {
    (0..4)
        .map(|id| ModelInstance::new(id.to_string(), format!("m{id}"), "Component").unwrap())
        .collect()
}

fn replay(calls: &[Call]) -> ConnectionState {
    let (candidates, models) = (candidates(), models());
    let mut state = ConnectionState::new();
    for &(ri, mi, claimant, probability) in calls {
        state
            .add_to_link(&candidates[ri], &models[mi], Claimant::fixed(CLAIMANTS[claimant]), probability)
            .unwrap();
    }
    state
}

fn call() -> impl Strategy<Value = Call> {
    (0usize..3, 0usize..4, 0usize..3, 0.0f64..=1.0)
}

proptest! {
    #[test]
    fn replaying_the_same_calls_yields_the_same_state(calls in prop::collection::vec(call(), 0..40)) {
        let a = replay(&calls);
        let b = replay(&calls);
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.links().iter().zip(b.links()) {
            prop_assert_eq!(x.key(), y.key());
            prop_assert_eq!(x.probability(), y.probability());
        }
        prop_assert_eq!(a.trace_links(), b.trace_links());
    }

    #[test]
    fn each_pair_is_stored_once_with_its_best_claim(calls in prop::collection::vec(call(), 1..40)) {
        let state = replay(&calls);
        let mut pairs: Vec<(usize, usize)> = calls.iter().map(|&(ri, mi, _, _)| (ri, mi)).collect();
        pairs.sort_unstable();
        pairs.dedup();
        prop_assert_eq!(state.len(), pairs.len());

        let models = models();
        for link in state.links() {
            let mi = models.iter().position(|m| m == link.model_instance()).unwrap();
            let best = calls
                .iter()
                .filter(|&&(ri, m, _, _)| m == mi && candidates()[ri] == *link.recommended_instance())
                .map(|&(_, _, _, p)| p)
                .fold(0.0, f64::max);
            prop_assert_eq!(link.probability(), best);
        }
    }

    #[test]
    fn repeating_a_claim_is_idempotent(call in call(), repeats in 1usize..5) {
        let once = replay(&[call]);
        let many = replay(&vec![call; repeats]);
        prop_assert_eq!(once.len(), 1);
        prop_assert_eq!(many.len(), 1);
        prop_assert_eq!(once.links()[0].probability(), many.links()[0].probability());
        prop_assert_eq!(once.word_trace_links(), many.word_trace_links());
    }

    #[test]
    fn merged_confidence_covers_every_claimant(
        a in prop::collection::vec((0usize..3, 0.0f64..=1.0), 0..6),
        b in prop::collection::vec((0usize..3, 0.0f64..=1.0), 0..6),
    ) {
        let build = |claims: &[(usize, f64)]| {
            let mut confidence = Confidence::new(AggregationFunction::Max);
            for &(claimant, p) in claims {
                confidence.add_claim(Claimant::fixed(CLAIMANTS[claimant]), p).unwrap();
            }
            confidence
        };
        let (ca, cb) = (build(&a), build(&b));
        let merged = Confidence::merge(&ca, &cb, AggregationFunction::Max, &AggregationFunction::Max);
        let mut expected = ca.claimants();
        expected.extend(cb.claimants());
        prop_assert_eq!(merged.claimants(), expected);
        prop_assert!(merged.value() <= ca.value().max(cb.value()) + 1e-12);
    }
}

#[test]
fn sum_aggregation_is_clipped() {
    let mut confidence = Confidence::new(AggregationFunction::Sum);
    for claimant in CLAIMANTS {
        confidence.add_claim(Claimant::fixed(claimant), 0.6).unwrap();
    }
    assert_eq!(confidence.value(), 1.0);
}
