//! Exactly-once, order-preserving delivery across the pending/ready switch.

use proptest::collection::vec;
use proptest::prelude::*;
use registry::{Collector, Fragment, FragmentRegistry, Phase, SubmitOutcome};

fn fragment(group: &str, entries: &[&str]) -> Fragment {
    Fragment::try_new(group, entries.iter().copied()).expect("fragment")
}

/// Submits `fragments`, installing a collector after the first `install_at`.
fn run(fragments: &[Fragment], install_at: usize) -> (Vec<Fragment>, Vec<SubmitOutcome>) {
    let mut registry = FragmentRegistry::<Collector>::new();
    let mut outcomes = Vec::new();
    let install_at = install_at.min(fragments.len());

    for (idx, fragment) in fragments.iter().enumerate() {
        if idx == install_at {
            registry.install_consumer(Collector::new()).expect("install");
        }
        outcomes.push(registry.submit(fragment.clone()));
    }
    if !registry.is_ready() {
        registry.install_consumer(Collector::new()).expect("install");
    }

    let delivered = registry
        .into_consumer()
        .map(Collector::into_fragments)
        .unwrap_or_default();
    (delivered, outcomes)
}

fn arb_fragment() -> impl Strategy<Value = Fragment> {
    ("[a-c]", vec("[a-z<>/ ]{0,6}", 0..3))
        .prop_map(|(group, entries)| Fragment::try_new(group, entries).expect("fragment"))
}

#[test]
fn single_fragment_waits_for_consumer() {
    let mut registry = FragmentRegistry::<Collector>::new();
    let impl_a = fragment("rsx_dom", &["<impl A>"]);

    registry.submit(impl_a.clone());
    assert_eq!(registry.pending().collect::<Vec<_>>(), [&impl_a]);

    registry.install_consumer(Collector::new()).expect("install");
    assert_eq!(registry.consumer().map(Collector::fragments), Some(&[impl_a][..]));
}

#[test]
fn consumer_first_means_no_buffering() {
    let mut registry = FragmentRegistry::<Collector>::new();
    registry.install_consumer(Collector::new()).expect("install");
    assert_eq!(registry.pending_len(), 0);

    let g = fragment("g", &["x"]);
    assert_eq!(registry.submit(g.clone()), SubmitOutcome::Delivered);
    assert_eq!(registry.pending_len(), 0);
    assert_eq!(registry.consumer().map(Collector::fragments), Some(&[g][..]));
}

#[test]
fn two_groups_before_install_arrive_in_submission_order() {
    let first = fragment("rsx_dom", &["<impl A>"]);
    let second = fragment("rsx_tree", &["<impl B>"]);

    let (delivered, outcomes) = run(&[first.clone(), second.clone()], usize::MAX);
    assert_eq!(outcomes, [SubmitOutcome::Queued, SubmitOutcome::Queued]);
    assert_eq!(delivered, [first, second]);
}

#[test]
fn phase_never_reverts() {
    let mut registry = FragmentRegistry::<Collector>::new();
    assert_eq!(registry.phase(), Phase::Pending);
    registry.install_consumer(Collector::new()).expect("install");
    for group in ["a", "b", "c"] {
        registry.submit(fragment(group, &[]));
        assert_eq!(registry.phase(), Phase::Ready);
    }
    assert!(registry.install_consumer(Collector::new()).is_err());
    assert_eq!(registry.phase(), Phase::Ready);
}

proptest! {
    #[test]
    fn every_fragment_delivered_once_in_order(
        fragments in vec(arb_fragment(), 0..24),
        install_at in 0usize..32,
    ) {
        let (delivered, outcomes) = run(&fragments, install_at);
        prop_assert_eq!(&delivered, &fragments);

        let cutoff = install_at.min(fragments.len());
        for (idx, outcome) in outcomes.iter().enumerate() {
            let expected = if idx < cutoff {
                SubmitOutcome::Queued
            } else {
                SubmitOutcome::Delivered
            };
            prop_assert_eq!(*outcome, expected);
        }
    }

    #[test]
    fn independent_registries_observe_identical_sequences(
        fragments in vec(arb_fragment(), 0..16),
        install_at in 0usize..20,
    ) {
        let (first, _) = run(&fragments, install_at);
        let (second, _) = run(&fragments, install_at);
        prop_assert_eq!(first, second);
    }
}
