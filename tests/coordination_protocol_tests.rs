use std::cell::RefCell;
use std::rc::Rc;

use lexis_views::ViewError;
use lexis_views::api::{LinkedViewsConfig, LinkedViewsEngine, ViewTopics};
use lexis_views::core::{Dataset, Gender, GenderCount, LeaderId, LeaderRecord};
use lexis_views::interaction::{Intent, IntentSender};
use lexis_views::render::{
    DerivedView, RecordingHandle, RecordingView, ViewAdapter, ViewKind,
};

const A: LeaderId = LeaderId(1);
const B: LeaderId = LeaderId(2);
const C: LeaderId = LeaderId(3);

/// A: oecd/F/5000, B: oecd/M/no gdp, C: other/F/8000.
fn scenario_dataset() -> Dataset {
    Dataset::from_records(vec![
        LeaderRecord::new(1, "NZL", "Leader A", "F", 1997, 1999, 44)
            .with_pcgdp(Some(5_000.0))
            .in_group("oecd"),
        LeaderRecord::new(2, "JPN", "Leader B", "M", 2006, 2007, 52).in_group("oecd"),
        LeaderRecord::new(3, "LKA", "Leader C", "F", 1960, 1965, 44)
            .with_pcgdp(Some(8_000.0))
            .in_group("other"),
    ])
    .expect("scenario dataset")
}

struct Harness {
    engine: LinkedViewsEngine,
    lexis: RecordingHandle,
    bar: RecordingHandle,
    scatter: RecordingHandle,
}

fn harness() -> Harness {
    let mut engine = LinkedViewsEngine::new(scenario_dataset(), LinkedViewsConfig::default())
        .expect("engine init");
    let (lexis_view, lexis) = RecordingView::new("lexis", ViewKind::Lexis);
    let (bar_view, bar) = RecordingView::new("bar", ViewKind::Bar);
    let (scatter_view, scatter) = RecordingView::new("scatter", ViewKind::Scatter);
    engine.register_view(Box::new(lexis_view)).expect("lexis");
    engine.register_view(Box::new(bar_view)).expect("bar");
    engine.register_view(Box::new(scatter_view)).expect("scatter");
    engine.render_all().expect("initial render");
    Harness {
        engine,
        lexis,
        bar,
        scatter,
    }
}

fn lexis_ids(handle: &RecordingHandle) -> Vec<LeaderId> {
    match &handle.borrow().last {
        Some(DerivedView::Lexis(frame)) => frame.segments.iter().map(|s| s.id).collect(),
        other => panic!("expected lexis frame, got {other:?}"),
    }
}

fn scatter_ids(handle: &RecordingHandle) -> Vec<(LeaderId, bool)> {
    match &handle.borrow().last {
        Some(DerivedView::Scatter(frame)) => {
            frame.points.iter().map(|p| (p.id, p.active)).collect()
        }
        other => panic!("expected scatter frame, got {other:?}"),
    }
}

fn bars(handle: &RecordingHandle) -> Vec<GenderCount> {
    match &handle.borrow().last {
        Some(DerivedView::Bar(frame)) => frame.bars.clone(),
        other => panic!("expected bar frame, got {other:?}"),
    }
}

fn count(gender: &str, count: usize) -> GenderCount {
    GenderCount {
        gender: Gender::from(gender),
        count,
    }
}

#[test]
fn scenario_group_then_gender_filter() {
    let mut h = harness();

    h.engine.set_country_group("oecd").expect("set group");
    assert_eq!(lexis_ids(&h.lexis), vec![A, B]);
    assert_eq!(scatter_ids(&h.scatter), vec![(A, true)]);
    assert_eq!(bars(&h.bar), vec![count("F", 1), count("M", 1)]);

    h.engine.toggle_gender("F").expect("toggle gender");
    assert_eq!(lexis_ids(&h.lexis), vec![A]);
    assert_eq!(scatter_ids(&h.scatter), vec![(A, true)]);
    assert_eq!(bars(&h.bar), vec![count("F", 1), count("M", 1)]);
    match &h.bar.borrow().last {
        Some(DerivedView::Bar(frame)) => {
            assert_eq!(frame.active_gender, Some(Gender::from("F")));
        }
        other => panic!("expected bar frame, got {other:?}"),
    }
}

#[test]
fn toggling_leader_outside_gender_filter_is_rejected_without_state_change() {
    let mut h = harness();
    h.engine.toggle_gender("F").expect("toggle gender");
    let revision = h.engine.revision();
    let lexis_renders = h.lexis.borrow().render_count;

    let err = h.engine.toggle_leader(B).expect_err("male leader out of scope");
    assert_eq!(err, ViewError::LeaderOutOfScope(B));
    assert!(h.engine.state().selected_leaders().is_empty());
    assert_eq!(h.engine.revision(), revision);
    assert_eq!(h.lexis.borrow().render_count, lexis_renders);
}

#[test]
fn toggling_leader_outside_country_group_is_rejected() {
    let mut h = harness();
    let err = h.engine.toggle_leader(C).expect_err("other group");
    assert_eq!(err, ViewError::LeaderOutOfScope(C));
}

#[test]
fn toggling_unknown_leader_is_a_data_integrity_error() {
    let mut h = harness();
    let err = h.engine.toggle_leader(LeaderId(42)).expect_err("unknown id");
    assert_eq!(err, ViewError::UnknownLeader(LeaderId(42)));
}

#[test]
fn leader_toggle_skips_bar_view() {
    let mut h = harness();
    let bar_renders = h.bar.borrow().render_count;
    let lexis_renders = h.lexis.borrow().render_count;

    let outcome = h.engine.toggle_leader(A).expect("select A");
    assert_eq!(outcome.topics, ViewTopics::selection());
    assert_eq!(outcome.rendered_views, 2);
    assert_eq!(h.bar.borrow().render_count, bar_renders);
    assert_eq!(h.lexis.borrow().render_count, lexis_renders + 1);
    assert!(h.engine.state().is_selected(A));

    h.engine.toggle_leader(A).expect("deselect A");
    assert!(!h.engine.state().is_selected(A));
}

#[test]
fn gender_toggle_prunes_non_matching_selection_and_does_not_restore_it() {
    let mut h = harness();
    h.engine.toggle_leader(A).expect("select A");
    h.engine.toggle_leader(B).expect("select B");

    let outcome = h.engine.toggle_gender("F").expect("filter F");
    assert_eq!(outcome.pruned_leaders, vec![B]);
    assert_eq!(outcome.topics, ViewTopics::all());
    assert_eq!(outcome.rendered_views, 3);

    let outcome = h.engine.toggle_gender("F").expect("unfilter");
    assert!(outcome.pruned_leaders.is_empty());
    assert_eq!(h.engine.state().gender(), None);
    let selected: Vec<LeaderId> = h.engine.state().selected_leaders().iter().copied().collect();
    assert_eq!(selected, vec![A]);
}

#[test]
fn country_group_change_clears_gender_and_selection() {
    let mut h = harness();
    h.engine.toggle_leader(A).expect("select A");
    h.engine.toggle_gender("F").expect("filter F");

    h.engine.set_country_group("other").expect("switch group");
    assert_eq!(h.engine.state().country_group().as_str(), "other");
    assert_eq!(h.engine.state().gender(), None);
    assert!(h.engine.state().selected_leaders().is_empty());
    assert_eq!(lexis_ids(&h.lexis), vec![C]);
    assert_eq!(bars(&h.bar), vec![count("F", 1)]);
}

#[test]
fn unknown_country_group_leaves_state_untouched() {
    let mut h = harness();
    h.engine.toggle_leader(A).expect("select A");
    let before = h.engine.state().clone();

    let err = h.engine.set_country_group("g20").expect_err("unknown group");
    assert_eq!(err, ViewError::UnknownCountryGroup("g20".to_owned()));
    assert_eq!(h.engine.state(), &before);
}

#[test]
fn clear_selection_twice_equals_once() {
    let mut h = harness();
    h.engine.toggle_leader(A).expect("select A");

    h.engine.clear_selection().expect("first clear");
    let after_first = h.engine.state().clone();
    let lexis_after_first = h.lexis.borrow().last.clone();

    h.engine.clear_selection().expect("second clear");
    assert_eq!(h.engine.state(), &after_first);
    let lexis_after_second = h.lexis.borrow().last.clone();
    match (lexis_after_first, lexis_after_second) {
        (Some(DerivedView::Lexis(first)), Some(DerivedView::Lexis(second))) => {
            assert_eq!(first.segments, second.segments);
            assert_eq!(first.labels, second.labels);
        }
        other => panic!("expected lexis frames, got {other:?}"),
    }
}

#[test]
fn every_rendered_frame_carries_the_committed_revision() {
    let mut h = harness();
    let outcome = h.engine.toggle_gender("M").expect("filter M");
    for handle in [&h.lexis, &h.bar, &h.scatter] {
        let revision = handle.borrow().last.as_ref().map(DerivedView::revision);
        assert_eq!(revision, Some(outcome.revision));
    }
}

#[test]
fn duplicate_view_ids_are_rejected() {
    let mut h = harness();
    let (view, _) = RecordingView::new("lexis", ViewKind::Lexis);
    let err = h.engine.register_view(Box::new(view)).expect_err("duplicate");
    assert_eq!(err, ViewError::DuplicateView("lexis".to_owned()));
    assert!(h.engine.unregister_view("lexis"));
    assert!(!h.engine.has_view("lexis"));
    assert_eq!(h.engine.view_count(), 2);
}

struct FailingView;

impl ViewAdapter for FailingView {
    fn id(&self) -> &str {
        "broken"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Lexis
    }

    fn render(&mut self, _view: &DerivedView) -> lexis_views::ViewResult<()> {
        Err(ViewError::Render {
            view_id: "broken".to_owned(),
            reason: "backend unavailable".to_owned(),
        })
    }
}

#[test]
fn render_failure_still_updates_other_views_and_keeps_commit() {
    let mut h = harness();
    h.engine.register_view(Box::new(FailingView)).expect("register");
    let scatter_renders = h.scatter.borrow().render_count;

    let err = h.engine.toggle_leader(A).expect_err("failing view");
    assert!(matches!(err, ViewError::Render { .. }));
    assert!(h.engine.state().is_selected(A));
    assert_eq!(h.scatter.borrow().render_count, scatter_renders + 1);
}

#[test]
fn render_failure_keeps_pruned_leaders_of_the_landed_commit() {
    let mut h = harness();
    h.engine.toggle_leader(A).expect("select A");
    h.engine.register_view(Box::new(FailingView)).expect("register");
    let revision = h.engine.revision();

    let err = h.engine.toggle_gender("M").expect_err("failing view");
    assert!(matches!(err, ViewError::Render { .. }));
    assert_eq!(h.engine.revision(), revision + 1);
    assert_eq!(h.engine.state().gender(), Some(&Gender::from("M")));
    assert!(!h.engine.state().is_selected(A));
    assert_eq!(h.engine.last_pruned_leaders(), &[A]);
}

/// Scatter view that clicks a point while rendering, like a host wiring an
/// input handler straight into its draw routine.
struct ClickOnRenderView {
    sender: IntentSender,
    pending: Option<Intent>,
    seen_revisions: Rc<RefCell<Vec<u64>>>,
}

impl ViewAdapter for ClickOnRenderView {
    fn id(&self) -> &str {
        "clicky-scatter"
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Scatter
    }

    fn render(&mut self, view: &DerivedView) -> lexis_views::ViewResult<()> {
        self.seen_revisions.borrow_mut().push(view.revision());
        if let Some(intent) = self.pending.take() {
            self.sender.send(intent);
        }
        Ok(())
    }
}

#[test]
fn intents_raised_during_render_wait_for_the_current_cycle() {
    let mut h = harness();
    let seen = Rc::new(RefCell::new(Vec::new()));
    h.engine
        .register_view(Box::new(ClickOnRenderView {
            sender: h.engine.intent_sender(),
            pending: Some(Intent::ToggleLeader { id: A }),
            seen_revisions: seen.clone(),
        }))
        .expect("register");

    let outcome = h.engine.set_country_group("oecd").expect("set group");
    assert_eq!(h.engine.pending_intent_count(), 1);
    assert!(!h.engine.state().is_selected(A));
    assert_eq!(*seen.borrow(), vec![outcome.revision]);

    let results = h.engine.process_pending_intents();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_ok());
    assert!(h.engine.state().is_selected(A));
    assert_eq!(h.engine.pending_intent_count(), 0);
    assert_eq!(*seen.borrow(), vec![outcome.revision, outcome.revision + 1]);
}

#[test]
fn drain_limit_leaves_remaining_intents_queued() {
    let config = LinkedViewsConfig::default().with_max_intents_per_drain(2);
    let mut engine = LinkedViewsEngine::new(scenario_dataset(), config).expect("engine");
    let sender = engine.intent_sender();
    for _ in 0..3 {
        sender.send(Intent::ClearSelection);
    }

    let results = engine.process_pending_intents();
    assert_eq!(results.len(), 2);
    assert_eq!(engine.pending_intent_count(), 1);
}

#[test]
fn dispatch_routes_every_intent_kind() {
    let mut h = harness();
    h.engine
        .dispatch(Intent::ToggleLeader { id: A })
        .expect("toggle leader");
    h.engine
        .dispatch(Intent::ToggleGender {
            gender: Gender::from("M"),
        })
        .expect("toggle gender");
    assert!(h.engine.state().selected_leaders().is_empty());
    h.engine
        .dispatch(Intent::SetCountryGroup {
            group: "other".into(),
        })
        .expect("set group");
    h.engine.dispatch(Intent::ClearSelection).expect("clear");
    assert_eq!(h.engine.revision(), 4);
}

#[test]
fn engine_rejects_initial_group_missing_from_dataset() {
    let config = LinkedViewsConfig::default().with_initial_country_group("eu27");
    let err = LinkedViewsEngine::new(scenario_dataset(), config).err();
    assert_eq!(err, Some(ViewError::UnknownCountryGroup("eu27".to_owned())));
}
