#![cfg(feature = "tracing")]

mod common;

use std::sync::{Arc, Mutex};

use common::Forest;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tui_managedtree::{TreeAction, TreeViewState};

#[derive(Debug, Default)]
struct TraceLog {
    messages: Vec<String>,
}

struct TraceCapture {
    log: Arc<Mutex<TraceLog>>,
}

impl<S> Layer<S> for TraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct MessageVisitor {
            message: Option<String>,
        }
        impl tracing::field::Visit for MessageVisitor {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_owned());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_owned());
                }
            }
        }

        let mut visitor = MessageVisitor { message: None };
        event.record(&mut visitor);
        if let Some(message) = visitor.message {
            let mut log = self.log.lock().expect("trace log lock");
            log.messages.push(message);
        }
    }
}

fn count(log: &TraceLog, message: &str) -> usize {
    log.messages.iter().filter(|seen| *seen == message).count()
}

#[test]
fn transitions_emit_debug_events() {
    let log = Arc::new(Mutex::new(TraceLog::default()));
    let subscriber = tracing_subscriber::registry().with(TraceCapture {
        log: Arc::clone(&log),
    });
    let _guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();

    let model = Forest::abcd();
    let mut state = TreeViewState::new();
    state.focus(Some(0));
    state.handle_action(&model, TreeAction::<()>::ExpandOrFocusNext);
    state.handle_action(&model, TreeAction::<()>::FocusNext);
    state.handle_action(&model, TreeAction::<()>::Activate);
    state.handle_action(&model, TreeAction::<()>::Deactivate);

    tracing::callsite::rebuild_interest_cache();
    let log = log.lock().expect("trace log lock");
    assert_eq!(count(&log, "tree.focus"), 2);
    assert_eq!(count(&log, "tree.expand"), 1);
    assert_eq!(count(&log, "tree.activate"), 1);
    assert_eq!(count(&log, "tree.deactivate"), 1);
    assert!(count(&log, "tree.traversal.rebuild") >= 2);
}

#[test]
fn cycles_are_reported_once_per_repeat() {
    let log = Arc::new(Mutex::new(TraceLog::default()));
    let subscriber = tracing_subscriber::registry().with(TraceCapture {
        log: Arc::clone(&log),
    });
    let _guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();

    // 0 -> 1 -> 0
    let mut model = Forest::from_parents(&[None, Some(0)]);
    model.children[1].push(0);
    let mut state = TreeViewState::new();
    state.set_expanded(&model, 0, true);
    state.set_expanded(&model, 1, true);
    state.ensure_traversal(&model);

    assert_eq!(state.traversal().ids().collect::<Vec<_>>(), vec![0, 1]);
    let log = log.lock().expect("trace log lock");
    assert_eq!(count(&log, "tree.traversal.cycle"), 1);
}
