use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use syster_integrity::model::{DefinitionKind, UsageKind};
use syster_integrity::validate::{Category, ValidationOptions};
use syster_integrity::{Model, NewElement, SharedModel};

use crate::helpers::diagnostic_helpers::assert_category;

#[test]
fn shared_readers_see_completed_edits_only() {
    let shared = SharedModel::new(Model::new());
    let writers: Vec<_> = (0..8)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                shared.edit(|model, t| {
                    let def = t.add(
                        model,
                        NewElement::definition(DefinitionKind::Part).with_name(format!("D{i}")),
                    );
                    t.add(
                        model,
                        NewElement::usage(UsageKind::Part)
                            .with_name(format!("u{i}"))
                            .typed_by(def),
                    );
                });
            })
        })
        .collect();

    let clean_reads = Arc::new(AtomicUsize::new(0));
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            let clean_reads = clean_reads.clone();
            thread::spawn(move || {
                // Each edit adds a definition and its usage under one lock,
                // so a reader never sees a usage without its definition.
                if shared.validate(ValidationOptions::default()).is_ok() {
                    clean_reads.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }
    assert_eq!(clean_reads.load(Ordering::SeqCst), 4);
    assert_eq!(shared.read().len(), 16);
}

#[test]
fn shared_edit_validated_sees_its_own_edit() {
    let shared = SharedModel::default();
    let (id, report) = shared.edit_validated(ValidationOptions::default(), |model, t| {
        t.add(model, NewElement::definition(DefinitionKind::Part))
    });
    assert!(shared.read().contains(id));
    assert_category(report, Category::MissingName);
}

#[test]
fn shared_snapshot_validates_independently() {
    let shared: SharedModel = Model::new().into();
    shared.edit(|model, t| {
        t.add(model, NewElement::definition(DefinitionKind::Part).with_name("Engine"))
    });
    let snapshot = shared.snapshot();
    shared.edit(|model, t| t.add(model, NewElement::usage(UsageKind::Part).with_name("loose")));

    assert!(syster_integrity::validate_model(&snapshot, ValidationOptions::default()).is_ok());
    assert_category(
        shared.validate(ValidationOptions::default()),
        Category::UnresolvedDefinition,
    );
}
