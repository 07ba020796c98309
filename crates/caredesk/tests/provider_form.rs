//! Integration tests for the provider picker and the shared patient selection.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use caredesk::prelude::*;
use parking_lot::Mutex;

fn doctors() -> Vec<SelectOption<String>> {
    vec![
        SelectOption::new("Dr. Smith", "p1".to_string()),
        SelectOption::new("Dr. Jones", "p2".to_string()),
    ]
}

fn labels(options: &[&SelectOption<String>]) -> Vec<String> {
    options.iter().map(|o| o.label.clone()).collect()
}

#[test]
fn test_pick_provider_end_to_end() {
    let form = Arc::new(FormState::<String>::new());
    let binder = OptionBinder::new("provider", doctors(), form.clone());

    binder.on_query_change("jo");
    let filtered = binder.filtered_options();
    assert_eq!(labels(&filtered), vec!["Dr. Jones"]);
    assert_eq!(filtered[0].value, "p2");

    let jones = filtered[0].clone();
    binder.on_select(&jones).unwrap();
    assert_eq!(form.get("provider").as_deref(), Some("p2"));

    binder.on_query_change("");
    assert_eq!(labels(&binder.filtered_options()), vec!["Dr. Smith", "Dr. Jones"]);
    assert_eq!(binder.selected_option(), Some(jones));
}

#[test]
fn test_form_written_once_per_confirmation() {
    let form = Arc::new(FormState::<String>::new());
    let writes = Arc::new(AtomicUsize::new(0));

    let writes_clone = writes.clone();
    form.field_changed.connect(move |change| {
        assert_eq!(change.field, "provider");
        writes_clone.fetch_add(1, Ordering::SeqCst);
    });

    let binder = OptionBinder::new("provider", doctors(), form.clone());
    for text in ["d", "dr", "dr.", "dr. s"] {
        binder.on_query_change(text);
    }
    assert_eq!(writes.load(Ordering::SeqCst), 0);
    assert!(form.is_empty());

    binder.on_select(&SelectOption::new("Dr. Smith", "p1".to_string())).unwrap();
    assert_eq!(writes.load(Ordering::SeqCst), 1);

    binder.on_select(&SelectOption::new("Dr. Jones", "p2".to_string())).unwrap();
    assert_eq!(writes.load(Ordering::SeqCst), 2);
    assert_eq!(form.get("provider").as_deref(), Some("p2"));
}

#[test]
fn test_two_binders_share_one_form() {
    let form = Arc::new(FormState::<String>::new());
    let provider = OptionBinder::new("provider", doctors(), form.clone());
    let institution = OptionBinder::new(
        "institution",
        vec![
            SelectOption::new("General Hospital", "i1".to_string()),
            SelectOption::new("Riverside Clinic", "i2".to_string()),
        ],
        form.clone(),
    );

    institution.on_query_change("RIVER");
    let riverside = institution.filtered_options()[0].clone();
    institution.on_select(&riverside).unwrap();
    provider
        .on_select(&SelectOption::new("Dr. Smith", "p1".to_string()))
        .unwrap();

    let snapshot = form.snapshot();
    assert_eq!(snapshot.get("institution").map(String::as_str), Some("i2"));
    assert_eq!(snapshot.get("provider").map(String::as_str), Some("p1"));
}

#[test]
fn test_selection_shared_across_consumers() {
    let provider = SelectionContext::provide(None);

    let patient_list = SelectionContext::read().unwrap();
    let medications_page = SelectionContext::read().unwrap();
    assert_eq!(medications_page.active_patient_id(), None);

    let rendered = Arc::new(Mutex::new(Vec::new()));
    let rendered_clone = rendered.clone();
    let reader = medications_page.clone();
    let _sub = medications_page
        .subscribe(move |_| {
            rendered_clone.lock().push(reader.active_patient_id());
        })
        .unwrap();

    patient_list.select(Some(PatientId::from("p-42")));
    assert_eq!(medications_page.active_patient_id().unwrap(), "p-42");
    assert_eq!(*rendered.lock(), vec![Some(PatientId::from("p-42"))]);

    drop(provider);
    assert_eq!(medications_page.active_patient_id(), None);
    assert!(matches!(
        SelectionContext::read(),
        Err(FormError::NoSelectionProvider)
    ));

    patient_list.select(Some(PatientId::from("p-43")));
    assert_eq!(medications_page.active_patient_id(), None);
    assert_eq!(rendered.lock().len(), 1);
}

#[test]
fn test_patient_switch_drives_form_reset() {
    let provider = SelectionContext::provide(Some(PatientId::from("p-1")));
    let form = Arc::new(FormState::<String>::new());

    let form_clone = form.clone();
    let _sub = provider
        .handle()
        .subscribe(move |_| form_clone.clear())
        .unwrap();

    let binder = OptionBinder::new("provider", doctors(), form.clone());
    binder.on_select(&SelectOption::new("Dr. Jones", "p2".to_string())).unwrap();
    assert!(!form.is_empty());

    SelectionContext::read()
        .unwrap()
        .select(Some(PatientId::from("p-2")));
    assert!(form.is_empty());
}
