use optstruct::{Callback, Error, Instance, Schema, Symbol, Value};
use std::sync::{Arc, Mutex};

type Recorder = Arc<Mutex<Vec<&'static str>>>;

fn record(recorder: &Recorder, label: &'static str) {
    recorder.lock().unwrap().push(label);
}

#[test]
fn test_before_and_init_run_in_declaration_order() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("Ordered");
    schema.before_init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "before_1")
    }));
    schema.before_init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "before_2")
    }));
    schema.init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "init_1")
    }));
    schema.after_init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "init_2")
    }));

    Instance::builder(schema.shared()).build().unwrap();
    assert_eq!(
        *recorder.lock().unwrap(),
        vec!["before_1", "before_2", "init_1", "init_2"]
    );
}

#[test]
fn test_before_init_runs_before_required_validation() {
    // A before callback may supply a required key through the raw
    // options store and save construction
    let mut schema = Schema::new("Rescued");
    schema.required(["token"]).unwrap();
    schema.before_init(Callback::func(|instance| {
        instance
            .options_mut()
            .insert(Symbol::new("token"), Value::from("injected"));
    }));
    let schema = schema.shared();

    let instance = Instance::builder(schema).build().unwrap();
    assert_eq!(instance.get("token").unwrap(), Value::from("injected"));
}

#[test]
fn test_init_runs_after_validation() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("Checked");
    schema.required(["token"]).unwrap();
    schema.init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "init")
    }));
    let schema = schema.shared();

    // Validation fails first, so init never runs
    let result = Instance::builder(schema).build();
    assert_eq!(
        result.err(),
        Some(Error::MissingRequiredKeys { keys: vec![Symbol::new("token")] })
    );
    assert!(recorder.lock().unwrap().is_empty());
}

#[test]
fn test_around_wraps_the_pipeline() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("Wrapped");
    schema.before_init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "before")
    }));
    schema.init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "init")
    }));
    schema.around_init({
        let r = recorder.clone();
        move |instance, continuation| {
            record(&r, "around_enter");
            continuation(instance);
            record(&r, "around_exit");
        }
    });

    Instance::builder(schema.shared()).build().unwrap();
    assert_eq!(
        *recorder.lock().unwrap(),
        vec!["around_enter", "before", "init", "around_exit"]
    );
}

#[test]
fn test_first_declared_around_is_outermost() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("Nested");
    schema.around_init({
        let r = recorder.clone();
        move |instance, continuation| {
            record(&r, "outer_enter");
            continuation(instance);
            record(&r, "outer_exit");
        }
    });
    schema.around_init({
        let r = recorder.clone();
        move |instance, continuation| {
            record(&r, "inner_enter");
            continuation(instance);
            record(&r, "inner_exit");
        }
    });

    Instance::builder(schema.shared()).build().unwrap();
    assert_eq!(
        *recorder.lock().unwrap(),
        vec!["outer_enter", "inner_enter", "inner_exit", "outer_exit"]
    );
}

#[test]
fn test_around_without_continuation_suppresses_later_phases() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("Suppressed");
    // Missing required key would normally fail construction
    schema.required(["token"]).unwrap();
    schema.init(Callback::func({
        let r = recorder.clone();
        move |_| record(&r, "init")
    }));
    schema.around_init(|_instance, _continuation| {
        // Never invokes the continuation
    });
    let schema = schema.shared();

    let instance = Instance::builder(schema).build().unwrap();
    assert!(recorder.lock().unwrap().is_empty());
    assert!(instance.fetch("token").is_err());
}

#[test]
fn test_method_named_callback_dispatches_through_schema() {
    let recorder: Recorder = Default::default();
    let mut schema = Schema::new("MethodCallback");
    schema.define_method("announce", {
        let r = recorder.clone();
        move |_| {
            record(&r, "announced");
            Value::None
        }
    });
    schema.init(Callback::from("announce"));

    Instance::builder(schema.shared()).build().unwrap();
    assert_eq!(*recorder.lock().unwrap(), vec!["announced"]);
}

#[test]
fn test_callback_naming_undefined_method_fails_construction() {
    let mut schema = Schema::new("BadCallback");
    schema.init(Callback::from("missing_method"));

    let result = Instance::builder(schema.shared()).build();
    assert_eq!(
        result.err(),
        Some(Error::UnknownMethod { name: Symbol::new("missing_method") })
    );
}
