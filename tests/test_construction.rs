use optstruct::{Error, Instance, OptionDecl, Schema, SchemaContext, Symbol, Value};

fn connection_schema() -> Schema {
    let mut schema = Schema::new("Connection");
    schema.expect_arguments(["host", "port"]).unwrap();
    schema
        .option(OptionDecl::new("scheme").with_default("http"))
        .unwrap();
    schema
}

#[test]
fn test_positional_arguments_bind_in_order() {
    let schema = connection_schema().shared();
    let instance = Instance::builder(schema)
        .arg("example.com")
        .arg(8080i64)
        .build()
        .unwrap();

    assert_eq!(instance.get("host").unwrap(), Value::from("example.com"));
    assert_eq!(instance.get("port").unwrap(), Value::Int(8080));
    assert_eq!(instance.get("scheme").unwrap(), Value::from("http"));
}

#[test]
fn test_missing_positional_argument_fails() {
    let schema = connection_schema().shared();
    let result = Instance::builder(schema).arg("example.com").build();
    assert_eq!(
        result.err(),
        Some(Error::MissingArguments { keys: vec![Symbol::new("port")] })
    );
}

#[test]
fn test_expected_argument_satisfied_by_default() {
    let mut schema = Schema::new("Defaulted");
    schema.expect_arguments(["size"]).unwrap();
    schema
        .option_defaults([("size", 10i64)])
        .unwrap();
    let schema = schema.shared();

    let instance = Instance::builder(schema).build().unwrap();
    assert_eq!(instance.get("size").unwrap(), Value::Int(10));
}

#[test]
fn test_too_many_positional_arguments_fails() {
    let schema = connection_schema().shared();
    let result = Instance::builder(schema)
        .args(["a", "b", "c"])
        .build();
    assert_eq!(
        result.err(),
        Some(Error::InvalidArgCount { expected: 2, found: 3 })
    );
}

#[test]
fn test_named_option_wins_over_positional_binding() {
    let schema = connection_schema().shared();
    let instance = Instance::builder(schema)
        .arg("positional-host")
        .arg(80i64)
        .option("host", "named-host")
        .build()
        .unwrap();
    assert_eq!(instance.get("host").unwrap(), Value::from("named-host"));
}

#[test]
fn test_all_missing_required_keys_are_reported() {
    let mut schema = Schema::new("Strict");
    schema.required(["user", "password"]).unwrap();
    let schema = schema.shared();

    let result = Instance::builder(schema).build();
    assert_eq!(
        result.err(),
        Some(Error::MissingRequiredKeys {
            keys: vec![Symbol::new("user"), Symbol::new("password")]
        })
    );
}

#[test]
fn test_required_key_satisfied_by_default_spec() {
    let mut schema = Schema::new("Lenient");
    schema
        .option(OptionDecl::new("retries").required().with_default(3i64))
        .unwrap();
    let schema = schema.shared();

    let instance = Instance::builder(schema).build().unwrap();
    assert_eq!(instance.get("retries").unwrap(), Value::Int(3));
}

#[test]
fn test_writer_sets_unconditionally() {
    let mut schema = Schema::new("Writable");
    schema.option("state").unwrap();
    let schema = schema.shared();

    let mut instance = Instance::builder(schema).build().unwrap();
    instance.set("state", "first").unwrap();
    instance.set("state", "second").unwrap();
    assert_eq!(instance.get("state").unwrap(), Value::from("second"));
}

#[test]
fn test_fetch_reads_explicit_values_only() {
    let mut schema = Schema::new("Fetched");
    schema
        .option(OptionDecl::new("mode").with_default("auto"))
        .unwrap();
    let schema = schema.shared();

    let mut instance = Instance::builder(schema).build().unwrap();
    // Defaulted but never set: fetch misses while get resolves
    assert_eq!(
        instance.fetch("mode"),
        Err(Error::MissingKey { key: Symbol::new("mode") })
    );
    assert_eq!(instance.get("mode").unwrap(), Value::from("auto"));

    instance.set("mode", "manual").unwrap();
    assert_eq!(instance.fetch("mode").unwrap(), Value::from("manual"));
}

#[test]
fn test_undeclared_keys_have_no_accessors() {
    let schema = Schema::new("Bare").shared();
    let mut instance = Instance::builder(schema).build().unwrap();

    assert_eq!(
        instance.get("ghost"),
        Err(Error::NoReader { key: Symbol::new("ghost") })
    );
    assert_eq!(
        instance.set("ghost", 1i64),
        Err(Error::NoWriter { key: Symbol::new("ghost") })
    );
}

#[test]
fn test_context_registers_and_derives_by_name() {
    let context = SchemaContext::new();
    context.register(connection_schema());
    assert!(context.contains("Connection"));
    assert_eq!(context.len(), 1);

    let mut child = context.derive("Connection", "TlsConnection").unwrap();
    child
        .option(OptionDecl::new("scheme").with_default("https"))
        .unwrap();
    let child = context.register(child);

    let instance = Instance::builder(child)
        .arg("example.com")
        .arg(443i64)
        .build()
        .unwrap();
    assert_eq!(instance.get("scheme").unwrap(), Value::from("https"));

    // Parent's registered schema still carries the plain default
    let parent = context.get("Connection").unwrap();
    let parent_instance = Instance::builder(parent)
        .arg("example.com")
        .arg(80i64)
        .build()
        .unwrap();
    assert_eq!(parent_instance.get("scheme").unwrap(), Value::from("http"));
}

#[test]
fn test_deriving_from_unknown_schema_fails() {
    let context = SchemaContext::new();
    assert_eq!(
        context.derive("Nope", "Child").err(),
        Some(Error::UnknownSchema { name: "Nope".to_string() })
    );
}
