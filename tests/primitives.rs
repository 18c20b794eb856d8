use yaml_bound::{ErrorKind, Result, Simple, Structured};

mod common;


const SOURCE: &str = r#"
int: 10
float: 3.14
double: 1.618
bool: false
char: c
long: 1234567890123456789
"#;


#[derive(Debug)]
struct Primitives {
    integer: i32,
    floating: f32,
    double_floating: f64,
    boolean: bool,
    character: char,
    long_long: i64,
}

impl Structured for Primitives {
    fn from_simple(simple: &Simple<'_>) -> Result<Self> {
        Ok(Self {
            integer: simple.bound("int").get()?,
            floating: simple.bound("float").get()?,
            double_floating: simple.bound("double").get()?,
            boolean: simple.bound("bool").get()?,
            character: simple.bound("char").get()?,
            long_long: simple.bound("long").get()?,
        })
    }
}


/// Binds the single key `key` of `SOURCE` as `T`.
fn bind_key<T: yaml_bound::FromNode>(key: &str) -> Result<T> {
    let document = yaml_bound::from_str(SOURCE)?;
    Simple::root(&document).bound::<T>(key).get()
}



#[test]
fn primitives_bind_by_key() {
    common::initialize_tracing();

    let document = yaml_bound::from_str(SOURCE).unwrap();
    let primitives: Primitives = document.bind().unwrap();

    assert_eq!(primitives.integer, 10);
    assert_eq!(primitives.floating, 3.14f32);
    assert_eq!(primitives.double_floating, 1.618);
    assert!(!primitives.boolean);
    assert_eq!(primitives.character, 'c');
    assert_eq!(primitives.long_long, 1234567890123456789);
}

#[test]
fn missing_primitives_are_reported() {
    common::initialize_tracing();

    assert_eq!(bind_key::<i32>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
    assert_eq!(bind_key::<f32>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
    assert_eq!(bind_key::<f64>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
    assert_eq!(bind_key::<bool>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
    assert_eq!(bind_key::<char>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
    assert_eq!(bind_key::<i64>("missing").unwrap_err().kind(), ErrorKind::MissingNode);
}

#[test]
fn defaults_replace_missing_primitives() {
    common::initialize_tracing();

    let document = yaml_bound::from_str(SOURCE).unwrap();
    let simple = Simple::root(&document);

    assert_eq!(simple.bound_or::<i32>("missingInt", 15).get().unwrap(), 15);
    assert_eq!(simple.bound_or::<f32>("missingFloat", -3.14f32).get().unwrap(), -3.14);
    assert_eq!(simple.bound_or::<f64>("missingDouble", -1.618).get().unwrap(), -1.618);
    assert!(simple.bound_or::<bool>("missingBool", true).get().unwrap());
    assert_eq!(simple.bound_or::<char>("missingChar", 'z').get().unwrap(), 'z');
    assert_eq!(
        simple
            .bound_or::<i64>("missingLong", -1234567890123456789i64)
            .get()
            .unwrap(),
        -1234567890123456789
    );
}

#[test]
fn present_values_win_over_defaults() {
    let document = yaml_bound::from_str(SOURCE).unwrap();

    let integer = Simple::root(&document).bound_or::<i32>("int", 99).get();

    assert_eq!(integer.unwrap(), 10);
}

#[test]
fn integers_reject_other_scalars() {
    for key in ["float", "double", "bool", "char", "long"] {
        let error = bind_key::<i32>(key).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadConversion, "{key} should not bind as i32");
    }
}

#[test]
fn booleans_reject_other_scalars() {
    for key in ["int", "float", "double", "char", "long"] {
        let error = bind_key::<bool>(key).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::BadConversion, "{key} should not bind as bool");
    }
}

#[test]
fn floats_accept_numbers_only() {
    for key in ["int", "double", "long"] {
        assert!(bind_key::<f32>(key).is_ok(), "{key} should bind as f32");
        assert!(bind_key::<f64>(key).is_ok(), "{key} should bind as f64");
    }

    for key in ["bool", "char"] {
        assert_eq!(bind_key::<f32>(key).unwrap_err().kind(), ErrorKind::BadConversion);
        assert_eq!(bind_key::<f64>(key).unwrap_err().kind(), ErrorKind::BadConversion);
    }
}

#[test]
fn conversion_errors_locate_the_node() {
    let error = bind_key::<i32>("float").unwrap_err();

    assert_eq!(error.path().map(|path| path.as_str()), Some("/float"));
    assert_eq!(error.yaml_location().as_deref(), Some("@3:7"));
    assert!(error.to_string().ends_with("@3:7"));
}

#[test]
fn scalars_bound_to_collections_are_shape_errors() {
    let document = yaml_bound::from_str("list: [1, 2]\nmap: {a: 1}\n").unwrap();
    let simple = Simple::root(&document);

    assert_eq!(
        simple.bound::<i32>("list").get().unwrap_err().kind(),
        ErrorKind::InvalidNodeType
    );
    assert_eq!(
        simple.bound::<bool>("map").get().unwrap_err().kind(),
        ErrorKind::InvalidNodeType
    );
}
