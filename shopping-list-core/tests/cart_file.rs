use std::fs::write;

use shopping_list_core::cart::{CartFile, FileCartSource, InMemoryCartSource};
use shopping_list_core::contract::{CartError, CartLine, CartSource};
use tempfile::tempdir;

const CART_YAML: &str = r#"
recipes:
  - id: 1
    name: Pancakes
    author: alice
    tags: [breakfast]
    ingredients:
      - { name: Flour, unit: g, amount: 200 }
      - { name: Milk, unit: ml, amount: 300 }
      - { name: Sugar, unit: g, amount: 20 }
  - id: 2
    name: Cookies
    ingredients:
      - { name: Sugar, unit: g, amount: 100 }
      - { name: Butter, unit: g, amount: 150 }
carts:
  alice: [2, 1]
  bob: []
"#;

#[test]
fn parses_yaml_and_flattens_in_cart_order() {
    let cart = CartFile::from_yaml_str(CART_YAML).expect("valid YAML");
    cart.validate().expect("valid cart");

    let lines = cart.lines_for("alice").unwrap();
    assert_eq!(
        lines,
        vec![
            CartLine::new("Sugar", "g", 100),
            CartLine::new("Butter", "g", 150),
            CartLine::new("Flour", "g", 200),
            CartLine::new("Milk", "ml", 300),
            CartLine::new("Sugar", "g", 20),
        ]
    );
    assert_eq!(cart.recipes[0].tags, vec!["breakfast".to_string()]);
}

#[test]
fn user_without_cart_gets_no_lines() {
    let cart = CartFile::from_yaml_str(CART_YAML).unwrap();
    assert!(cart.lines_for("bob").unwrap().is_empty());
    assert!(cart.lines_for("nobody").unwrap().is_empty());
}

#[test]
fn parses_json_cart_file_by_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.json");
    write(
        &path,
        r#"{"recipes":[{"id":7,"name":"Tea","ingredients":[{"name":"Tea","unit":"g","amount":5}]}],"carts":{"carol":[7]}}"#,
    )
    .unwrap();

    let cart = CartFile::from_path(&path).expect("JSON cart should parse");
    assert_eq!(cart.lines_for("carol").unwrap(), vec![CartLine::new("Tea", "g", 5)]);
}

#[test]
fn rejects_unknown_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.toml");
    write(&path, "").unwrap();

    assert!(matches!(
        CartFile::from_path(&path),
        Err(CartError::UnsupportedFormat(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = CartFile::from_path(dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, CartError::Io { .. }), "got {err:?}");
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let err = CartFile::from_yaml_str("recipes: [:::").unwrap_err();
    assert!(matches!(err, CartError::Parse(_)));
}

#[test]
fn zero_amount_is_an_invalid_cart_line() {
    let cart = CartFile::from_yaml_str(
        r#"
recipes:
  - id: 1
    name: Soup
    ingredients:
      - { name: Water, unit: ml, amount: 0 }
"#,
    )
    .unwrap();

    let err = cart.validate().unwrap_err();
    assert!(matches!(err, CartError::InvalidCartLine { .. }), "got {err:?}");
    assert!(err.to_string().contains("at least 1"));
}

#[test]
fn negative_amount_is_rejected_at_parse_time() {
    let err = CartFile::from_yaml_str(
        r#"
recipes:
  - id: 1
    name: Soup
    ingredients:
      - { name: Water, unit: ml, amount: -5 }
"#,
    )
    .unwrap_err();
    assert!(matches!(err, CartError::Parse(_)));
}

#[test]
fn oversized_amount_is_an_invalid_cart_line() {
    let cart = CartFile::from_yaml_str(
        r#"
recipes:
  - id: 1
    name: Soup
    ingredients:
      - { name: Water, unit: ml, amount: 5000000000 }
"#,
    )
    .unwrap();
    assert!(matches!(
        cart.validate(),
        Err(CartError::InvalidCartLine { .. })
    ));
}

#[test]
fn blank_name_or_unit_is_an_invalid_cart_line() {
    for (name, unit) in [("  ", "g"), ("Salt", "")] {
        let cart = CartFile::from_yaml_str(&format!(
            "recipes:\n  - id: 1\n    name: Soup\n    ingredients:\n      - {{ name: \"{name}\", unit: \"{unit}\", amount: 1 }}\n"
        ))
        .unwrap();
        assert!(matches!(
            cart.validate(),
            Err(CartError::InvalidCartLine { .. })
        ));
    }
}

#[test]
fn duplicate_ingredient_within_recipe_is_rejected() {
    let cart = CartFile::from_yaml_str(
        r#"
recipes:
  - id: 1
    name: Soup
    ingredients:
      - { name: Salt, unit: g, amount: 1 }
      - { name: Salt, unit: g, amount: 2 }
"#,
    )
    .unwrap();
    assert!(matches!(
        cart.validate(),
        Err(CartError::DuplicateIngredient { .. })
    ));
}

#[test]
fn duplicate_recipe_ids_are_rejected() {
    let cart = CartFile::from_yaml_str(
        "recipes:\n  - { id: 1, name: A }\n  - { id: 1, name: B }\n",
    )
    .unwrap();
    assert!(matches!(
        cart.validate(),
        Err(CartError::DuplicateRecipe { recipe_id: 1 })
    ));
}

#[test]
fn cart_referencing_unknown_recipe_is_rejected() {
    let cart = CartFile::from_yaml_str("recipes: []\ncarts:\n  alice: [42]\n").unwrap();
    match cart.validate() {
        Err(CartError::UnknownRecipe { user, recipe_id }) => {
            assert_eq!(user, "alice");
            assert_eq!(recipe_id, 42);
        }
        other => panic!("expected UnknownRecipe, got {other:?}"),
    }
}

#[test]
fn recipe_twice_in_one_cart_is_rejected() {
    let cart =
        CartFile::from_yaml_str("recipes:\n  - { id: 1, name: A }\ncarts:\n  alice: [1, 1]\n")
            .unwrap();
    assert!(matches!(
        cart.validate(),
        Err(CartError::DuplicateCartEntry { .. })
    ));
}

#[tokio::test]
async fn in_memory_source_serves_validated_cart() {
    let cart = CartFile::from_yaml_str(CART_YAML).unwrap();
    let source = InMemoryCartSource::new(cart).expect("valid cart");

    let lines = source.cart_lines("alice").await.unwrap();
    assert_eq!(lines.len(), 5);
}

#[tokio::test]
async fn in_memory_source_refuses_invalid_cart() {
    let cart = CartFile::from_yaml_str("recipes: []\ncarts:\n  alice: [1]\n").unwrap();
    assert!(InMemoryCartSource::new(cart).is_err());
}

#[tokio::test]
async fn file_source_reads_and_validates_on_each_call() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cart.yaml");
    write(&path, CART_YAML).unwrap();
    let source = FileCartSource::new(&path);

    assert_eq!(source.cart_lines("alice").await.unwrap().len(), 5);

    write(&path, "recipes: []\ncarts:\n  alice: [9]\n").unwrap();
    let err = source.cart_lines("alice").await.unwrap_err();
    assert!(matches!(err, CartError::UnknownRecipe { .. }));
}
