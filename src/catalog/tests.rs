use std::io::Write;

use super::*;

fn item(id: u64, gender: Gender, category: &str) -> CatalogItem {
    CatalogItem {
        id,
        gender,
        category: category.to_string(),
        base_colour: "Navy".to_string(),
        usage: "Casual".to_string(),
        display_name: format!("Item {}", id),
        image: format!("images/{}.jpg", id),
        embedding: vec![1.0, 0.0],
    }
}

#[test]
fn test_gender_from_str_canonical() {
    assert_eq!("Men".parse::<Gender>().unwrap(), Gender::Men);
    assert_eq!("Women".parse::<Gender>().unwrap(), Gender::Women);
    assert_eq!("Boys".parse::<Gender>().unwrap(), Gender::Boys);
    assert_eq!("Girls".parse::<Gender>().unwrap(), Gender::Girls);
    assert_eq!("Unisex".parse::<Gender>().unwrap(), Gender::Unisex);
}

#[test]
fn test_gender_from_str_case_insensitive() {
    assert_eq!("women".parse::<Gender>().unwrap(), Gender::Women);
    assert_eq!(" UNISEX ".parse::<Gender>().unwrap(), Gender::Unisex);
}

#[test]
fn test_gender_from_str_unknown() {
    let err = "Adults".parse::<Gender>().unwrap_err();
    assert!(matches!(err, CatalogError::UnknownGender { value } if value == "Adults"));
}

#[test]
fn test_gender_display_round_trips() {
    for gender in Gender::ALL {
        assert_eq!(gender.as_str().parse::<Gender>().unwrap(), gender);
    }
}

#[test]
fn test_filter_is_idempotent() {
    let index = CatalogIndex::new(vec![
        item(1, Gender::Women, "Jackets"),
        item(2, Gender::Men, "Shoes"),
        item(3, Gender::Unisex, "Bags"),
    ]);

    let once = index.filter(|i| i.gender != Gender::Men);
    let twice = once.filter(|i| i.gender != Gender::Men);

    let ids = |idx: &CatalogIndex| -> Vec<u64> { idx.rows().iter().map(|i| i.id).collect() };
    assert_eq!(ids(&once), ids(&twice));
    assert_eq!(ids(&once), vec![1, 3]);
}

#[test]
fn test_complements_view_excludes_source_category_and_wrong_gender() {
    let index = CatalogIndex::new(vec![
        item(1, Gender::Women, "Jackets"),
        item(2, Gender::Women, "Shoes"),
        item(3, Gender::Men, "Shoes"),
        item(4, Gender::Unisex, "Bags"),
    ]);

    let view = index.complements_view(Gender::Women, "Jackets");
    let ids: Vec<u64> = view.rows().iter().map(|i| i.id).collect();

    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_complements_view_category_check_ignores_case() {
    let index = CatalogIndex::new(vec![item(1, Gender::Women, "Jackets")]);
    let view = index.complements_view(Gender::Women, "jackets");
    assert!(view.is_empty());
}

#[test]
fn test_distinct_categories_sorted_and_deduplicated() {
    let index = CatalogIndex::new(vec![
        item(1, Gender::Women, "Shoes"),
        item(2, Gender::Men, "Bags"),
        item(3, Gender::Unisex, "Shoes"),
    ]);

    let categories: Vec<String> = index.distinct_categories().into_iter().collect();
    assert_eq!(categories, vec!["Bags".to_string(), "Shoes".to_string()]);
}

fn write_catalog(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp catalog");
    for line in lines {
        writeln!(file, "{}", line).expect("write catalog line");
    }
    file
}

fn row_json(id: u64, gender: &str, category: &str, embedding: &str) -> String {
    serde_json::json!({
        "id": id,
        "gender": gender,
        "category": category,
        "base_colour": "Navy",
        "usage": "Casual",
        "display_name": format!("Item {}", id),
        "image": format!("images/{}.jpg", id),
        "embedding": embedding,
    })
    .to_string()
}

#[tokio::test]
async fn test_load_catalog_parses_preserialized_embeddings() {
    let file = write_catalog(&[
        &row_json(1, "Women", "Jackets", "[1.0, 0.0]"),
        &row_json(2, "Unisex", "Shoes", "[0.0, 1.0]"),
    ]);

    let index = load_catalog(file.path()).await.expect("catalog loads");

    assert_eq!(index.len(), 2);
    assert_eq!(index.rows()[0].embedding, vec![1.0, 0.0]);
    assert_eq!(index.rows()[1].gender, Gender::Unisex);
}

#[tokio::test]
async fn test_load_catalog_skips_mismatched_dimension() {
    let file = write_catalog(&[
        &row_json(1, "Women", "Jackets", "[1.0, 0.0]"),
        &row_json(2, "Women", "Shoes", "[1.0, 0.0, 0.0]"),
        &row_json(3, "Women", "Bags", "[0.5, 0.5]"),
    ]);

    let index = load_catalog(file.path()).await.expect("catalog loads");

    let ids: Vec<u64> = index.rows().iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_load_catalog_skips_unparseable_rows() {
    let file = write_catalog(&[
        "not json at all",
        &row_json(1, "Women", "Jackets", "not-an-array"),
        &row_json(2, "Martians", "Jackets", "[1.0]"),
        &row_json(3, "Women", "Jackets", "[1.0, 0.0]"),
    ]);

    let index = load_catalog(file.path()).await.expect("catalog loads");

    assert_eq!(index.len(), 1);
    assert_eq!(index.rows()[0].id, 3);
}

#[tokio::test]
async fn test_load_catalog_rejects_all_invalid() {
    let file = write_catalog(&["garbage", "more garbage"]);

    let err = load_catalog(file.path()).await.unwrap_err();
    assert!(matches!(err, CatalogError::Empty { .. }));
}

#[tokio::test]
async fn test_load_catalog_missing_file() {
    let err = load_catalog(std::path::Path::new("/nonexistent/catalog.jsonl"))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ReadFailed { .. }));
}
