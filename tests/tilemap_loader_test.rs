use nostalgia::resources::{load_tilemap, parse_tilemap};

use crate::common::test_utils::fixture;

mod common;

#[test]
fn should_flatten_layers_back_to_back() {
    let tilemap = load_tilemap(&fixture("two_layers.tmj")).expect("failed to load fixture");

    assert_eq!(tilemap.width, 3);
    assert_eq!(tilemap.height, 2);
    assert_eq!(tilemap.number_of_layers, 2);
    assert_eq!(tilemap.layers.len(), 3 * 2 * 2);
    assert_eq!(tilemap.layer(0), Some(&[1, 2, 3, 4, 5, 6][..]));
    assert_eq!(tilemap.layer(1), Some(&[0, 7, 0, 0, 0, 8][..]));
    assert_eq!(tilemap.layer(2), None);
}

#[test]
fn should_read_the_shipped_map() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/tilemaps/map.tmj");
    let tilemap = load_tilemap(&path).expect("failed to load the shipped map");

    assert_eq!(
        tilemap.layers.len(),
        tilemap.layer_len() * tilemap.number_of_layers as usize
    );
    assert!(tilemap.layer(0).is_some_and(|layer| layer.iter().all(|&tile| tile != 0)));
}

#[test]
fn should_fail_on_malformed_json() {
    let error = load_tilemap(&fixture("truncated.tmj")).expect_err("truncated JSON must not load");

    assert!(format!("{:#}", error).contains("malformed tilemap"));
}

#[test]
fn should_fail_on_missing_fields() {
    assert!(load_tilemap(&fixture("missing_layers.tmj")).is_err());
    assert!(parse_tilemap(r#"{ "width": 1, "layers": [] }"#).is_err());
}

#[test]
fn should_reject_oversized_maps() {
    let huge = r#"{ "width": 4294967295, "height": 4294967295, "layers": [ { "data": [] }, { "data": [] } ] }"#;
    let error = parse_tilemap(huge).expect_err("map larger than memory must not load");
    assert!(error.to_string().contains("4294967295x4294967295"));

    assert!(parse_tilemap(r#"{ "width": 16385, "height": 1, "layers": [] }"#).is_err());
    // Each side fits, the cell count over all layers does not.
    let layers = vec![r#"{ "data": [] }"#; 5].join(",");
    let deep = format!(r#"{{ "width": 16384, "height": 1024, "layers": [{}] }}"#, layers);
    assert!(parse_tilemap(&deep).is_err());
}

#[test]
fn should_pad_short_layers_with_empty_tiles() {
    let tilemap =
        parse_tilemap(r#"{ "width": 2, "height": 2, "layers": [ { "data": [1, 2, 3] } ] }"#)
            .expect("short layer is accepted");

    assert_eq!(tilemap.layers, vec![1, 2, 3, 0]);
}

#[test]
fn should_accept_a_map_without_layers() {
    let tilemap = parse_tilemap(r#"{ "width": 4, "height": 4, "layers": [] }"#)
        .expect("empty layer list is accepted");

    assert_eq!(tilemap.number_of_layers, 0);
    assert!(tilemap.layers.is_empty());
}
