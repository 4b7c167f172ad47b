use guidrelink::formats::catalog::{CatalogWriter, decode_catalog, write_catalog};
use guidrelink::prelude::*;
use guidrelink::resolve::{path_hash_guid, read_report};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const FISHERMAN_CATALOG_GUID: &str = "30b6e6ebf780b304f83e144c61a2e054";
const ROCK_CATALOG_GUID: &str = "9f0e3b5fb3c14d1a8f1f9a3a2e6f4c10";

fn level_guid(n: u8) -> String {
    format!("feed{n:028x}")
}

fn package_guid() -> Guid {
    Guid::from_md5("level1")
}

fn asset(local_id: i64, name: &str, path: Option<&str>, class: &str) -> AssetRecord {
    AssetRecord {
        identity: AssetIdentity::new(package_guid(), local_id),
        original_name: name.to_string(),
        original_path: path.map(ToString::to_string),
        class_name: class.to_string(),
        package_name: "level1".to_string(),
    }
}

fn reference(guid: &str) -> ScriptValue {
    ScriptValue::structure([(
        "prefab",
        ScriptValue::structure([
            ("m_AssetGUID", ScriptValue::string(guid)),
            ("m_SubObjectName", ScriptValue::string("")),
        ]),
    )])
}

fn sample_graph() -> AssetGraph {
    let stages = ["Fisherman_0", "Tent_0"]
        .iter()
        .map(|g| ScriptValue::structure([("stageId", ScriptValue::string(*g))]))
        .collect();
    let spawns = (0..6).map(|n| reference(&level_guid(n))).collect();

    AssetGraph {
        packages: vec![
            LoadedPackage {
                name: "level1".to_string(),
                file_name: "level1".to_string(),
                guid: Some(package_guid()),
            },
            LoadedPackage {
                name: "shared".to_string(),
                file_name: format!("CAB-{ROCK_CATALOG_GUID}"),
                guid: None,
            },
        ],
        assets: vec![
            asset(1, "Fisherman_0", Some("Assets/Prefabs/Fisherman_0.prefab"), "GameObject"),
            asset(2, "Tent_0", Some("Assets/Prefabs/Tent_0.prefab"), "GameObject"),
            asset(3, "Rock", Some("Assets/Textures/Rock.png"), "Texture2D"),
            asset(4, "Boat", None, "Mesh"),
            asset(5, "Sea", Some("Assets/Audio/Sea.wav"), "AudioClip"),
        ],
        script_objects: vec![ScriptObject {
            identity: AssetIdentity::new(package_guid(), 100),
            type_name: "FishingLevelData".to_string(),
            origin_path: Some("Assets/Data/Level_01.asset".to_string()),
            data: ScriptValue::structure([
                ("m_Name", ScriptValue::string("Level_01")),
                ("stageList", ScriptValue::Array(stages)),
                ("spawnList", ScriptValue::Array(spawns)),
            ]),
        }],
        external_references: vec![
            ExternalReference::by_name("level1"),
            ExternalReference::by_guid(Guid::parse_hex(ROCK_CATALOG_GUID).unwrap()),
            ExternalReference::by_name("missing"),
        ],
    }
}

fn write_catalogs(dir: &Path) {
    let aa = dir.join("StreamingAssets/aa");
    fs::create_dir_all(&aa).unwrap();

    let mut writer = CatalogWriter::new();
    writer.add_location(
        CatalogKey::AsciiString(FISHERMAN_CATALOG_GUID.to_string()),
        "0#/Assets/Prefabs/Fisherman_0.prefab",
        Some("UnityEngine.ResourceManagement.ResourceProviders.BundledAssetProvider"),
        Some(("UnityEngine.CoreModule", "UnityEngine.GameObject")),
    );
    writer.add_location(
        CatalogKey::AsciiString(ROCK_CATALOG_GUID.to_string()),
        "5f1e8a9b[Assets/Textures/Rock.jpg]",
        None,
        None,
    );
    writer.add_location(CatalogKey::Int32(7), "Assets/Prefabs/Unused.prefab", None, None);
    write_catalog(aa.join("catalog.json"), &writer.build()).unwrap();

    fs::write(aa.join("catalog_broken.json"), r#"{"m_KeyDataString": "%%%"}"#).unwrap();
}

fn process(dir: &Path, graph: &AssetGraph, config: RelinkConfig) -> GuidResolver {
    let catalogs = load_catalog_dir(dir, &config.catalog).cross_reference;
    GuidResolver::new(Arc::new(ResolutionContext::process(graph, catalogs, config)))
}

#[test]
fn test_full_pipeline() {
    let dir = tempdir().unwrap();
    write_catalogs(dir.path());
    let graph = sample_graph();
    let resolver = process(dir.path(), &graph, RelinkConfig::default());

    let resolved: Vec<_> = graph
        .assets
        .iter()
        .map(|a| resolver.resolve(&a.identity))
        .collect();

    // leveldata wins over the catalog entry for the same prefab
    assert_eq!(resolved[0].origin, GuidOrigin::LeveldataDerived);
    assert_eq!(resolved[0].guid, Guid::parse_hex(&level_guid(0)).unwrap());
    assert_eq!(resolved[1].origin, GuidOrigin::LeveldataDerived);
    assert_eq!(resolved[1].guid, Guid::parse_hex(&level_guid(3)).unwrap());

    // png stands in for the catalog's jpg
    assert_eq!(resolved[2].origin, GuidOrigin::CatalogDerived);
    assert_eq!(resolved[2].guid, Guid::parse_hex(ROCK_CATALOG_GUID).unwrap());

    assert_eq!(resolved[3].origin, GuidOrigin::CollectionHashDerived);
    assert_eq!(resolved[4].origin, GuidOrigin::PathHashDerived);
    assert_eq!(resolved[4].guid, path_hash_guid("assets/audio/sea.wav"));

    let report = resolver.report();
    assert_eq!(report.len(), 5);
    assert_eq!(report.count(GuidOrigin::LeveldataDerived), 2);
    assert_eq!(report.count(GuidOrigin::CatalogDerived), 1);

    let path = dir.path().join("mapping.json");
    write_report(&path, &report).unwrap();
    assert_eq!(read_report(&path).unwrap().records, report.records);
}

#[test]
fn test_catalog_used_without_leveldata() {
    let dir = tempdir().unwrap();
    write_catalogs(dir.path());
    let graph = sample_graph();
    let config = RelinkConfig::from_toml_str(
        r#"
        [leveldata]
        type_keywords = ["stage"]
        "#,
    )
    .unwrap();
    let resolver = process(dir.path(), &graph, config);

    // the level object no longer qualifies, so the catalog entry is used
    let fisherman = resolver.resolve(&graph.assets[0].identity);
    assert_eq!(fisherman.origin, GuidOrigin::CatalogDerived);
    assert_eq!(fisherman.guid, Guid::parse_hex(FISHERMAN_CATALOG_GUID).unwrap());

    let tent = resolver.resolve(&graph.assets[1].identity);
    assert_eq!(tent.origin, GuidOrigin::PathHashDerived);
}

#[test]
fn test_resolution_is_deterministic() {
    let dir = tempdir().unwrap();
    write_catalogs(dir.path());
    let graph = sample_graph();
    let identities: Vec<_> = graph.assets.iter().map(|a| a.identity).collect();

    let first = process(dir.path(), &graph, RelinkConfig::default()).resolve_all(&identities);
    let second = process(dir.path(), &graph, RelinkConfig::default()).resolve_all(&identities);
    assert_eq!(first, second);
}

#[test]
fn test_graph_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let graph = sample_graph();
    fs::write(&path, serde_json::to_string_pretty(&graph).unwrap()).unwrap();

    let loaded = AssetGraph::load(&path).unwrap();
    assert_eq!(loaded.assets, graph.assets);
    assert_eq!(loaded.script_objects, graph.script_objects);
    assert_eq!(loaded.external_references, graph.external_references);
}

#[test]
fn test_catalog_bounds_safety() {
    let mut writer = CatalogWriter::new();
    writer.add_location(
        CatalogKey::AsciiString(FISHERMAN_CATALOG_GUID.to_string()),
        "Assets/Prefabs/Fisherman_0.prefab",
        None,
        None,
    );
    let stray = writer.add_key(CatalogKey::AsciiString(ROCK_CATALOG_GUID.to_string()));
    writer.link(stray, 4096);
    let catalog = decode_catalog(&writer.build(), "bounds");
    let xref = CatalogCrossReference::from_catalog(&catalog);
    assert_eq!(xref.len(), 1);
    assert_eq!(
        xref.location(&Guid::parse_hex(FISHERMAN_CATALOG_GUID).unwrap()),
        Some("Assets/Prefabs/Fisherman_0.prefab")
    );
}

#[test]
fn test_dependency_resolution() {
    let graph = sample_graph();
    let resolver = DependencyResolver::new(&graph.packages, CollectingReporter::new());
    let resolved = resolver.resolve_all(&graph.external_references);

    assert_eq!(resolved[0].map(|p| p.name.as_str()), Some("level1"));
    assert_eq!(resolved[1].map(|p| p.name.as_str()), Some("shared"));
    assert!(resolved[2].is_none());
    assert_eq!(resolver.reporter().missing(), vec![ExternalReference::by_name("missing")]);
}

#[test]
fn test_companion_format_is_involutive() {
    for i in 0..512 {
        let hex = Guid::from_md5(&format!("asset-{i}")).to_hex();
        let companion = to_companion_format(&hex).unwrap();
        assert_eq!(to_companion_format(&companion).unwrap(), hex);
    }
}
